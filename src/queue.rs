//! Bounded FIFO queue (§4.1).
//!
//! The source idiom is a fixed-capacity ring buffer with non-blocking
//! `try_put`/`try_get`, all blocking implemented as busy-retry loops at the
//! callers. Per the redesign guidance in §9 this is replaced with a bounded
//! [`crossbeam_channel`], which gives the same FIFO/capacity contract (O1,
//! I5) plus genuine blocking `put`/`get` without the caller having to spin.

/// Queue capacity, fixed at 128 per §4.1/I5 across every queue in the core.
pub const CAPACITY: usize = 128;

/// Error returned by [`BoundedQueue::try_put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Full<T>(pub T);

/// Error returned by [`BoundedQueue::try_get`] when nothing is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Empty;

/// Error returned when every clone of the queue's other end has been
/// dropped; equivalent to the source observing a closed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

/// A bounded, multi-producer multi-consumer FIFO queue.
///
/// Cloning a `BoundedQueue` shares the same underlying channel (cheap,
/// `Arc`-backed), matching how the source passes one queue instance to
/// multiple loops.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    tx: crossbeam_channel::Sender<T>,
    rx: crossbeam_channel::Receiver<T>,
}

impl<T> BoundedQueue<T> {
    /// Creates a new queue with the fixed [`CAPACITY`].
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(CAPACITY);
        Self { tx, rx }
    }

    /// Non-blocking enqueue. Returns the item back via [`Full`] if the queue
    /// is at capacity.
    pub fn try_put(&self, item: T) -> Result<(), Full<T>> {
        self.tx.try_send(item).map_err(|e| match e {
            crossbeam_channel::TrySendError::Full(v) => Full(v),
            crossbeam_channel::TrySendError::Disconnected(v) => Full(v),
        })
    }

    /// Non-blocking dequeue.
    pub fn try_get(&self) -> Result<T, Empty> {
        self.rx.try_recv().map_err(|_| Empty)
    }

    /// Blocking enqueue; yields to the scheduler while the queue is full.
    pub fn put(&self, item: T) -> Result<(), Disconnected> {
        self.tx.send(item).map_err(|_| Disconnected)
    }

    /// Blocking dequeue; yields to the scheduler while the queue is empty.
    pub fn get(&self) -> Result<T, Disconnected> {
        self.rx.recv().map_err(|_| Disconnected)
    }

    /// Blocking dequeue bounded by a timeout, used by loops that must also
    /// observe a cancellation flag between items.
    pub fn get_timeout(&self, timeout: std::time::Duration) -> Result<T, Empty> {
        self.rx.recv_timeout(timeout).map_err(|_| Empty)
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl<T> Default for BoundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
