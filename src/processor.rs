//! L4 Processor (§4.7): the single worker thread that pulls one
//! [`RoutedItem`] at a time and runs it through the Subprocessor/Worker
//! dispatch loop until it reaches a terminal status (P6).

use crate::connectivity::ConnectivityManager;
use crate::context::UtimContext;
use crate::routing::{ProcessItem, RoutedItem};
use crate::subprocessor::device::DeviceSubprocessor;
use crate::subprocessor::platform::PlatformSubprocessor;
use crate::subprocessor::uhost::UhostSubprocessor;
use crate::subprocessor::Subprocessor;
use crate::tag::{Address, DataType, Status};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const LOOP_POLL: Duration = Duration::from_millis(200);

/// Drives a single [`RoutedItem`] through the dispatch loop described in
/// §4.7: dispatch on the current "active address", then inspect the
/// returned item's `(source, destination)` shape to decide the next active
/// address, until `status` reaches `TO_SEND` or `FINALIZED`.
pub struct Processor {
    connectivity: Arc<ConnectivityManager>,
    device: DeviceSubprocessor,
    uhost: UhostSubprocessor,
    platform: PlatformSubprocessor,
    run: Arc<AtomicBool>,
}

impl Processor {
    /// Builds a processor driven by `connectivity`'s inbound queue.
    pub fn new(connectivity: Arc<ConnectivityManager>) -> Self {
        Self {
            connectivity,
            device: DeviceSubprocessor,
            uhost: UhostSubprocessor,
            platform: PlatformSubprocessor,
            run: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Runs the dispatch loop on the current thread until `stop` is called.
    /// Intended to be the body of the Processor's dedicated OS thread
    /// (§5).
    pub fn run(&self, ctx: &mut UtimContext) {
        while self.run.load(Ordering::Acquire) {
            match self.connectivity.receive_timeout(LOOP_POLL) {
                Some(routed) => self.drive_one(ctx, routed),
                None => continue,
            }
        }
    }

    /// Drives a single routed item to a terminal state and, if it ends up
    /// destined somewhere other than Utim itself, enqueues it on the
    /// Connectivity Manager's outbound queue.
    pub fn drive_one(&self, ctx: &mut UtimContext, routed: RoutedItem) {
        let mut item = ProcessItem::from_routed(routed);
        let mut active = item.source;

        loop {
            item = self.dispatch(active, ctx, item);
            if item.is_terminal() {
                break;
            }
            match self.next_active(&item) {
                Some(next) => active = next,
                None => {
                    // Neither shape in §4.7 matched: error_handler finalizes
                    // and exits the loop.
                    item = item.finalize();
                    break;
                }
            }
        }

        self.route_terminal(item);
    }

    fn dispatch(&self, active: Address, ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
        match active {
            Address::Device => self.device.process(ctx, item),
            Address::Uhost => self.uhost.process(ctx, item),
            Address::Platform => self.platform.process(ctx, item),
            Address::Utim => item.finalize(),
        }
    }

    /// §4.7's two recognized transition shapes: an outbound hop (`source ==
    /// Utim`, `destination != Utim`) moves the active address to
    /// `destination`; a still-ingesting hop (`source != Utim`, `destination
    /// == Utim`) moves it back to `source`. Anything else is unrecognized.
    fn next_active(&self, item: &ProcessItem) -> Option<Address> {
        if item.source == Address::Utim && item.destination != Address::Utim {
            Some(item.destination)
        } else if item.source != Address::Utim && item.destination == Address::Utim {
            Some(item.source)
        } else {
            None
        }
    }

    fn route_terminal(&self, item: ProcessItem) {
        if item.status != Status::ToSend {
            return;
        }
        let Some(body) = item.body else { return };
        let dest = match item.destination {
            Address::Device => DataType::Device,
            Address::Uhost => DataType::Uhost,
            Address::Platform => DataType::Platform,
            Address::Utim => return,
        };
        let _ = self.connectivity.send(dest, body);
    }

    /// Idempotently stops the dispatch loop.
    pub fn stop(&self) {
        self.run.store(false, Ordering::Release);
    }
}
