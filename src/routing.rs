//! Routed items (§3): the records that flow between the Connectivity Manager,
//! the Processor, the Subprocessors and the Workers.

use crate::tag::{Address, Status};

/// Produced by the Connectivity Manager, consumed by the Processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedItem {
    /// Which side the frame arrived from.
    pub address: Address,
    /// The frame's body, with framing already stripped.
    pub body: Vec<u8>,
}

/// The unit of work threaded through the Processor/Subprocessor/Worker
/// dispatch loop. Replaces the source's mixed-type list with a single
/// tagged record (§9 redesign guidance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessItem {
    /// Where this item originated.
    pub source: Address,
    /// Where this item is headed.
    pub destination: Address,
    /// Lifecycle state.
    pub status: Status,
    /// The payload, if any; `None` only ever appears transiently inside a
    /// worker that is about to finalize without producing output.
    pub body: Option<Vec<u8>>,
}

impl ProcessItem {
    /// Builds the initial item the Processor synthesises for a freshly
    /// pulled [`RoutedItem`]: `source = routed.address`, `destination =
    /// Utim`, `status = Process`.
    pub fn from_routed(routed: RoutedItem) -> Self {
        Self {
            source: routed.address,
            destination: Address::Utim,
            status: Status::Process,
            body: Some(routed.body),
        }
    }

    /// True once this item is terminal (`TO_SEND` or `FINALIZED`, I2).
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, Status::ToSend | Status::Finalized)
    }

    /// Marks the item finalized, dropping the body.
    pub fn finalize(mut self) -> Self {
        self.status = Status::Finalized;
        self.body = None;
        self
    }

    /// The first byte of the body, used throughout the Subprocessors to
    /// dispatch on a command tag.
    pub fn command_tag(&self) -> Option<u8> {
        self.body.as_ref().and_then(|b| b.first().copied())
    }
}
