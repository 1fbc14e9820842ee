//! L5 Subprocessors (§4.7.1–4.7.3): the three address-keyed handlers the
//! Processor dispatches a [`ProcessItem`] to.

/// Device subprocessor (§4.7.1).
pub mod device;
/// Platform subprocessor (§4.7.3).
pub mod platform;
/// Uhost subprocessor (§4.7.2).
pub mod uhost;

use crate::context::UtimContext;
use crate::routing::ProcessItem;

/// One address-keyed handler in the routing state machine.
pub trait Subprocessor {
    /// Advances `item` by one dispatch step.
    fn process(&self, ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem;
}
