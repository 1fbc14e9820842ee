//! Platform subprocessor (§4.7.3).
//!
//! A no-op placeholder: the concrete Platform-specific (Azure/AWS) adaptors
//! are out of scope (§1). Present so dispatch remains total — it must never
//! panic, regardless of what reaches it.

use super::Subprocessor;
use crate::context::UtimContext;
use crate::routing::ProcessItem;

/// Finalizes every item it receives without further action.
#[derive(Debug, Default)]
pub struct PlatformSubprocessor;

impl Subprocessor for PlatformSubprocessor {
    fn process(&self, _ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
        item.finalize()
    }
}
