//! Device subprocessor (§4.7.1).

use super::Subprocessor;
use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tag::Inbound;
use crate::workers;

/// Dispatches on `body[0]` among the `Inbound` tags.
#[derive(Debug, Default)]
pub struct DeviceSubprocessor;

impl Subprocessor for DeviceSubprocessor {
    fn process(&self, ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
        match item.command_tag().and_then(Inbound::from_u8) {
            Some(Inbound::NetworkReady) => workers::startup::device_worker_startup(ctx, item),
            Some(Inbound::DataToPlatform) => workers::forward::device_worker_forward(ctx, item),
            None => item.finalize(),
        }
    }
}
