//! `utim_worker_connection_string` (§4.8.5): unwraps a cloud-platform
//! connection string and loops the inner payload back for further dispatch.

use crate::context::UtimContext;
use crate::routing::ProcessItem;
use crate::tag::{Address, Status, Uplatform};
use crate::tlv;

/// Handles `UCOMMAND.CONNECTION_STRING`. The outer TLV wraps a second TLV
/// tagged with a [`Uplatform`] selector; on a recognized selector, the inner
/// payload is looped back as `(Uhost, Utim, Process, payload)` so the Uhost
/// subprocessor dispatches it again. An unrecognized selector, or malformed
/// framing, finalizes the item.
pub fn utim_worker_connection_string(ctx: &mut UtimContext, item: ProcessItem) -> ProcessItem {
    let Some(body) = item.body.as_deref() else {
        return item.finalize();
    };
    let Ok(outer) = tlv::decode(body) else {
        return item.finalize();
    };
    let Ok(inner) = tlv::decode(&outer.value) else {
        return item.finalize();
    };
    let Some(_platform) = Uplatform::from_u8(inner.tag) else {
        return item.finalize();
    };

    ctx.platform_config = Some(serde_json::json!({
        "platform": inner.tag,
    }));

    ProcessItem {
        source: Address::Uhost,
        destination: Address::Utim,
        status: Status::Process,
        body: Some(inner.value),
    }
}
