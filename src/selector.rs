// Picks the interface to sample from the ones the OS reports up.
//
// "Best" is a heuristic, not default-route detection: ethernet beats wireless beats
// anything else, and within a kind the interface that has received the most bytes wins.

use crate::interface_repo::InterfaceSource;
use crate::models::{InterfaceHandle, InterfaceInfo, OperStatus};
use tracing::warn;

/// Usable for sampling: up, not loopback/tunnel, and has carried traffic at least once.
pub fn qualifies(info: &InterfaceInfo) -> bool {
    info.status == OperStatus::Up && info.kind.is_monitorable() && info.counters.received > 0
}

/// Pure selection over one enumeration. Ties on equal received bytes resolve to the
/// first candidate in enumeration order.
pub fn pick_best(interfaces: &[InterfaceInfo]) -> Option<&InterfaceInfo> {
    interfaces.iter().filter(|i| qualifies(i)).fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(current) => {
            let better_kind = candidate.kind.priority() < current.kind.priority();
            let same_kind_more_traffic = candidate.kind.priority() == current.kind.priority()
                && candidate.counters.received > current.counters.received;
            if better_kind || same_kind_more_traffic {
                Some(candidate)
            } else {
                Some(current)
            }
        }
    })
}

/// Enumerate and pick. `None` means "currently unmonitorable", including when the
/// enumeration itself failed.
pub async fn select_active_interface<S: InterfaceSource>(source: &S) -> Option<InterfaceHandle> {
    match source.list_interfaces().await {
        Ok(interfaces) => pick_best(&interfaces).map(InterfaceInfo::handle),
        Err(e) => {
            warn!(
                error = %e,
                operation = "select_active_interface",
                "interface enumeration failed"
            );
            None
        }
    }
}

/// Liveness check run before every counter read. A failed check counts as down.
pub async fn is_still_active<S: InterfaceSource>(source: &S, handle: &InterfaceHandle) -> bool {
    source.is_up(&handle.name).await.unwrap_or(false)
}
