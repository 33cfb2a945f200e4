// Network interface enumeration and byte counters via sysinfo

mod linux;

use crate::error::InterfaceError;
use crate::models::{ByteCounters, InterfaceInfo, InterfaceKind, OperStatus};
use std::future::Future;
use std::sync::Arc;
use sysinfo::Networks;
use tracing::instrument;

/// OS capability the sampler reads from. Every call may fail; interfaces come and go
/// between two reads.
pub trait InterfaceSource: Send + Sync + 'static {
    /// All interfaces the OS currently reports, with status, kind and cumulative counters.
    fn list_interfaces(
        &self,
    ) -> impl Future<Output = Result<Vec<InterfaceInfo>, InterfaceError>> + Send;

    /// Current cumulative counters of one interface.
    fn read_counters(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<ByteCounters, InterfaceError>> + Send;

    /// Cheap liveness check: operational status only.
    fn is_up(&self, name: &str) -> impl Future<Output = Result<bool, InterfaceError>> + Send;
}

pub struct SysinfoInterfaceSource {
    networks: Arc<std::sync::Mutex<Networks>>,
}

impl Default for SysinfoInterfaceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoInterfaceSource {
    pub fn new() -> Self {
        Self {
            networks: Arc::new(std::sync::Mutex::new(Networks::new_with_refreshed_list())),
        }
    }

    fn status_of(name: &str) -> OperStatus {
        // Off Linux there is no operstate; being listed is the best signal we have.
        linux::read_oper_status(name).unwrap_or(OperStatus::Up)
    }

    fn kind_of(name: &str) -> InterfaceKind {
        linux::read_interface_kind(name).unwrap_or_else(|| linux::kind_from_name(name))
    }
}

impl InterfaceSource for SysinfoInterfaceSource {
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "list_interfaces"))]
    async fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>, InterfaceError> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| InterfaceError::Query(format!("sysinfo networks lock poisoned: {}", e)))?;
            networks_guard.refresh(true);
            let mut interfaces: Vec<InterfaceInfo> = networks_guard
                .list()
                .iter()
                .map(|(name, data)| InterfaceInfo {
                    name: name.clone(),
                    kind: Self::kind_of(name),
                    status: Self::status_of(name),
                    counters: ByteCounters::new(data.total_received(), data.total_transmitted()),
                })
                .collect();
            // HashMap order is random; keep enumeration order stable between calls.
            interfaces.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(interfaces)
        })
        .await?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "read_counters"))]
    async fn read_counters(&self, name: &str) -> Result<ByteCounters, InterfaceError> {
        let networks = self.networks.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| InterfaceError::Query(format!("sysinfo networks lock poisoned: {}", e)))?;
            networks_guard.refresh(true);
            networks_guard
                .list()
                .get(&name)
                .map(|data| ByteCounters::new(data.total_received(), data.total_transmitted()))
                .ok_or(InterfaceError::NotFound(name))
        })
        .await?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "is_up"))]
    async fn is_up(&self, name: &str) -> Result<bool, InterfaceError> {
        let networks = self.networks.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            if let Some(status) = linux::read_oper_status(&name) {
                return Ok(status == OperStatus::Up);
            }
            let mut networks_guard = networks
                .lock()
                .map_err(|e| InterfaceError::Query(format!("sysinfo networks lock poisoned: {}", e)))?;
            networks_guard.refresh(true);
            Ok(networks_guard.list().contains_key(&name))
        })
        .await?
    }
}
