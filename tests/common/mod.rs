// Shared test helpers: a scripted interface source

#![allow(dead_code)]

use speedometer::error::InterfaceError;
use speedometer::interface_repo::InterfaceSource;
use speedometer::models::*;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub fn iface(name: &str, kind: InterfaceKind, received: u64, sent: u64) -> InterfaceInfo {
    InterfaceInfo {
        name: name.into(),
        kind,
        status: OperStatus::Up,
        counters: ByteCounters::new(received, sent),
    }
}

/// Interface source whose interfaces and counters the test sets directly.
#[derive(Default)]
pub struct FakeSource {
    interfaces: Mutex<Vec<InterfaceInfo>>,
    fail_list: AtomicBool,
    fail_reads: AtomicBool,
    read_delay: Mutex<Duration>,
    pub list_calls: AtomicUsize,
    pub read_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(interfaces: Vec<InterfaceInfo>) -> Self {
        Self {
            interfaces: Mutex::new(interfaces),
            ..Default::default()
        }
    }

    pub fn set_interfaces(&self, interfaces: Vec<InterfaceInfo>) {
        *self.interfaces.lock().unwrap() = interfaces;
    }

    pub fn set_counters(&self, name: &str, received: u64, sent: u64) {
        let mut guard = self.interfaces.lock().unwrap();
        let entry = guard
            .iter_mut()
            .find(|i| i.name == name)
            .expect("unknown fake interface");
        entry.counters = ByteCounters::new(received, sent);
    }

    pub fn set_status(&self, name: &str, status: OperStatus) {
        let mut guard = self.interfaces.lock().unwrap();
        let entry = guard
            .iter_mut()
            .find(|i| i.name == name)
            .expect("unknown fake interface");
        entry.status = status;
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every counter read take this long (on the tokio clock).
    pub fn set_read_delay(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = delay;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

impl InterfaceSource for FakeSource {
    async fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>, InterfaceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(InterfaceError::Query("scripted enumeration failure".into()));
        }
        Ok(self.interfaces.lock().unwrap().clone())
    }

    async fn read_counters(&self, name: &str) -> Result<ByteCounters, InterfaceError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.read_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(InterfaceError::Query("scripted read failure".into()));
        }
        self.interfaces
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.counters)
            .ok_or_else(|| InterfaceError::NotFound(name.to_string()))
    }

    async fn is_up(&self, name: &str) -> Result<bool, InterfaceError> {
        Ok(self
            .interfaces
            .lock()
            .unwrap()
            .iter()
            .any(|i| i.name == name && i.status == OperStatus::Up))
    }
}
