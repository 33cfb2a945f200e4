// Domain models: interface rows from the OS and published rate snapshots

mod interface;
mod rate;

pub use interface::{ByteCounters, InterfaceHandle, InterfaceInfo, InterfaceKind, OperStatus};
pub use rate::{RateSnapshot, SpeedUnit};
