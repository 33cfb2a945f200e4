// Published throughput rates and their derived units

use serde::{Deserialize, Serialize};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;
const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// Latest download/upload rates in bytes per second. Both values are never negative.
///
/// Megabyte and megabit figures are always derived from these two fields on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub download_bytes_per_sec: f64,
    pub upload_bytes_per_sec: f64,
}

impl RateSnapshot {
    pub fn new(download_bytes_per_sec: f64, upload_bytes_per_sec: f64) -> Self {
        Self {
            download_bytes_per_sec,
            upload_bytes_per_sec,
        }
    }

    /// Download rate in MB/s (1 MB = 1024² bytes).
    pub fn download_mbytes_per_sec(&self) -> f64 {
        self.download_bytes_per_sec / BYTES_PER_MEGABYTE
    }

    /// Upload rate in MB/s (1 MB = 1024² bytes).
    pub fn upload_mbytes_per_sec(&self) -> f64 {
        self.upload_bytes_per_sec / BYTES_PER_MEGABYTE
    }

    /// Download rate in Mbps (1 Mbit = 10⁶ bits).
    pub fn download_mbits_per_sec(&self) -> f64 {
        self.download_bytes_per_sec * 8.0 / BITS_PER_MEGABIT
    }

    /// Upload rate in Mbps (1 Mbit = 10⁶ bits).
    pub fn upload_mbits_per_sec(&self) -> f64 {
        self.upload_bytes_per_sec * 8.0 / BITS_PER_MEGABIT
    }

    /// (download, upload) in the given unit.
    pub fn in_unit(&self, unit: SpeedUnit) -> (f64, f64) {
        match unit {
            SpeedUnit::MBps => (self.download_mbytes_per_sec(), self.upload_mbytes_per_sec()),
            SpeedUnit::Mbps => (self.download_mbits_per_sec(), self.upload_mbits_per_sec()),
        }
    }
}

/// Unit the display collaborator renders rates in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[default]
    #[serde(rename = "MBps")]
    MBps,
    #[serde(rename = "Mbps")]
    Mbps,
}

impl SpeedUnit {
    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::MBps => "MB/s",
            SpeedUnit::Mbps => "Mbps",
        }
    }
}
