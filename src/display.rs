// Text rendering of a rate snapshot for the display collaborator

use crate::models::{RateSnapshot, SpeedUnit};

/// Shown when both directions are hidden.
pub const NO_DATA: &str = "No data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub unit: SpeedUnit,
    pub decimal_places: usize,
    pub show_download: bool,
    pub show_upload: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            unit: SpeedUnit::MBps,
            decimal_places: 1,
            show_download: true,
            show_upload: true,
        }
    }
}

/// `"↓1.5MB/s ↑0.2MB/s"`, dropping hidden directions.
pub fn format_rates(snapshot: &RateSnapshot, settings: &DisplaySettings) -> String {
    let (down, up) = snapshot.in_unit(settings.unit);
    let unit = settings.unit.label();
    let places = settings.decimal_places;

    let mut parts = Vec::with_capacity(2);
    if settings.show_download {
        parts.push(format!("↓{:.*}{}", places, down, unit));
    }
    if settings.show_upload {
        parts.push(format!("↑{:.*}{}", places, up, unit));
    }
    if parts.is_empty() {
        return NO_DATA.to_string();
    }
    parts.join(" ")
}
