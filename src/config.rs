use crate::display::DisplaySettings;
use crate::models::SpeedUnit;
use crate::sampler::{
    DEFAULT_FALLBACK_INTERVAL_MS, DEFAULT_STOP_TIMEOUT_MS, DEFAULT_UPDATE_INTERVAL_MS,
    SamplerConfig,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound for the user-facing update interval.
const MAX_UPDATE_INTERVAL_MS: u64 = 60_000;
const MAX_DECIMAL_PLACES: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Start on login (XDG autostart entry).
    #[serde(default)]
    pub autostart: bool,
    #[serde(default)]
    pub sampler: SamplingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// Wait between retries while no interface qualifies.
    #[serde(default = "default_fallback_interval_ms")]
    pub fallback_interval_ms: u64,
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

fn default_update_interval_ms() -> u64 {
    DEFAULT_UPDATE_INTERVAL_MS
}

fn default_fallback_interval_ms() -> u64 {
    DEFAULT_FALLBACK_INTERVAL_MS
}

fn default_stop_timeout_ms() -> u64 {
    DEFAULT_STOP_TIMEOUT_MS
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            fallback_interval_ms: DEFAULT_FALLBACK_INTERVAL_MS,
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
        }
    }
}

impl SamplingConfig {
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            update_interval_ms: self.update_interval_ms,
            fallback_interval_ms: self.fallback_interval_ms,
            stop_timeout_ms: self.stop_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How often the display re-renders, independent of the sampler's tick rate.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default)]
    pub unit: SpeedUnit,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: usize,
    #[serde(default = "default_true")]
    pub show_download: bool,
    #[serde(default = "default_true")]
    pub show_upload: bool,
}

fn default_refresh_interval_ms() -> u64 {
    50
}

fn default_decimal_places() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            unit: SpeedUnit::MBps,
            decimal_places: default_decimal_places(),
            show_download: true,
            show_upload: true,
        }
    }
}

impl DisplayConfig {
    pub fn settings(&self) -> DisplaySettings {
        DisplaySettings {
            unit: self.unit,
            decimal_places: self.decimal_places,
            show_download: self.show_download,
            show_upload: self.show_upload,
        }
    }
}

impl AppConfig {
    /// Path from `SPEEDOMETER_CONFIG`, else `speedometer.toml` in the working directory.
    pub fn path() -> String {
        std::env::var("SPEEDOMETER_CONFIG").unwrap_or_else(|_| "speedometer.toml".into())
    }

    /// Load from [`AppConfig::path`], writing defaults there on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_or_create(Self::path())
    }

    /// Like [`AppConfig::load_from_path`], but a missing file is created with defaults.
    pub fn load_or_create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_from_path(path);
        }
        let config = Self::default();
        config.save(path)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!("read {}: {}", path.display(), e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Write as TOML, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.sampler.update_interval_ms > 0
                && self.sampler.update_interval_ms <= MAX_UPDATE_INTERVAL_MS,
            "sampler.update_interval_ms must be between 1 and {}, got {}",
            MAX_UPDATE_INTERVAL_MS,
            self.sampler.update_interval_ms
        );
        anyhow::ensure!(
            self.sampler.fallback_interval_ms > 0,
            "sampler.fallback_interval_ms must be > 0, got {}",
            self.sampler.fallback_interval_ms
        );
        anyhow::ensure!(
            self.sampler.stop_timeout_ms > 0,
            "sampler.stop_timeout_ms must be > 0, got {}",
            self.sampler.stop_timeout_ms
        );
        anyhow::ensure!(
            self.display.refresh_interval_ms > 0,
            "display.refresh_interval_ms must be > 0, got {}",
            self.display.refresh_interval_ms
        );
        anyhow::ensure!(
            self.display.decimal_places <= MAX_DECIMAL_PLACES,
            "display.decimal_places must be <= {}, got {}",
            MAX_DECIMAL_PLACES,
            self.display.decimal_places
        );
        anyhow::ensure!(
            self.display.show_download || self.display.show_upload,
            "display: at least one of show_download/show_upload must be true"
        );
        Ok(())
    }
}
