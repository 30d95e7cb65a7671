//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{GazemapError, GazemapResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Accumulation/decay engine tuning.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Region analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tuning for the gaze accumulation engine and its periodic loops.
///
/// The bin radius is fixed for the lifetime of a store; changing it
/// mid-session would fragment existing bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Proximity radius (pixels) used to merge nearby samples into one bin.
    pub bin_radius: f64,

    /// Value added to an existing bin on every re-hit.
    pub accumulation_rate: f64,

    /// Multiplier applied to inactive bins on every decay tick.
    pub decay_rate: f64,

    /// Bins below this value are evicted.
    pub min_value: f64,

    /// Time without samples after which the active spot is released.
    pub gaze_timeout_ms: u64,

    /// Decay tick period.
    pub decay_interval_ms: u64,

    /// Render sampling period.
    pub render_interval_ms: u64,
}

/// Region analyzer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Edge length (pixels) of the coarse hotspot grid.
    pub hotspot_cell: f64,

    /// How many hotspots to report.
    pub hotspot_count: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gazemap=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bin_radius: 40.0,
            accumulation_rate: 0.3,
            decay_rate: 0.9,
            min_value: 0.1,
            gaze_timeout_ms: 200,
            decay_interval_ms: 10_000,
            render_interval_ms: 50,
        }
    }
}

impl EngineConfig {
    /// Reject values that would make the engine degenerate.
    pub fn validate(&self) -> GazemapResult<()> {
        if !self.bin_radius.is_finite() || self.bin_radius <= 0.0 {
            return Err(GazemapError::config(format!(
                "bin_radius must be positive, got {}",
                self.bin_radius
            )));
        }
        if !self.accumulation_rate.is_finite() || self.accumulation_rate < 0.0 {
            return Err(GazemapError::config(format!(
                "accumulation_rate must be non-negative, got {}",
                self.accumulation_rate
            )));
        }
        if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
            return Err(GazemapError::config(format!(
                "decay_rate must be in (0, 1], got {}",
                self.decay_rate
            )));
        }
        if !self.min_value.is_finite() || self.min_value < 0.0 {
            return Err(GazemapError::config(format!(
                "min_value must be non-negative, got {}",
                self.min_value
            )));
        }
        if self.decay_interval_ms == 0 || self.render_interval_ms == 0 {
            return Err(GazemapError::config(
                "decay and render intervals must be non-zero",
            ));
        }
        for (name, ms) in [
            ("gaze_timeout_ms", self.gaze_timeout_ms),
            ("decay_interval_ms", self.decay_interval_ms),
            ("render_interval_ms", self.render_interval_ms),
        ] {
            if ms.checked_mul(1_000_000).is_none() {
                return Err(GazemapError::config(format!(
                    "{name} is too large to express in nanoseconds, got {ms}"
                )));
            }
        }
        Ok(())
    }

    pub fn gaze_timeout_ns(&self) -> u64 {
        self.gaze_timeout_ms.saturating_mul(1_000_000)
    }

    pub fn decay_interval(&self) -> Duration {
        Duration::from_millis(self.decay_interval_ms)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hotspot_cell: 50.0,
            hotspot_count: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), error = %e, "Failed to load config, using defaults");
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &std::path::Path) -> GazemapResult<Self> {
        if !path.exists() {
            return Err(GazemapError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gazemap").join("config.json")
}
