//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_timing;

pub use schema_timing::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub sub_frame: SubFrameConfig,

    #[serde(default)]
    pub sentinel: SentinelConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub iframe: IframeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sub-frame position resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubFrameConfig {
    /// Frame boundaries a descriptor may cross before the chain is abandoned.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for SubFrameConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> u32 {
    8
}

/// Tamper-guard thresholds for the menu iframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Observer callbacks tolerated inside one window.
    #[serde(default = "default_max_observer_iterations")]
    pub max_observer_iterations: u32,

    /// Attribute reversions tolerated inside one window.
    #[serde(default = "default_max_foreign_mutations")]
    pub max_foreign_mutations: u32,

    /// Quiet period after which both counters reset.
    #[serde(default = "default_counter_reset_ms")]
    pub counter_reset_ms: u64,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            max_observer_iterations: default_max_observer_iterations(),
            max_foreign_mutations: default_max_foreign_mutations(),
            counter_reset_ms: default_counter_reset_ms(),
        }
    }
}

fn default_max_observer_iterations() -> u32 {
    20
}

fn default_max_foreign_mutations() -> u32 {
    10
}

fn default_counter_reset_ms() -> u64 {
    2000
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for the daily-rotated log file. `~` is expanded.
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "~/.autofill-overlay/logs".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
