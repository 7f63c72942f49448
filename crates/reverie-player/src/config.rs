//! Player configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Settings for one player run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Narrative manifest to load instead of the shipped one.
    pub manifest: Option<PathBuf>,
    /// Directory track sources are resolved against.
    pub asset_root: PathBuf,
    /// Start with audio muted.
    pub start_muted: bool,
    /// How often live volumes are pushed to the backend.
    pub control_rate_hz: u32,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            asset_root: PathBuf::from("assets"),
            start_muted: false,
            control_rate_hz: 60,
            log_format: LogFormat::Pretty,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Config(format!("{key} must be a boolean, got {other:?}"))),
    }
}

impl PlayerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let manifest = lookup("REVERIE_MANIFEST")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let asset_root = lookup("REVERIE_ASSET_ROOT").map_or(defaults.asset_root, PathBuf::from);
        let start_muted = match lookup("REVERIE_START_MUTED") {
            Some(value) => parse_bool("REVERIE_START_MUTED", &value)?,
            None => defaults.start_muted,
        };
        let control_rate_hz = match lookup("REVERIE_CONTROL_RATE_HZ") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|hz| (1..=1000).contains(hz))
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "REVERIE_CONTROL_RATE_HZ must be an integer in 1..=1000, got {value:?}"
                    ))
                })?,
            None => defaults.control_rate_hz,
        };
        let log_format = match lookup("REVERIE_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "REVERIE_LOG_FORMAT must be pretty or json, got {other:?}"
                )));
            }
        };

        Ok(Self {
            manifest,
            asset_root,
            start_muted,
            control_rate_hz,
            log_format,
        })
    }

    /// Interval between control-rate ticks.
    #[must_use]
    pub fn control_period(&self) -> Duration {
        Duration::from_secs(1) / self.control_rate_hz.max(1)
    }
}
