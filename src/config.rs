//! Configuration
//!
//! Loaded in order of precedence:
//! 1. Command-line flags of the demo binary (highest priority)
//! 2. Config file (TOML)
//! 3. Built-in defaults (lowest priority)

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

use crate::error::ImError;

pub const DEFAULT_PADDING: u16 = 5;
pub const DEFAULT_LABELFRAME_PADDING: u16 = 15;
pub const DEFAULT_LOOP_INTERVAL_MS: u64 = 50;

/// When refreshes happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Only in response to a triggering native event.
    Callback,
    /// On a fixed-delay timer, independent of input.
    Loop { interval: Duration },
}

impl RefreshPolicy {
    pub fn loop_every(ms: u64) -> Self {
        RefreshPolicy::Loop {
            interval: Duration::from_millis(ms),
        }
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, RefreshPolicy::Callback)
    }

    /// Builds a policy from a mode name and a loop interval.
    pub fn from_mode(mode: &str, interval_ms: u64) -> Result<Self, ImError> {
        match mode {
            "callback" => Ok(RefreshPolicy::Callback),
            "loop" => Ok(RefreshPolicy::loop_every(interval_ms)),
            other => Err(ImError::InvalidOption {
                option: "refresh mode",
                value: other.to_string(),
            }),
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        RefreshPolicy::Callback
    }
}

impl FromStr for RefreshPolicy {
    type Err = ImError;

    /// `callback`, `loop`, or a bare number of milliseconds meaning `loop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u64>() {
            Ok(ms) => Ok(RefreshPolicy::loop_every(ms)),
            Err(_) => RefreshPolicy::from_mode(s, DEFAULT_LOOP_INTERVAL_MS),
        }
    }
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshPolicy::Callback => write!(f, "callback"),
            RefreshPolicy::Loop { interval } => write!(f, "loop ({} ms)", interval.as_millis()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Gap between widgets and around the content
    pub padding: u16,
    /// Extra bottom margin of label-frames for their title chrome
    pub labelframe_padding: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            labelframe_padding: DEFAULT_LABELFRAME_PADDING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub file: PathBuf,
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("imtui.log"),
            filter: "debug".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub refresh: RefreshPolicy,
    pub layout: LayoutConfig,
    pub logging: LoggingConfig,
}

// ─────────────────────────────────────────────────────────────────────────────
// File representation (every field optional)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    refresh: Option<FileRefresh>,
    layout: Option<FileLayout>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileRefresh {
    mode: Option<String>,
    interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLayout {
    padding: Option<u16>,
    labelframe_padding: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileLogging {
    file: Option<PathBuf>,
    filter: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::load_over(path, Config::default())
    }

    /// Loads `path`, taking every value the file leaves out from `defaults`.
    pub fn load_over(path: &Path, defaults: Config) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_over(&text, defaults)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Self::from_toml_over(text, Config::default())
    }

    pub fn from_toml_over(text: &str, defaults: Config) -> anyhow::Result<Self> {
        let file: FileConfig = toml::from_str(text)?;

        let refresh = match file.refresh {
            Some(r) => RefreshPolicy::from_mode(
                r.mode.as_deref().unwrap_or("callback"),
                r.interval_ms.unwrap_or(DEFAULT_LOOP_INTERVAL_MS),
            )?,
            None => defaults.refresh,
        };
        let layout = file.layout.unwrap_or_default();
        let logging = file.logging.unwrap_or_default();

        Ok(Config {
            refresh,
            layout: LayoutConfig {
                padding: layout.padding.unwrap_or(defaults.layout.padding),
                labelframe_padding: layout
                    .labelframe_padding
                    .unwrap_or(defaults.layout.labelframe_padding),
            },
            logging: LoggingConfig {
                file: logging.file.unwrap_or(defaults.logging.file),
                filter: logging.filter.unwrap_or(defaults.logging.filter),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::im_error;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_loop_mode_with_interval() {
        let config = Config::from_toml(
            r#"
            [refresh]
            mode = "loop"
            interval_ms = 20

            [layout]
            padding = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.refresh, RefreshPolicy::loop_every(20));
        assert_eq!(config.layout.padding, 1);
        assert_eq!(config.layout.labelframe_padding, DEFAULT_LABELFRAME_PADDING);
    }

    #[test]
    fn test_missing_tables_keep_given_defaults() {
        let base = Config {
            layout: LayoutConfig {
                padding: 1,
                labelframe_padding: 1,
            },
            ..Config::default()
        };
        let config = Config::from_toml_over("[layout]\nlabelframe_padding = 2", base.clone()).unwrap();
        assert_eq!(config.layout.padding, 1);
        assert_eq!(config.layout.labelframe_padding, 2);

        let config = Config::from_toml_over("[refresh]\nmode = \"loop\"", base).unwrap();
        assert_eq!(config.layout.padding, 1);
        assert_eq!(config.refresh, RefreshPolicy::loop_every(DEFAULT_LOOP_INTERVAL_MS));
    }

    #[test]
    fn test_unknown_mode_is_invalid_option() {
        let err = Config::from_toml("[refresh]\nmode = \"sometimes\"").unwrap_err();
        assert!(matches!(
            im_error(&err),
            Some(ImError::InvalidOption { option: "refresh mode", .. })
        ));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("callback".parse::<RefreshPolicy>(), Ok(RefreshPolicy::Callback));
        assert_eq!("30".parse::<RefreshPolicy>(), Ok(RefreshPolicy::loop_every(30)));
        assert_eq!(
            "loop".parse::<RefreshPolicy>(),
            Ok(RefreshPolicy::loop_every(DEFAULT_LOOP_INTERVAL_MS))
        );
        assert!("idle".parse::<RefreshPolicy>().is_err());
    }
}
