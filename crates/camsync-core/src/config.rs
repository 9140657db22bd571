//! Configuration module for camsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::Slot;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "CAMSYNC_CONFIG";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for camsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub sync: SyncConfig,
    pub network: NetworkConfig,
    pub logging: LoggingConfig,
}

/// Camera adapter connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Base URL of the adapter's HTTP server.
    pub host: String,
    /// Root folder the adapter exposes albums under.
    pub storage_root: String,
    /// Storage slots to crawl.
    pub slots: Vec<Slot>,
    /// Number of file names requested per listing page.
    pub page_size: u32,
    /// Timeout applied to every request, in milliseconds.
    pub request_timeout_ms: u64,
}

/// Sync loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Local directory photos are mirrored into (album structure is flattened).
    pub destination: PathBuf,
    /// Seconds to sleep between ticks, regardless of outcome.
    pub poll_interval_secs: u64,
    /// Skip a cycle when a non-empty baseline is followed by an empty crawl.
    pub ignore_empty_crawl: bool,
}

/// Device network detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Substring the adapter's SSID is expected to contain.
    pub ssid_pattern: String,
    /// When false, every tick attempts a sync without checking the SSID.
    pub require_device_network: bool,
    /// Wireless interface to query on macOS (defaults to `en0`).
    pub interface: Option<String>,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
impl DeviceConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path`, or [`Config::default`] if there is no file there.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/camsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("camsync")
            .join("config.yaml")
    }

    /// The configuration path to use: [`CONFIG_PATH_ENV`] if set, else
    /// [`Config::default_path`].
    pub fn resolve_path() -> PathBuf {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => Self::default_path(),
        }
    }

    /// Delay between sync ticks as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.sync.poll_interval_secs)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: "http://10.98.32.1:8080".to_string(),
            storage_root: "DCIM".to_string(),
            slots: Slot::defaults(),
            page_size: 1000,
            request_timeout_ms: 1000,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("photos"),
            poll_interval_secs: 5,
            ignore_empty_crawl: true,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid_pattern: "WeyeFeye".to_string(),
            require_device_network: true,
            interface: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"device.page_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- device ---
        match url::Url::parse(&self.device.host) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError {
                field: "device.host".into(),
                message: format!("unsupported scheme '{}'; expected http or https", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError {
                field: "device.host".into(),
                message: format!("not a valid URL: {e}"),
            }),
        }
        let root = &self.device.storage_root;
        if root.is_empty() || root.contains('/') || root.contains("..") {
            errors.push(ValidationError {
                field: "device.storage_root".into(),
                message: format!("must be a single folder name, got '{root}'"),
            });
        }
        if self.device.slots.is_empty() {
            errors.push(ValidationError {
                field: "device.slots".into(),
                message: "at least one slot is required".into(),
            });
        }
        let mut seen = self.device.slots.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.device.slots.len() {
            errors.push(ValidationError {
                field: "device.slots".into(),
                message: "slots must not repeat".into(),
            });
        }
        if self.device.page_size == 0 {
            errors.push(ValidationError {
                field: "device.page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.device.request_timeout_ms == 0 {
            errors.push(ValidationError {
                field: "device.request_timeout_ms".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- sync ---
        if self.sync.poll_interval_secs == 0 {
            errors.push(ValidationError {
                field: "sync.poll_interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.destination.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "sync.destination".into(),
                message: "must not be empty".into(),
            });
        }

        // --- network ---
        if self.network.require_device_network && self.network.ssid_pattern.trim().is_empty() {
            errors.push(ValidationError {
                field: "network.ssid_pattern".into(),
                message: "must not be empty while require_device_network is set".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use camsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .device_host("http://127.0.0.1:8080")
///     .sync_destination(PathBuf::from("/home/user/Pictures/camera"))
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- device ---

    pub fn device_host(mut self, host: impl Into<String>) -> Self {
        self.config.device.host = host.into();
        self
    }

    pub fn device_storage_root(mut self, root: impl Into<String>) -> Self {
        self.config.device.storage_root = root.into();
        self
    }

    pub fn device_slots(mut self, slots: Vec<Slot>) -> Self {
        self.config.device.slots = slots;
        self
    }

    pub fn device_page_size(mut self, n: u32) -> Self {
        self.config.device.page_size = n;
        self
    }

    pub fn device_request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.device.request_timeout_ms = ms;
        self
    }

    // --- sync ---

    pub fn sync_destination(mut self, destination: PathBuf) -> Self {
        self.config.sync.destination = destination;
        self
    }

    pub fn sync_poll_interval_secs(mut self, seconds: u64) -> Self {
        self.config.sync.poll_interval_secs = seconds;
        self
    }

    pub fn sync_ignore_empty_crawl(mut self, ignore: bool) -> Self {
        self.config.sync.ignore_empty_crawl = ignore;
        self
    }

    // --- network ---

    pub fn network_ssid_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.network.ssid_pattern = pattern.into();
        self
    }

    pub fn network_require_device_network(mut self, require: bool) -> Self {
        self.config.network.require_device_network = require;
        self
    }

    pub fn network_interface(mut self, interface: impl Into<String>) -> Self {
        self.config.network.interface = Some(interface.into());
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
