//! Configuration for the lookup tool
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `PDG_LOOKUP__*` environment variables. CLI flags are applied on
//! top by the binary.
//!
//! # Configuration File Format
//!
//! ```toml
//! [resolver]
//! backend = "process"
//! python = "python3"
//! package = "particle==0.21.2"
//! install_missing = false
//! timeout_secs = 30
//!
//! [ui]
//! default_mode = "pdg_id"
//! show_header = true
//! tick_rate_ms = 100
//! ```

use crate::error::{LookupError, Result};
use crate::types::SearchMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix; nested keys use `__`, e.g. `PDG_LOOKUP__RESOLVER__PYTHON`
pub const ENV_PREFIX: &str = "PDG_LOOKUP";

/// Which resolver implementation backs the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Spawn the Python interpreter once per query
    #[default]
    Process,

    /// Embed CPython in-process (requires the `python` feature)
    Embedded,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "process" => Ok(BackendKind::Process),
            "embedded" => Ok(BackendKind::Embedded),
            other => Err(format!("Unknown resolver backend: {}", other)),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub resolver: ResolverSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Resolver settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Backend implementation
    #[serde(default)]
    pub backend: BackendKind,

    /// Python interpreter used by the process backend
    #[serde(default = "default_python")]
    pub python: String,

    /// pip requirement for the particle data package
    #[serde(default = "default_package")]
    pub package: String,

    /// Install `package` with pip when importing it fails
    #[serde(default)]
    pub install_missing: bool,

    /// Upper bound on a single resolve call; unset means wait forever
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ResolverSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            python: default_python(),
            package: default_package(),
            install_missing: false,
            timeout_secs: None,
        }
    }
}

/// Terminal UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Mode selected at startup
    #[serde(default)]
    pub default_mode: SearchMode,

    /// Show the title bar
    #[serde(default = "default_true")]
    pub show_header: bool,

    /// Event poll interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_mode: SearchMode::default(),
            show_header: true,
            tick_rate_ms: default_tick_rate(),
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_package() -> String {
    "particle==0.21.2".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

impl LookupConfig {
    /// Load configuration from an optional file plus the environment
    ///
    /// A missing file is not an error; the defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                tracing::info!("Loading configuration from {:?}", path);
            } else {
                tracing::info!("Config file not found, using defaults: {:?}", path);
            }
            builder = builder.add_source(
                config::File::from(path.to_path_buf())
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: LookupConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LookupError::Other(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.resolver.python.trim().is_empty() {
            return Err(config_error("resolver.python must not be empty"));
        }
        if self.resolver.package.trim().is_empty() {
            return Err(config_error("resolver.package must not be empty"));
        }
        if self.resolver.timeout_secs == Some(0) {
            return Err(config_error("resolver.timeout_secs must be positive"));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(config_error("ui.tick_rate_ms must be positive"));
        }
        Ok(())
    }

    /// Default config path (`$XDG_CONFIG_HOME/pdg-lookup/config.toml`)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdg-lookup")
            .join("config.toml")
    }
}

fn config_error(msg: &str) -> LookupError {
    LookupError::Config(config::ConfigError::Message(msg.to_string()))
}
