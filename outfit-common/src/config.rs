//! Configuration loading and resolution
//!
//! Bootstrap configuration is a single TOML file. Resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`OUTFIT_CONFIG`)
//! 3. User config file (`<config_dir>/outfit/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing or broken file at the default location only produces a warning.
//! A file named explicitly (tiers 1 and 2) must exist and parse.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "OUTFIT_CONFIG";

/// Bootstrap configuration shared by all OUTFIT tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding the static parameter tables
    #[serde(default = "default_params_dir")]
    pub params_dir: PathBuf,

    /// Street parameter table, relative to `params_dir`
    #[serde(default = "default_street_params_file")]
    pub street_params_file: String,

    /// Emission coefficient table, relative to `params_dir`
    #[serde(default = "default_freq_coeffs_file")]
    pub freq_coeffs_file: String,

    /// A-weighting curve table, relative to `params_dir`
    #[serde(default = "default_curve_a_file")]
    pub curve_a_file: String,

    /// Write every intermediate pipeline table next to the output
    #[serde(default)]
    pub dump_stages: bool,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Header names used by the external attenuation matrix
    #[serde(default)]
    pub attenuation: AttenuationColumns,

    /// Routing service settings for travel-time collection
    #[serde(default)]
    pub directions: DirectionsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for timestamped log files (stderr only if not specified)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Column names of the attenuation matrix as exported by the propagation tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttenuationColumns {
    #[serde(default = "default_receiver_column")]
    pub receiver_column: String,

    #[serde(default = "default_source_column")]
    pub source_column: String,

    /// Column carrying the period codes (Ld/Le/Lx/Ln) that tag vehicle classes
    #[serde(default = "default_period_column")]
    pub period_column: String,

    #[serde(default = "default_x_column")]
    pub x_column: String,

    #[serde(default = "default_y_column")]
    pub y_column: String,

    /// Suffix appended to the band frequency, e.g. "500Hz dB(A)"
    #[serde(default = "default_band_suffix")]
    pub band_suffix: String,
}

impl AttenuationColumns {
    /// External header for a frequency band given in Hz
    pub fn band_header(&self, hz: u32) -> String {
        format!("{}{}", hz, self.band_suffix)
    }
}

/// Directions (routing) service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsConfig {
    /// API key (the `OUTFIT_DIRECTIONS_API_KEY` environment variable wins)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_directions_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_params_dir() -> PathBuf {
    PathBuf::from("params")
}

fn default_street_params_file() -> String {
    "street_params.csv".to_string()
}

fn default_freq_coeffs_file() -> String {
    "freq_coeffs.csv".to_string()
}

fn default_curve_a_file() -> String {
    "curve_A.csv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_receiver_column() -> String {
    "Ricevitore".to_string()
}

fn default_source_column() -> String {
    "Sorgente".to_string()
}

fn default_period_column() -> String {
    "ora intervallo".to_string()
}

fn default_x_column() -> String {
    "X/m".to_string()
}

fn default_y_column() -> String {
    "Y/m".to_string()
}

fn default_band_suffix() -> String {
    "Hz dB(A)".to_string()
}

fn default_directions_url() -> String {
    "https://maps.googleapis.com/maps/api/directions/json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            params_dir: default_params_dir(),
            street_params_file: default_street_params_file(),
            freq_coeffs_file: default_freq_coeffs_file(),
            curve_a_file: default_curve_a_file(),
            dump_stages: false,
            logging: LoggingConfig::default(),
            attenuation: AttenuationColumns::default(),
            directions: DirectionsConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl Default for AttenuationColumns {
    fn default() -> Self {
        Self {
            receiver_column: default_receiver_column(),
            source_column: default_source_column(),
            period_column: default_period_column(),
            x_column: default_x_column(),
            y_column: default_y_column(),
            band_suffix: default_band_suffix(),
        }
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_directions_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TomlConfig {
    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    pub fn street_params_path(&self) -> PathBuf {
        self.params_dir.join(&self.street_params_file)
    }

    pub fn freq_coeffs_path(&self) -> PathBuf {
        self.params_dir.join(&self.freq_coeffs_file)
    }

    pub fn curve_a_path(&self) -> PathBuf {
        self.params_dir.join(&self.curve_a_file)
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserFile(PathBuf),
    Defaults,
}

/// Resolved configuration and what happened while resolving it
///
/// Resolution runs before any tracing subscriber exists, so nothing is
/// logged during it. Call [`LoadedConfig::log_resolution`] once logging is up.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
    /// Config files skipped because they failed to load
    pub ignored: Vec<String>,
}

impl LoadedConfig {
    pub fn log_resolution(&self) {
        for reason in &self.ignored {
            warn!("Ignoring config file: {}", reason);
        }
        match &self.source {
            ConfigSource::CommandLine(path) | ConfigSource::UserFile(path) => {
                info!("Configuration loaded from {}", path.display())
            }
            ConfigSource::Environment(path) => {
                info!("Configuration loaded from {} ({})", path.display(), CONFIG_ENV_VAR)
            }
            ConfigSource::Defaults => info!("No configuration file found, using built-in defaults"),
        }
    }
}

/// Load configuration following the four-tier priority order
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    resolve_config(cli_arg, user_config_path())
}

/// Tier resolution with an explicit location for the user config file
pub fn resolve_config(cli_arg: Option<&Path>, user_file: Option<PathBuf>) -> Result<LoadedConfig> {
    let loaded = |config, source| LoadedConfig {
        config,
        source,
        ignored: Vec::new(),
    };

    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        let config = TomlConfig::from_file(path)?;
        return Ok(loaded(config, ConfigSource::CommandLine(path.to_path_buf())));
    }

    // Priority 2: Environment variable
    if let Ok(value) = std::env::var(CONFIG_ENV_VAR) {
        if !value.trim().is_empty() {
            let path = PathBuf::from(value);
            let config = TomlConfig::from_file(&path)?;
            return Ok(loaded(config, ConfigSource::Environment(path)));
        }
    }

    // Priority 3: User config file
    let mut ignored = Vec::new();
    if let Some(path) = user_file.filter(|p| p.exists()) {
        match TomlConfig::from_file(&path) {
            Ok(config) => return Ok(loaded(config, ConfigSource::UserFile(path))),
            Err(e) => ignored.push(e.to_string()),
        }
    }

    // Priority 4: Compiled defaults
    Ok(LoadedConfig {
        config: TomlConfig::default(),
        source: ConfigSource::Defaults,
        ignored,
    })
}

/// Platform config location: `<config_dir>/outfit/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("outfit").join("config.toml"))
}
