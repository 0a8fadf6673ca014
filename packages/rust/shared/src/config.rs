//! Application configuration for the gazette analyzer.
//!
//! User config lives at `~/.gazette/gazette.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GazetteError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "gazette.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".gazette";

/// Excerpt length kept on each record, in characters.
pub const DEFAULT_EXCERPT_CHARS: usize = 2000;

// ---------------------------------------------------------------------------
// Config structs (matching gazette.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Registry snapshot location.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Report options.
    #[serde(default)]
    pub report: ReportConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory reports are written to when `--out` is not given.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Report format: "html" or "json".
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: default_format(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_format() -> String {
    "html".into()
}

/// `[registry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Candidate snapshot paths, tried in order. `~/` expands to the home dir.
    #[serde(default = "default_registry_paths")]
    pub paths: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            paths: default_registry_paths(),
        }
    }
}

fn default_registry_paths() -> Vec<String> {
    vec![
        format!("~/{CONFIG_DIR_NAME}/registry.json"),
        "registry.json".into(),
    ]
}

/// `[report]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum characters of notice text kept on each record.
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

fn default_excerpt_chars() -> usize {
    DEFAULT_EXCERPT_CHARS
}

// ---------------------------------------------------------------------------
// Analyze config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime analysis configuration.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Maximum characters of notice text kept on each record.
    pub excerpt_chars: usize,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl From<&AppConfig> for AnalyzeConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            excerpt_chars: config.report.excerpt_chars,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.gazette/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| GazetteError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.gazette/gazette.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| GazetteError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        GazetteError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| GazetteError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| GazetteError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| GazetteError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values the rest of the pipeline cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.defaults.format.as_str() {
        "html" | "json" => {}
        other => {
            return Err(GazetteError::config(format!(
                "unknown report format '{other}': expected 'html' or 'json'"
            )));
        }
    }
    if config.report.excerpt_chars == 0 {
        return Err(GazetteError::config("report.excerpt_chars must be positive"));
    }
    Ok(())
}

/// Expand the configured registry candidates into concrete paths.
///
/// A leading `~/` is replaced with the home directory; entries that need the
/// home directory are dropped when it cannot be determined.
pub fn registry_candidates(config: &AppConfig) -> Vec<PathBuf> {
    let home = dirs::home_dir();
    config
        .registry
        .paths
        .iter()
        .filter_map(|raw| match raw.strip_prefix("~/") {
            Some(rest) => home.as_ref().map(|h| h.join(rest)),
            None => Some(PathBuf::from(raw)),
        })
        .collect()
}
