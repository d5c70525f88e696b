use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use reqwest::Url;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_NAME: &str = "teledex";

const DEFAULT_BASE_URL: &str = "https://contact.mediusware.com/api";

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the configuration was (or would have been) read from.
    pub config_path: PathBuf,
    /// Holds the route marker and log files.
    pub data_dir: PathBuf,
    pub api: ApiConfig,
    pub ui: UiConfig,
}

// =============================================================================
// API Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    /// Pages this long are assumed to have a successor; shorter pages end
    /// pagination.
    pub page_size: usize,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ApiFile {
    base_url: String,
    page_size: usize,
    timeout_secs: u64,
}

impl Default for ApiFile {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 10,
            timeout_secs: 10,
        }
    }
}

impl ApiFile {
    fn into_config(self) -> Result<ApiConfig> {
        let base_url: Url = self
            .base_url
            .parse()
            .with_context(|| format!("invalid api.base_url: {}", self.base_url))?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => bail!("api.base_url must use http or https, got '{}'", other),
        }
        if self.page_size == 0 {
            bail!("api.page_size must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("api.timeout_secs must be at least 1");
        }
        Ok(ApiConfig {
            base_url,
            page_size: self.page_size,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

// =============================================================================
// UI Configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Quiet period between the last search keystroke and the filter
    /// recomputation.
    pub debounce: Duration,
    /// Country served by the scoped list popup.
    pub country: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct UiFile {
    debounce_ms: u64,
    country: String,
}

impl Default for UiFile {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            country: "United States".to_string(),
        }
    }
}

impl UiFile {
    fn into_config(self) -> Result<UiConfig> {
        let country = self.country.trim().to_string();
        if country.is_empty() {
            bail!("ui.country must not be blank");
        }
        Ok(UiConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            country,
        })
    }
}

// =============================================================================
// Config file structure
// =============================================================================

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    api: ApiFile,
    ui: UiFile,
}

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine base directories")?;
    let dir = base.config_dir().join(APP_NAME);
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

fn default_data_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine base directories")?;
    Ok(base.data_dir().join(APP_NAME))
}

/// Load configuration from the given path, or the default location when
/// none is given. An explicitly named file must exist; a missing default
/// file just means defaults.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let (path, required) = match path {
        Some(path) => (expand_tilde(path), true),
        None => (config_path()?, false),
    };

    let cfg_file: ConfigFile = if path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration file at {}", path.display()))?;

        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("failed to parse {} as TOML", path.display()))?;

        warn_unknown_keys(&value);

        value
            .try_into()
            .with_context(|| format!("failed to deserialize config from {}", path.display()))?
    } else if required {
        bail!("configuration file not found at {}", path.display());
    } else {
        ConfigFile::default()
    };

    let data_dir = match cfg_file.data_dir {
        Some(ref dir) => expand_tilde(dir),
        None => default_data_dir()?,
    };

    Ok(Config {
        config_path: path,
        data_dir,
        api: cfg_file.api.into_config()?,
        ui: cfg_file.ui.into_config()?,
    })
}

// =============================================================================
// Unknown key warnings
// =============================================================================

fn warn_unknown_keys(value: &toml::Value) {
    let Some(table) = value.as_table() else {
        return;
    };

    let known = HashSet::from(["data_dir", "api", "ui"]);

    for key in table.keys() {
        if !known.contains(key.as_str()) {
            eprintln!("warning: unknown configuration key `{}`", key);
        }
    }

    if let Some(api_val) = table.get("api") {
        warn_unknown_in_section(api_val, "api", &["base_url", "page_size", "timeout_secs"]);
    }

    if let Some(ui_val) = table.get("ui") {
        warn_unknown_in_section(ui_val, "ui", &["debounce_ms", "country"]);
    }
}

fn warn_unknown_in_section(value: &toml::Value, section: &str, known: &[&str]) {
    let Some(table) = value.as_table() else {
        return;
    };
    let known_set: HashSet<&str> = known.iter().copied().collect();
    for key in table.keys() {
        if !known_set.contains(key.as_str()) {
            eprintln!("warning: unknown {}.* entry `{}`", section, key);
        }
    }
}
