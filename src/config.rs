//! Optional config file loading. Search order: ./tocmap.toml, then
//! $XDG_CONFIG_HOME/tocmap/config.toml (or ~/.config/tocmap/config.toml).

use crate::source::Endpoints;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct Config {
    /// Directory for `<identifier>.mm` when -o is not set. Relative to CWD.
    pub output_dir: Option<PathBuf>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds. Unset means the HTTP client default.
    pub timeout_secs: Option<u64>,
    /// Base URL of the Open Library catalog API.
    pub catalog_url: Option<String>,
    /// Base URL of the Google Books API.
    pub search_url: Option<String>,
}

impl Config {
    /// Endpoints with config overrides applied over the public defaults.
    pub fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        Endpoints {
            catalog_url: self.catalog_url.clone().unwrap_or(defaults.catalog_url),
            search_url: self.search_url.clone().unwrap_or(defaults.search_url),
        }
    }
}

/// Read and parse one config file.
pub fn load_config_from(path: &Path) -> Result<Config, String> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&s).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Search order: (1) ./tocmap.toml, (2) $XDG_CONFIG_HOME/tocmap/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("tocmap.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("tocmap").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            log::debug!("loading config from {}", path.display());
            return load_config_from(path).map(Some);
        }
    }
    Ok(None)
}
