//! Editor configuration loaded from `patina.toml`.
//!
//! Lookup prefers a file in the working directory, then the platform config
//! directory. Loading is tolerant: a missing file yields defaults silently,
//! a malformed one logs a warning and yields defaults. Config trouble never
//! stops the editor from starting.
//!
//! Unknown fields are ignored (TOML deserialization tolerance) so older
//! binaries keep working against newer config files.

use std::{fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const FILE_NAME: &str = "patina.toml";

/// Columns per tab stop when the file carries no `tab_width`.
pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tab stop width in visual columns.
    #[serde(default = "Config::default_tab_width")]
    pub tab_width: usize,
    /// Color theme name; `None` selects the built-in default.
    #[serde(default)]
    pub theme: Option<String>,
    /// Copy an existing file to `<file>.bak` before saving over it.
    #[serde(default = "Config::default_backup")]
    pub backup: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
            theme: None,
            backup: Self::default_backup(),
        }
    }
}

impl Config {
    const fn default_tab_width() -> usize {
        DEFAULT_TAB_WIDTH
    }

    const fn default_backup() -> bool {
        true
    }
}

/// Best-effort config path following platform conventions (XDG / AppData
/// Roaming). A `patina.toml` in the working directory wins.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("patina").join(FILE_NAME);
    }
    PathBuf::from(FILE_NAME)
}

/// Load configuration from `path`, or from [`discover`] when `None`.
pub fn load_from(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => {
            info!(
                target: "config",
                path = %path.display(),
                tab_width = config.tab_width,
                backup = config.backup,
                theme = config.theme.as_deref().unwrap_or("<built-in>"),
                "config_loaded"
            );
            config
        }
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_malformed"
            );
            Config::default()
        }
    }
}
