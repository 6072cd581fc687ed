//! Configuration loading and parsing.
//!
//! Parse `vimodal.toml` (or an override path provided by the binary). Every
//! field carries a serde default so a missing file, a missing table or a
//! missing key all produce the same defaults. Unknown fields are ignored to
//! allow forward evolution. A malformed file falls back to defaults with a
//! warning rather than failing startup.
//!
//! ```toml
//! [insert]
//! escape_sequence = "jk"
//! escape_timeout_ms = 250
//! tab_expansion = "    "
//!
//! [view]
//! visible_lines = 24
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub insert: InsertConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InsertConfig {
    /// Two-key sequence that leaves Insert mode when typed quickly. Empty disables.
    #[serde(default = "InsertConfig::default_escape_sequence")]
    pub escape_sequence: String,
    #[serde(default = "InsertConfig::default_escape_timeout_ms")]
    pub escape_timeout_ms: u64,
    /// Literal text inserted for `<Tab>`.
    #[serde(default = "InsertConfig::default_tab_expansion")]
    pub tab_expansion: String,
}

impl Default for InsertConfig {
    fn default() -> Self {
        Self {
            escape_sequence: Self::default_escape_sequence(),
            escape_timeout_ms: Self::default_escape_timeout_ms(),
            tab_expansion: Self::default_tab_expansion(),
        }
    }
}

impl InsertConfig {
    fn default_escape_sequence() -> String {
        "jk".to_string()
    }
    const fn default_escape_timeout_ms() -> u64 {
        250
    }
    fn default_tab_expansion() -> String {
        "    ".to_string()
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }

    /// The configured escape pair, or `None` when disabled or not exactly two characters.
    pub fn escape_pair(&self) -> Option<(char, char)> {
        let mut chars = self.escape_sequence.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Some((first, second)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    /// Visible text lines assumed by page motions when the host supplies none.
    #[serde(default = "ViewConfig::default_visible_lines")]
    pub visible_lines: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            visible_lines: Self::default_visible_lines(),
        }
    }
}

impl ViewConfig {
    const fn default_visible_lines() -> usize {
        24
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer a local working directory `vimodal.toml` before the platform config dir.
    let local = PathBuf::from("vimodal.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimodal").join("vimodal.toml");
    }
    // Final fallback relative filename.
    PathBuf::from("vimodal.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            if file.insert.escape_pair().is_none() && !file.insert.escape_sequence.is_empty() {
                warn!(
                    target: "config",
                    len = file.insert.escape_sequence.chars().count(),
                    "escape_sequence_ignored"
                );
            }
            info!(
                target: "config",
                path = %path.display(),
                escape_timeout_ms = file.insert.escape_timeout_ms,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}
