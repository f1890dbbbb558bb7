//! Ledger Configuration
//!
//! Small JSON settings file; every field has a default so a partial or
//! missing file still yields a usable configuration.

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SECTION: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Section used when an added item names none
    pub default_section: String,
    /// Maximum number of undo steps kept; `None` keeps everything
    pub history_limit: Option<usize>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_section: DEFAULT_SECTION.to_string(),
            history_limit: None,
        }
    }
}

impl LedgerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: LedgerConfig = serde_json::from_str(json)?;
        if config.default_section.trim().is_empty() {
            config.default_section = DEFAULT_SECTION.to_string();
        }
        Ok(config)
    }

    /// Read the settings file, falling back to defaults when it is missing or broken
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("config {} not readable ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("config {} is invalid ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
