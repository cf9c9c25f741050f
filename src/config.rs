//! Configuration, loaded once at startup from `ata.toml`.
//!
//! ```toml
//! [schema]
//! table = "TRACING_ST_SMALL_NEW"
//! dialect = "snowflake"
//! as_of = "2025-06-30"
//!
//! [display]
//! embed = false
//! view = "chart"
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::AtaResult;
use crate::render::View;
use crate::schema::Schema;

pub const CONFIG_FILE: &str = "ata.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AtaConfig {
    pub schema: Schema,
    pub display: DisplayConfig,
}

/// Presentation settings for the CLI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Compact output without banner or tips
    pub embed: bool,
    pub view: View,
}

impl AtaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> AtaResult<Self> {
        let config: AtaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path.
    pub fn load(path: impl AsRef<Path>) -> AtaResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `./ata.toml`, then `<config dir>/ata/ata.toml`, else defaults.
    pub fn discover() -> AtaResult<Self> {
        match Self::candidates().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("ata").join(CONFIG_FILE));
        }
        paths
    }

    pub fn validate(&self) -> AtaResult<()> {
        self.schema.validate()
    }
}
