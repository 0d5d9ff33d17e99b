//! Global unievent configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{UniEventError, UniEventResult};

static DEFAULT_DATA_FILE: &str = "UMS_Data.xlsx";
static DEFAULT_EVENTS_SHEET_NAME: &str = "Events";
static DEFAULT_HEADER_IMAGE: &str = "images/default_header.png";
const DEFAULT_EVENTS_SHEET_INDEX: usize = 4;

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_events_sheet_index() -> usize {
    DEFAULT_EVENTS_SHEET_INDEX
}

fn default_events_sheet_name() -> String {
    DEFAULT_EVENTS_SHEET_NAME.to_string()
}

fn default_header_image() -> String {
    DEFAULT_HEADER_IMAGE.to_string()
}

/// Configuration at ~/.config/unievent/config.toml, overridable with
/// `UNIEVENT_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UniEventConfig {
    /// Workbook holding the events sheet (and any unrelated sheets)
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Zero-based position of the events sheet inside the workbook
    #[serde(default = "default_events_sheet_index")]
    pub events_sheet_index: usize,

    #[serde(default = "default_events_sheet_name")]
    pub events_sheet_name: String,

    /// Header image used for rows that have none
    #[serde(default = "default_header_image")]
    pub default_header_image: String,
}

impl Default for UniEventConfig {
    fn default() -> Self {
        UniEventConfig {
            data_file: default_data_file(),
            events_sheet_index: default_events_sheet_index(),
            events_sheet_name: default_events_sheet_name(),
            default_header_image: default_header_image(),
        }
    }
}

impl UniEventConfig {
    /// Load the config file (creating a commented template on first run),
    /// then apply environment overrides.
    pub fn load() -> UniEventResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> UniEventResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("UNIEVENT").try_parsing(true))
            .build()
            .map_err(|e| UniEventError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| UniEventError::Config(e.to_string()))
    }

    pub fn config_path() -> UniEventResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| UniEventError::Config("Could not determine config directory".into()))?
            .join("unievent");

        Ok(config_dir.join("config.toml"))
    }

    /// The data file with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> UniEventResult<()> {
        let contents = format!(
            "\
# unievent configuration

# Workbook that stores events:
# data_file = \"{DEFAULT_DATA_FILE}\"

# Zero-based sheet position and name of the events table:
# events_sheet_index = {DEFAULT_EVENTS_SHEET_INDEX}
# events_sheet_name = \"{DEFAULT_EVENTS_SHEET_NAME}\"

# Header image for events without one:
# default_header_image = \"{DEFAULT_HEADER_IMAGE}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                UniEventError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| UniEventError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
