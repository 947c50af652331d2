//! tripkit configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::import::MAX_IMPORT_BYTES;
use crate::store::{CollectionKind, DEFAULT_STORAGE_KEY};

static DEFAULT_DATA_DIR: &str = "~/.local/share/tripkit";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_max_import_bytes() -> u64 {
    MAX_IMPORT_BYTES
}

/// Configuration at ~/.config/tripkit/config.toml, overridable with
/// `TRIPKIT_*` environment variables (e.g. `TRIPKIT_DATA_DIR`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_max_import_bytes")]
    pub max_import_bytes: u64,

    /// URL or path of the bundled calendar (.ics).
    pub default_calendar: Option<String>,
    pub default_tips: Option<String>,
    pub default_contacts: Option<String>,
    pub default_networking: Option<String>,
}

impl Default for TripConfig {
    fn default() -> Self {
        TripConfig {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            max_import_bytes: default_max_import_bytes(),
            default_calendar: None,
            default_tips: None,
            default_contacts: None,
            default_networking: None,
        }
    }
}

impl TripConfig {
    pub fn config_path() -> StoreResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StoreError::Config("Could not determine config directory".into()))?
            .join("tripkit");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the standard location, writing a commented template on first run.
    pub fn load() -> StoreResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> StoreResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("TRIPKIT").try_parsing(true))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StoreError::Config(e.to_string()))
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// Where the bundled records of `kind` come from, if configured.
    pub fn default_source(&self, kind: CollectionKind) -> Option<&str> {
        match kind {
            CollectionKind::Calendar => self.default_calendar.as_deref(),
            CollectionKind::NetworkingTips => self.default_tips.as_deref(),
            CollectionKind::Contacts => self.default_contacts.as_deref(),
            CollectionKind::Networking => self.default_networking.as_deref(),
        }
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> StoreResult<()> {
        let contents = format!(
            "\
# tripkit configuration

# Where app state is stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Storage key (file name) of the state blob:
# storage_key = \"{DEFAULT_STORAGE_KEY}\"

# Largest accepted import file, in bytes:
# max_import_bytes = {MAX_IMPORT_BYTES}

# Bundled default data (URL or local path):
# default_calendar = \"https://example.com/data/calendar.ics\"
# default_tips = \"https://example.com/data/networking-tips.json\"
# default_contacts = \"https://example.com/data/contacts.json\"
# default_networking = \"https://example.com/data/networking.json\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| StoreError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TripConfig::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.max_import_bytes, MAX_IMPORT_BYTES);
        assert_eq!(config.default_source(CollectionKind::Calendar), None);
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tripkit/config.toml");
        TripConfig::create_default_config(&path).unwrap();

        let config = TripConfig::load_from(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/trip\"\nstorage_key = \"conf-2025\"\ndefault_tips = \"tips.json\"\n",
        )
        .unwrap();

        let config = TripConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/trip"));
        assert_eq!(config.storage_key, "conf-2025");
        assert_eq!(
            config.default_source(CollectionKind::NetworkingTips),
            Some("tips.json")
        );
    }
}
