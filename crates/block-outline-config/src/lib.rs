use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Outline parse settings as written in the `[outline]` table.
///
/// Values are kept as written; use the accessors to get validated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSettings {
    pub start_index: i64,
    pub line_keys: bool,
    pub list_key_word_len: i64,
}

impl OutlineSettings {
    pub const DEFAULT_START_INDEX: usize = 1;
    pub const DEFAULT_LIST_KEY_WORD_LEN: usize = 10;

    /// Start index, or the default when negative.
    pub fn start_index(&self) -> usize {
        usize::try_from(self.start_index).unwrap_or_else(|_| {
            log::warn!(
                "outline.start_index = {} is out of range, using {}",
                self.start_index,
                Self::DEFAULT_START_INDEX
            );
            Self::DEFAULT_START_INDEX
        })
    }

    /// Word count for line-derived list keys, or the default when below 1.
    pub fn list_key_word_len(&self) -> usize {
        match usize::try_from(self.list_key_word_len) {
            Ok(len) if len > 0 => len,
            _ => {
                log::warn!(
                    "outline.list_key_word_len = {} is out of range, using {}",
                    self.list_key_word_len,
                    Self::DEFAULT_LIST_KEY_WORD_LEN
                );
                Self::DEFAULT_LIST_KEY_WORD_LEN
            }
        }
    }
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            start_index: Self::DEFAULT_START_INDEX as i64,
            line_keys: false,
            list_key_word_len: Self::DEFAULT_LIST_KEY_WORD_LEN as i64,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_path: Option<PathBuf>,
    #[serde(default)]
    pub outline: OutlineSettings,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded notes path
        config.notes_path = config
            .notes_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        log::debug!("loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/block-outline");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
