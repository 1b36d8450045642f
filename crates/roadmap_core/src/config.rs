//! Store configuration.
//!
//! # Invariants
//! - Storage keys are non-blank.
//! - The roadmap key and the theme key are distinct.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Versioned key of the persisted roadmap blob.
pub const DEFAULT_STORAGE_KEY: &str = "roadmap-progress-v4";
/// Key of the persisted theme preference.
pub const DEFAULT_THEME_KEY: &str = "theme";
/// How long an uncheck stays undoable.
pub const DEFAULT_UNDO_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BlankStorageKey,
    BlankThemeKey,
    /// Roadmap and theme would overwrite each other.
    SharedKey(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankStorageKey => write!(f, "storage key must not be blank"),
            Self::BlankThemeKey => write!(f, "theme key must not be blank"),
            Self::SharedKey(key) => {
                write!(f, "roadmap and theme cannot share storage key `{key}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Keys and timings injected into `RoadmapStore`, `ThemeStore` and
/// `UndoController`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    storage_key: String,
    theme_key: String,
    undo_timeout: Duration,
}

impl StoreConfig {
    /// Builds a validated configuration with the default undo timeout.
    pub fn new(
        storage_key: impl Into<String>,
        theme_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let storage_key = storage_key.into().trim().to_string();
        let theme_key = theme_key.into().trim().to_string();
        if storage_key.is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        if theme_key.is_empty() {
            return Err(ConfigError::BlankThemeKey);
        }
        if storage_key == theme_key {
            return Err(ConfigError::SharedKey(storage_key));
        }
        Ok(Self {
            storage_key,
            theme_key,
            undo_timeout: DEFAULT_UNDO_TIMEOUT,
        })
    }

    pub fn with_undo_timeout(mut self, timeout: Duration) -> Self {
        self.undo_timeout = timeout;
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn theme_key(&self) -> &str {
        &self.theme_key
    }

    pub fn undo_timeout(&self) -> Duration {
        self.undo_timeout
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
            undo_timeout: DEFAULT_UNDO_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY};

    #[test]
    fn default_uses_versioned_key() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
        assert_ne!(config.storage_key(), config.theme_key());
    }

    #[test]
    fn new_rejects_blank_and_shared_keys() {
        assert_eq!(
            StoreConfig::new("  ", "theme").unwrap_err(),
            ConfigError::BlankStorageKey
        );
        assert_eq!(
            StoreConfig::new("roadmap", "").unwrap_err(),
            ConfigError::BlankThemeKey
        );
        assert_eq!(
            StoreConfig::new("same", " same ").unwrap_err(),
            ConfigError::SharedKey("same".to_string())
        );
        assert_eq!(
            StoreConfig::new(" roadmap-v5 ", "theme").unwrap().storage_key(),
            "roadmap-v5"
        );
    }
}
