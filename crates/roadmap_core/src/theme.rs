//! Persisted light/dark preference, kept apart from the roadmap blob.

use crate::config::StoreConfig;
use crate::gateway::PersistenceGateway;
use log::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Reads a stored preference: only `"dark"` means dark, any other
    /// non-blank value means light. Absent or blank means dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("dark") => Self::Dark,
            Some(_) => Self::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

pub struct ThemeStore<G: PersistenceGateway> {
    gateway: G,
    key: String,
    theme: Theme,
}

impl<G: PersistenceGateway> ThemeStore<G> {
    /// Reads the stored theme once. Absent, blank or unreadable values yield
    /// `Theme::Dark`; any stored value other than `"dark"` yields
    /// `Theme::Light`.
    pub fn load(gateway: G, config: &StoreConfig) -> Self {
        let key = config.theme_key().to_string();
        let theme = match gateway.get(&key) {
            Ok(value) => Theme::from_stored(value.as_deref()),
            Err(err) => {
                warn!("event=theme_load module=theme status=fallback key={key} error={err}");
                Theme::default()
            }
        };
        info!("event=theme_load module=theme status=ok theme={}", theme.as_str());
        Self { gateway, key, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(err) = self.gateway.set(&self.key, theme.as_str()) {
            warn!(
                "event=theme_persist module=theme status=error key={} error={err}",
                self.key
            );
        }
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled());
        self.theme
    }
}
