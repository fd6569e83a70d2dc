//! Light/dark theme state, persisted under the configured theme key.
use crate::storage::KeyValueStore;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the switcher control, which offers the other theme.
    pub fn switcher_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark Mode",
            Theme::Dark => "Light Mode",
        }
    }
}

/// Single source of truth for the active theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeState {
    current: Theme,
    key: String,
}

impl ThemeState {
    /// Read the persisted theme; absent, unknown, or unreadable values mean light.
    pub fn restore(store: &dyn KeyValueStore, key: &str) -> Self {
        let current = match store.get(key) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "ignoring unknown persisted theme");
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "read persisted theme");
                Theme::Light
            }
        };
        Self {
            current,
            key: key.to_string(),
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Persist the other theme, then switch to it. A failed write leaves the
    /// current theme in place.
    pub fn toggle(&mut self, store: &dyn KeyValueStore) -> Result<Theme> {
        let next = self.current.toggled();
        store.set(&self.key, next.as_str())?;
        self.current = next;
        Ok(next)
    }
}
