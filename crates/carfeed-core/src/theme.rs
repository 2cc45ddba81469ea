//! Display theme preference.
//!
//! The theme is the only state persisted across sessions. [`ThemeContext`]
//! owns it: it is initialised once from the stored preference (or the OS
//! preference when nothing is stored) and hands out `watch` receivers to
//! anything that renders theme-dependent output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Storage key of the persisted preference.
pub const THEME_KEY: &str = "carScraperTheme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to access theme store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("theme store {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value storage for the theme preference.
pub trait ThemeStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the backing store exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), ThemeError>;
}

/// JSON file holding a flat string map, e.g. `{"carScraperTheme": "dark"}`.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, ThemeError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ThemeError::Io {
                    path: self.path.display().to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|e| ThemeError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

impl ThemeStore for FileThemeStore {
    fn get(&self, key: &str) -> Result<Option<String>, ThemeError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ThemeError> {
        let io_err = |source| ThemeError::Io {
            path: self.path.display().to_string(),
            source,
        };
        // A corrupt file is replaced rather than blocking every later write.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(ThemeError::Corrupt { .. }) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "theme: overwriting corrupt preference store"
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_owned(), value.to_owned());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(&map).map_err(|e| ThemeError::Corrupt {
            path: self.path.display().to_string(),
            source: e,
        })?;
        std::fs::write(&self.path, body).map_err(io_err)
    }
}

/// Process-wide theme state with explicit initialisation and subscription.
pub struct ThemeContext<S: ThemeStore> {
    store: S,
    tx: watch::Sender<Theme>,
}

impl<S: ThemeStore> ThemeContext<S> {
    /// Reads the persisted preference, falling back to the OS preference when
    /// nothing valid is stored. A store that cannot be read is logged and
    /// treated as empty.
    pub fn init(store: S, os_prefers_dark: bool) -> Self {
        let os_default = if os_prefers_dark { Theme::Dark } else { Theme::Light };
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(e) => {
                tracing::warn!(error = %e, "theme: ignoring unreadable preference store");
                None
            }
        };
        let initial = stored.unwrap_or(os_default);
        tracing::debug!(theme = %initial, persisted = stored.is_some(), "theme: initialised");
        let (tx, _rx) = watch::channel(initial);
        Self { store, tx }
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }

    /// Sets and persists the theme, notifying subscribers on change.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the preference cannot be persisted. The
    /// in-memory theme is still updated.
    pub fn set(&self, theme: Theme) -> Result<(), ThemeError> {
        self.tx.send_if_modified(|current| {
            let changed = *current != theme;
            *current = theme;
            changed
        });
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Flips between light and dark and returns the new theme.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError`] if the preference cannot be persisted.
    pub fn toggle(&self) -> Result<Theme, ThemeError> {
        let next = self.current().toggled();
        self.set(next)?;
        Ok(next)
    }
}

/// Best-effort terminal dark-mode detection from `COLORFGBG` (`"fg;bg"`),
/// where background colour indices 0-6 and 8 are dark.
#[must_use]
pub fn terminal_prefers_dark(colorfgbg: Option<&str>) -> bool {
    colorfgbg
        .and_then(|raw| raw.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}
