//! Persisted user preferences.
//!
//! The desktop treats preferences as an opaque string key-value store. The
//! theme lives under [`THEME_KEY`] and the last selected layout under
//! [`LAYOUT_KEY`]; nothing else reads the values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::common::collections::{BTreeMap, HashMap};

pub const THEME_KEY: &str = "portfolio-theme";
pub const LAYOUT_KEY: &str = "portfolio-layout";

pub fn preferences_file() -> PathBuf { crate::common::config::data_dir().join("preferences.ron") }

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Store that forgets everything when dropped. Used with `--no-persist` and
/// in tests.
#[derive(Default, Debug)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> { self.values.get(key).cloned() }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// RON-backed store. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let buf = std::fs::read_to_string(&path)?;
            ron::from_str(&buf)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = values.len(), "opened preference store");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path { &self.path }

    fn save(&self) -> anyhow::Result<()> {
        let buf = ron::ser::to_string_pretty(&self.values, ron::ser::PrettyConfig::default())?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, buf.as_bytes())?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> { self.values.get(key).cloned() }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    Auto,
}

impl ThemeMode {
    /// Taskbar toggle order: auto, light, dark, auto.
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Auto => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Auto,
        }
    }
}

/// Reads a typed preference, ignoring values that no longer parse.
pub fn load<T: std::str::FromStr>(store: &dyn PreferenceStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unreadable preference");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn theme_cycles_through_all_modes() {
        assert_eq!(ThemeMode::Auto.next(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.next(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.next(), ThemeMode::Auto);
    }

    #[test]
    fn load_skips_garbage() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(load::<ThemeMode>(&store, THEME_KEY), None);
        store.set(THEME_KEY, "dark").unwrap();
        assert_eq!(load::<ThemeMode>(&store, THEME_KEY), Some(ThemeMode::Dark));
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.ron");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY), None);
        store.set(THEME_KEY, "light").unwrap();
        store.set(LAYOUT_KEY, "grid").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(reopened.get(LAYOUT_KEY).as_deref(), Some("grid"));
        assert_eq!(reopened.path(), path.as_path());
    }
}
