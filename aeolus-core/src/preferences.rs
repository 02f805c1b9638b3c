//! Persisted UI preferences: appearance mode and last viewed city.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, io, path::Path, path::PathBuf};
use tracing::{debug, warn};

use crate::config::project_dirs;

pub const DEFAULT_LOCATION: &str = "London";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Light => "Light",
            Mode::Dark => "Dark",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_location")]
    pub last_location: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self { mode: Mode::default(), last_location: default_location() }
    }
}

/// Read-modify-write access to the preferences JSON file.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data dir>/preferences.json`.
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing file is the first run, anything else is logged.
    pub fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                debug!(path = %self.path.display(), "No preferences file, using defaults");
                Preferences::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring unreadable preferences: {e:#}");
                Preferences::default()
            }
        }
    }

    fn try_load(&self) -> Result<Option<Preferences>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read preferences file: {}", self.path.display())
                });
            }
        };

        let prefs = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse preferences file: {}", self.path.display())
        })?;

        Ok(Some(prefs))
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(prefs)
            .context("Failed to serialize preferences to JSON")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))?;

        debug!(mode = %prefs.mode, last_location = %prefs.last_location, "Preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> PreferencesStore {
        PreferencesStore::new(dir.path().join("preferences.json"))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs = store_in(&dir).load();

        assert_eq!(prefs.mode, Mode::Light);
        assert_eq!(prefs.last_location, "London");
    }

    #[test]
    fn dark_porto_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let prefs = Preferences { mode: Mode::Dark, last_location: "Porto".into() };

        store.save(&prefs).expect("save");
        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn file_uses_documented_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store
            .save(&Preferences { mode: Mode::Dark, last_location: "Oslo".into() })
            .expect("save");

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).expect("read")).expect("json");
        assert_eq!(raw["mode"], "Dark");
        assert_eq!(raw["last_location"], "Oslo");
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").expect("write");

        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"mode": "Dark"}"#).expect("write");

        let prefs = store.load();
        assert_eq!(prefs.mode, Mode::Dark);
        assert_eq!(prefs.last_location, "London");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PreferencesStore::new(dir.path().join("a").join("b").join("prefs.json"));

        store.save(&Preferences::default()).expect("save");
        assert!(store.path().exists());
    }

    #[test]
    fn toggling_flips_between_modes() {
        assert_eq!(Mode::Light.toggled(), Mode::Dark);
        assert_eq!(Mode::Dark.toggled(), Mode::Light);
    }
}
