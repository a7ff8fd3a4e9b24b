//! Persisted key-value settings.
//!
//! The platform layer consumes this store but does not own its format: window
//! placement freeze/thaw writes entries such as `MainWindow_left` and reads
//! them back with the current value as default. Booleans are stored as
//! integers (`0`/`1`).
//!
//! | Store | Backing | Use |
//! |---|---|---|
//! | [`MemorySettings`] | in-process map | headless runs and tests |
//! | [`FileSettings`] | TOML file, rewritten atomically on every update | desktop runs |

use crate::config::write_atomic;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A single typed settings value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Int(i64),
    Float(f64),
    String(String),
}

impl Setting {
    fn type_name(&self) -> &'static str {
        match self {
            Setting::Int(_) => "int",
            Setting::Float(_) => "float",
            Setting::String(_) => "string",
        }
    }
}

/// Typed freeze/thaw access to an opaque key-value store.
///
/// Thawing a key that was frozen with a different type is a usage mistake;
/// it is logged and the supplied default is returned.
pub trait SettingsStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn freeze(&self, key: &str, value: Setting);

    /// Look up the value stored under `key`.
    fn thaw(&self, key: &str) -> Option<Setting>;

    /// Store several values as one update.
    fn freeze_all(&self, entries: Vec<(String, Setting)>) {
        for (key, value) in entries {
            self.freeze(&key, value);
        }
    }

    fn freeze_int(&self, key: &str, value: i64) {
        self.freeze(key, Setting::Int(value));
    }

    fn thaw_int(&self, key: &str, default: i64) -> i64 {
        match self.thaw(key) {
            Some(Setting::Int(value)) => value,
            Some(other) => mismatch(key, "int", &other, default),
            None => default,
        }
    }

    fn freeze_float(&self, key: &str, value: f64) {
        self.freeze(key, Setting::Float(value));
    }

    fn thaw_float(&self, key: &str, default: f64) -> f64 {
        match self.thaw(key) {
            Some(Setting::Float(value)) => value,
            Some(other) => mismatch(key, "float", &other, default),
            None => default,
        }
    }

    fn freeze_string(&self, key: &str, value: &str) {
        self.freeze(key, Setting::String(value.to_string()));
    }

    fn thaw_string(&self, key: &str, default: &str) -> String {
        match self.thaw(key) {
            Some(Setting::String(value)) => value,
            Some(other) => mismatch(key, "string", &other, default.to_string()),
            None => default.to_string(),
        }
    }

    fn freeze_bool(&self, key: &str, value: bool) {
        self.freeze_int(key, i64::from(value));
    }

    fn thaw_bool(&self, key: &str, default: bool) -> bool {
        self.thaw_int(key, i64::from(default)) != 0
    }
}

fn mismatch<T>(key: &str, expected: &str, found: &Setting, default: T) -> T {
    log::warn!(
        "Setting '{}' has type {}, expected {}; using default",
        key,
        found.type_name(),
        expected
    );
    default
}

/// In-process settings store.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<BTreeMap<String, Setting>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Snapshot of all keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}

impl SettingsStore for MemorySettings {
    fn freeze(&self, key: &str, value: Setting) {
        self.values.write().insert(key.to_string(), value);
    }

    fn thaw(&self, key: &str) -> Option<Setting> {
        self.values.read().get(key).cloned()
    }
}

/// Settings store persisted to a TOML file.
///
/// The file is read once on open and rewritten once per update: a single
/// freeze, or a whole [`SettingsStore::freeze_all`] batch. Write failures
/// are logged and otherwise ignored: the in-memory copy stays authoritative
/// for the rest of the session.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Setting>>,
}

impl FileSettings {
    /// Open the store at `path`. A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = load_values(&path)?;
        log::info!("Opened settings store {:?} ({} entries)", path, values.len());
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents to disk.
    pub fn save(&self) -> Result<()> {
        let contents = {
            let values = self.values.read();
            toml::to_string(&*values).map_err(ConfigError::from)?
        };
        write_atomic(&self.path, &contents)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))
    }
}

impl SettingsStore for FileSettings {
    fn freeze(&self, key: &str, value: Setting) {
        self.values.write().insert(key.to_string(), value);
        if let Err(e) = self.save() {
            log::error!("Failed to persist setting '{}': {:#}", key, e);
        }
    }

    fn thaw(&self, key: &str) -> Option<Setting> {
        self.values.read().get(key).cloned()
    }

    fn freeze_all(&self, entries: Vec<(String, Setting)>) {
        let count = entries.len();
        self.values.write().extend(entries);
        if let Err(e) = self.save() {
            log::error!("Failed to persist {} settings: {:#}", count, e);
        }
    }
}

fn load_values(path: &Path) -> Result<BTreeMap<String, Setting>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(ConfigError::from)
        .with_context(|| format!("Failed to read settings from {:?}", path))?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let values = toml::from_str(&contents)
        .map_err(ConfigError::from)
        .with_context(|| format!("Failed to parse settings from {:?}", path))?;
    Ok(values)
}
