//! Durable per-app preferences.
//!
//! Values live in a flat key/value map. Every key is built by [`pref_key`]
//! from a package id and a [`PrefField`], so the read and write paths can't
//! drift apart. Writes are staged and only become visible after [`PreferenceStore::commit`].

use crate::Result;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// A stored value. Serialized untagged, so the file stays a plain JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    String(String),
}

pub type PrefMap = BTreeMap<String, PrefValue>;

/// Persisted per-app fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefField {
    Hidden,
    CustomName,
}

impl PrefField {
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            PrefField::Hidden => "_hidden",
            PrefField::CustomName => "_customName",
        }
    }
}

/// The one place preference keys are built.
#[must_use]
pub fn pref_key(package_id: &str, field: PrefField) -> String {
    format!("{package_id}{}", field.suffix())
}

/// Typed view of one app's stored fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPrefs {
    pub hidden: bool,
    pub custom_name: String,
}

/// Where committed preferences are kept.
pub trait PreferenceBackend {
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be read.
    fn load(&self) -> Result<PrefMap>;

    /// # Errors
    ///
    /// Returns an error if the values cannot be written.
    fn persist(&self, values: &PrefMap) -> Result<()>;
}

/// JSON object file, replaced atomically on every commit.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn load(&self) -> Result<PrefMap> {
        if !self.path.exists() {
            debug!("Preference file not found at {}", self.path.display());
            return Ok(PrefMap::new());
        }

        let content = std::fs::read(&self.path)?;
        let value: serde_json::Value = match serde_json::from_slice(&content) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    "Failed to parse preferences: {} (at line {}, column {})",
                    e,
                    e.line(),
                    e.column()
                );
                return Ok(PrefMap::new());
            }
        };

        let serde_json::Value::Object(obj) = value else {
            warn!(
                "Ignoring preferences: {} is not a JSON object",
                self.path.display()
            );
            return Ok(PrefMap::new());
        };

        let mut values = PrefMap::new();
        for (key, raw) in obj {
            match serde_json::from_value::<PrefValue>(raw) {
                Ok(v) => {
                    values.insert(key, v);
                }
                Err(_) => warn!("Ignoring preference {key}: unsupported value type"),
            }
        }

        info!("Loaded {} preference values", values.len());
        Ok(values)
    }

    fn persist(&self, values: &PrefMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!("Saved {} preference values", values.len());
        Ok(())
    }
}

/// In-memory backend. Clones share the same data, so a store can be
/// reopened over it to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Rc<RefCell<PrefMap>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> PrefMap {
        self.values.borrow().clone()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load(&self) -> Result<PrefMap> {
        Ok(self.values.borrow().clone())
    }

    fn persist(&self, values: &PrefMap) -> Result<()> {
        values.clone_into(&mut *self.values.borrow_mut());
        Ok(())
    }
}

/// Key/value preference store with staged writes.
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
    committed: PrefMap,
    staged: PrefMap,
}

impl PreferenceStore {
    /// Open a store over `backend`, reading what was committed before.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to load.
    pub fn open(backend: impl PreferenceBackend + 'static) -> Result<Self> {
        let committed = backend.load()?;
        Ok(Self {
            backend: Box::new(backend),
            committed,
            staged: PrefMap::new(),
        })
    }

    /// Store backed by `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(JsonFileBackend::new(path))
    }

    #[must_use]
    pub fn get_hidden(&self, package_id: &str) -> bool {
        let key = pref_key(package_id, PrefField::Hidden);
        match self.committed.get(&key) {
            Some(PrefValue::Bool(hidden)) => *hidden,
            Some(other) => {
                warn!("Expected bool for {key}, found {other:?}");
                false
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get_custom_name(&self, package_id: &str, fallback: &str) -> String {
        let key = pref_key(package_id, PrefField::CustomName);
        match self.committed.get(&key) {
            Some(PrefValue::String(name)) => name.clone(),
            Some(other) => {
                warn!("Expected string for {key}, found {other:?}");
                fallback.to_string()
            }
            None => fallback.to_string(),
        }
    }

    pub fn set_hidden(&mut self, package_id: &str, hidden: bool) {
        self.staged.insert(
            pref_key(package_id, PrefField::Hidden),
            PrefValue::Bool(hidden),
        );
    }

    pub fn set_custom_name(&mut self, package_id: &str, name: &str) {
        self.staged.insert(
            pref_key(package_id, PrefField::CustomName),
            PrefValue::String(name.to_string()),
        );
    }

    #[must_use]
    pub fn app_prefs(&self, package_id: &str, fallback_name: &str) -> AppPrefs {
        AppPrefs {
            hidden: self.get_hidden(package_id),
            custom_name: self.get_custom_name(package_id, fallback_name),
        }
    }

    pub fn stage_app_prefs(&mut self, package_id: &str, prefs: &AppPrefs) {
        self.set_hidden(package_id, prefs.hidden);
        self.set_custom_name(package_id, &prefs.custom_name);
    }

    #[must_use]
    pub fn has_staged(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Flush staged writes. On failure they stay staged for the next commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the values.
    pub fn commit(&mut self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut merged = self.committed.clone();
        merged.extend(self.staged.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.backend.persist(&merged)?;

        self.committed = merged;
        self.staged.clear();
        Ok(())
    }
}
