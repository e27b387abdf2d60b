//! Launchable application registry.
//!
//! The registry answers two questions: which applications can be started from
//! the home screen, and how to start one of them by package id.

mod desktop;
mod exec;

pub use desktop::DesktopRegistry;

use crate::launch::LaunchIntent;
use std::collections::HashSet;

/// Opaque icon handle reported by the registry.
///
/// Held for completeness; the row layout only draws text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Icon(Option<String>);

impl Icon {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }

    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// One launchable application as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub label: String,
    pub icon: Icon,
    pub package_id: String,
}

impl RegistryEntry {
    pub fn new(label: impl Into<String>, package_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: Icon::none(),
            package_id: package_id.into(),
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }
}

/// Source of launchable applications.
pub trait AppRegistry {
    /// All launchable applications, one entry per package id, in registry order.
    fn launchable_apps(&self) -> Vec<RegistryEntry>;

    /// Resolve a package id to something that can be started, if it still can be.
    fn launch_intent(&self, package_id: &str) -> Option<LaunchIntent>;
}

/// Fixed in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: Vec<RegistryEntry>,
    unlaunchable: HashSet<String>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        Self {
            entries,
            unlaunchable: HashSet::new(),
        }
    }

    /// Build a registry from `(label, package id)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(label, id)| RegistryEntry::new(*label, *id))
                .collect(),
        )
    }

    /// Keep listing `package_id` but stop producing a launch intent for it.
    pub fn mark_unlaunchable(&mut self, package_id: &str) {
        self.unlaunchable.insert(package_id.to_string());
    }

    /// Remove an entry entirely, as if the app was uninstalled.
    pub fn remove(&mut self, package_id: &str) {
        self.entries.retain(|e| e.package_id != package_id);
    }

    pub fn push(&mut self, entry: RegistryEntry) {
        self.entries.push(entry);
    }
}

impl AppRegistry for StaticRegistry {
    fn launchable_apps(&self) -> Vec<RegistryEntry> {
        self.entries.clone()
    }

    fn launch_intent(&self, package_id: &str) -> Option<LaunchIntent> {
        if self.unlaunchable.contains(package_id) {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.package_id == package_id)
            .map(|e| LaunchIntent::new(&e.package_id, &e.package_id))
    }
}
