pub mod config;
pub mod launch;
pub mod model;
pub mod prefs;
pub mod registry;

mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use launch::{IntentRunner, LaunchIntent, LaunchOutcome, ProcessRunner, UnavailableReason};
pub use model::{App, AppList};
pub use prefs::{
    AppPrefs, JsonFileBackend, MemoryBackend, PrefField, PrefMap, PrefValue, PreferenceBackend,
    PreferenceStore, pref_key,
};
pub use registry::{AppRegistry, DesktopRegistry, Icon, RegistryEntry, StaticRegistry};
