//! The app list: registry entries merged with stored preferences.

use crate::prefs::{AppPrefs, PreferenceStore};
use crate::registry::{AppRegistry, Icon, RegistryEntry};
use crate::Result;
use tracing::debug;

/// One launchable application as shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    name: String,
    icon: Icon,
    package_name: String,
    pub custom_name: String,
    pub hidden: bool,
}

impl App {
    pub fn new(name: impl Into<String>, icon: Icon, package_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            custom_name: name.clone(),
            name,
            icon,
            package_name: package_name.into(),
            hidden: false,
        }
    }

    /// Label reported by the registry.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// Text shown on the app's row.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.custom_name
    }

    fn prefs(&self) -> AppPrefs {
        AppPrefs {
            hidden: self.hidden,
            custom_name: self.custom_name.clone(),
        }
    }
}

impl From<RegistryEntry> for App {
    fn from(entry: RegistryEntry) -> Self {
        App::new(entry.label, entry.icon, entry.package_id)
    }
}

/// Ordered list of apps in registry order.
///
/// Holds no identity across loads: every [`AppList::load`] rebuilds the
/// records from the registry and re-applies the preference store.
#[derive(Debug, Clone, Default)]
pub struct AppList {
    apps: Vec<App>,
}

impl AppList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the registry, then apply stored preferences.
    pub fn load(&mut self, registry: &dyn AppRegistry, prefs: &PreferenceStore) {
        self.apps.clear();
        self.apps
            .extend(registry.launchable_apps().into_iter().map(App::from));
        self.apply_settings(prefs);
        debug!(
            "Loaded {} apps ({} visible)",
            self.apps.len(),
            self.visible_len()
        );
    }

    pub fn refresh(&mut self, registry: &dyn AppRegistry, prefs: &PreferenceStore) {
        self.load(registry, prefs);
    }

    /// Overwrite `hidden` and `custom_name` of every app from the store.
    pub fn apply_settings(&mut self, prefs: &PreferenceStore) {
        for app in &mut self.apps {
            let stored = prefs.app_prefs(&app.package_name, &app.custom_name);
            app.hidden = stored.hidden;
            app.custom_name = stored.custom_name;
        }
    }

    /// Stage every app's fields and commit them.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to commit.
    pub fn save_settings(&self, prefs: &mut PreferenceStore) -> Result<()> {
        for app in &self.apps {
            prefs.stage_app_prefs(&app.package_name, &app.prefs());
        }
        prefs.commit()
    }

    /// Returns false if no app has that package name.
    pub fn hide(&mut self, package_name: &str) -> bool {
        self.set_hidden(package_name, true)
    }

    pub fn unhide(&mut self, package_name: &str) -> bool {
        self.set_hidden(package_name, false)
    }

    fn set_hidden(&mut self, package_name: &str, hidden: bool) -> bool {
        let Some(app) = self.get_mut(package_name) else {
            return false;
        };
        app.hidden = hidden;
        true
    }

    /// Rename to the trimmed `new_name`. Blank input leaves the name as is.
    pub fn rename(&mut self, package_name: &str, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        let Some(app) = self.get_mut(package_name) else {
            return false;
        };
        trimmed.clone_into(&mut app.custom_name);
        true
    }

    #[must_use]
    pub fn get(&self, package_name: &str) -> Option<&App> {
        self.apps.iter().find(|a| a.package_name == package_name)
    }

    fn get_mut(&mut self, package_name: &str) -> Option<&mut App> {
        self.apps.iter_mut().find(|a| a.package_name == package_name)
    }

    /// Every app, hidden ones included.
    #[must_use]
    pub fn all(&self) -> &[App] {
        &self.apps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// The rows: every non-hidden app, in order.
    pub fn visible(&self) -> impl Iterator<Item = &App> {
        self.apps.iter().filter(|a| !a.hidden)
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.visible().count()
    }

    /// App shown on row `row`.
    #[must_use]
    pub fn visible_app(&self, row: usize) -> Option<&App> {
        self.visible().nth(row)
    }
}
