use directories::ProjectDirs;
use std::path::PathBuf;

/// Application directories following the XDG base directory layout
#[derive(Debug, Clone)]
pub struct Directories {
    /// Config directory (~/.config/dpad-launcher)
    pub config: PathBuf,

    /// Data directory (~/.local/share/dpad-launcher)
    pub data: PathBuf,

    /// Config file path
    pub config_file: PathBuf,

    /// Preference store file (hidden flags and custom names)
    pub prefs_file: PathBuf,
}

impl Directories {
    /// Create a new `Directories` instance with standard XDG paths.
    ///
    /// # Panics
    ///
    /// Panics if the system's project directories cannot be determined.
    #[must_use]
    pub fn new() -> Self {
        let project = ProjectDirs::from("", "", "dpad-launcher")
            .expect("Failed to determine project directories");

        let config = project.config_dir().to_path_buf();
        let data = project.data_dir().to_path_buf();

        Self {
            config_file: config.join("config.json"),
            prefs_file: data.join("prefs.json"),
            config,
            data,
        }
    }

    #[must_use]
    pub fn with_base(base: PathBuf) -> Self {
        Self {
            config_file: base.join("config.json"),
            prefs_file: base.join("prefs.json"),
            config: base.clone(),
            data: base,
        }
    }

    /// Ensure all directories exist.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.config)?;
        std::fs::create_dir_all(&self.data)?;
        Ok(())
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
