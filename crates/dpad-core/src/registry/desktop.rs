//! Registry backed by freedesktop `.desktop` entries.

use super::exec::parse_exec;
use super::{AppRegistry, Icon, RegistryEntry};
use crate::launch::LaunchIntent;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use xdg::BaseDirectories;

const DESKTOP_GROUP: &str = "[Desktop Entry]";
const DESKTOP_SUFFIX: &str = ".desktop";

/// Scans `applications/` directories in precedence order.
///
/// The first directory that provides a desktop id owns it, so entries in
/// `$XDG_DATA_HOME` shadow system entries with the same id, including
/// `Hidden=true` entries that delete a system app from the list.
#[derive(Debug, Clone)]
pub struct DesktopRegistry {
    dirs: Vec<PathBuf>,
}

impl DesktopRegistry {
    #[must_use]
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// XDG application directories followed by `extra`.
    #[must_use]
    pub fn from_env(extra: &[PathBuf]) -> Self {
        let (data_home, data_dirs) = match BaseDirectories::new() {
            Ok(xdg) => (Some(xdg.get_data_home()), xdg.get_data_dirs()),
            Err(e) => {
                warn!("Failed to resolve XDG base directories: {e}");
                (None, Vec::new())
            }
        };

        let dirs = application_dirs(data_home, data_dirs, extra);
        debug!("Application dirs: {:?}", dirs);
        Self { dirs }
    }

    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Every desktop file that owns its id, in precedence then path order.
    fn owning_files(&self) -> Vec<(String, PathBuf)> {
        let mut seen = HashSet::new();
        let mut owned = Vec::new();

        for dir in &self.dirs {
            let mut files = Vec::new();
            collect_desktop_files(dir, &mut HashSet::new(), &mut files);
            files.sort();

            for path in files {
                let Some(id) = desktop_id(dir, &path) else {
                    continue;
                };
                if seen.insert(id.clone()) {
                    owned.push((id, path));
                }
            }
        }

        owned
    }
}

impl AppRegistry for DesktopRegistry {
    fn launchable_apps(&self) -> Vec<RegistryEntry> {
        let apps: Vec<RegistryEntry> = self
            .owning_files()
            .into_iter()
            .filter_map(|(id, path)| {
                let entry = DesktopEntry::read(&path)?;
                entry.is_launchable().then(|| RegistryEntry {
                    label: entry.name().to_string(),
                    icon: entry.icon(),
                    package_id: id,
                })
            })
            .collect();

        info!("Registry scan found {} launchable apps", apps.len());
        apps
    }

    fn launch_intent(&self, package_id: &str) -> Option<LaunchIntent> {
        let (_, path) = self
            .owning_files()
            .into_iter()
            .find(|(id, _)| id == package_id)?;
        let entry = DesktopEntry::read(&path)?;
        if !entry.is_launchable() {
            debug!("{package_id} is no longer launchable");
            return None;
        }

        let exec = entry.get("Exec")?;
        let mut argv = parse_exec(exec, entry.name(), entry.get("Icon"), &path)?.into_iter();
        let program = argv.next()?;

        let mut intent = LaunchIntent::new(package_id, program).with_args(argv.collect());
        intent.terminal = entry.get_bool("Terminal");
        intent.working_dir = entry
            .get("Path")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Some(intent)
    }
}

/// `applications/` under the data home, then under each data dir, then `extra`.
fn application_dirs(
    data_home: Option<PathBuf>,
    data_dirs: Vec<PathBuf>,
    extra: &[PathBuf],
) -> Vec<PathBuf> {
    data_home
        .into_iter()
        .chain(data_dirs)
        .map(|dir| dir.join("applications"))
        .chain(extra.iter().cloned())
        .collect()
}

/// Recursive scan. Directories reached twice through symlinks are skipped.
fn collect_desktop_files(dir: &Path, visited: &mut HashSet<PathBuf>, out: &mut Vec<PathBuf>) {
    let Ok(canonical) = dir.canonicalize() else {
        return;
    };
    if !visited.insert(canonical) {
        debug!("Skipping {}: already scanned", dir.display());
        return;
    }
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_desktop_files(&path, visited, out);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(DESKTOP_SUFFIX))
        {
            out.push(path);
        }
    }
}

/// `applications/kde/konsole.desktop` -> `kde-konsole`
pub(crate) fn desktop_id(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?
        .join("-");
    joined
        .strip_suffix(DESKTOP_SUFFIX)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Keys of the `[Desktop Entry]` group of one file.
#[derive(Debug, Default)]
pub(crate) struct DesktopEntry {
    values: HashMap<String, String>,
}

impl DesktopEntry {
    fn read(path: &Path) -> Option<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(Self::parse(&content)),
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    pub(crate) fn parse(content: &str) -> Self {
        let mut values = HashMap::new();
        let mut in_group = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_group = line == DESKTOP_GROUP;
                continue;
            }
            if !in_group {
                continue;
            }
            // Localized keys (Name[de]) are ignored
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if !key.contains('[') {
                    values
                        .entry(key.to_string())
                        .or_insert_with(|| unescape_value(value.trim()));
                }
            }
        }

        Self { values }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    fn name(&self) -> &str {
        self.get("Name").unwrap_or_default()
    }

    fn icon(&self) -> Icon {
        self.get("Icon")
            .filter(|i| !i.is_empty())
            .map_or_else(Icon::none, Icon::new)
    }

    pub(crate) fn is_launchable(&self) -> bool {
        if self.get("Type") != Some("Application") {
            return false;
        }
        if self.get_bool("NoDisplay") || self.get_bool("Hidden") {
            return false;
        }
        if self.name().is_empty() || self.get("Exec").is_none_or(str::is_empty) {
            return false;
        }
        match self.get("TryExec") {
            Some(program) if !program.is_empty() => program_exists(program),
            _ => true,
        }
    }
}

fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            // Unknown escapes are kept for the Exec quoting rules
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn program_exists(program: &str) -> bool {
    let path = Path::new(program);
    if path.is_absolute() {
        return path.is_file();
    }
    std::env::var_os("PATH")
        .is_some_and(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
}
