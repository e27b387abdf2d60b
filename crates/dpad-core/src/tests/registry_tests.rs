//! Tests for the desktop entry registry
//!
//! Scanning, precedence between directories, filtering of entries that
//! should not appear on the home screen and launch intent resolution.

use super::fixtures::{app_entry, write_desktop_file};
use crate::registry::{AppRegistry, DesktopRegistry};
use tempfile::TempDir;

fn ids(registry: &DesktopRegistry) -> Vec<String> {
    registry
        .launchable_apps()
        .into_iter()
        .map(|e| e.package_id)
        .collect()
}

#[test]
fn test_scan_lists_launchable_entries() {
    let dir = TempDir::new().unwrap();
    write_desktop_file(dir.path(), "org.example.Clock.desktop", &app_entry("Clock", "clock"));
    write_desktop_file(
        dir.path(),
        "org.example.Camera.desktop",
        &format!("{}Icon=camera\n", app_entry("Camera", "camera")),
    );
    write_desktop_file(dir.path(), "notes.txt", "not an entry");

    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    let apps = registry.launchable_apps();

    assert_eq!(apps.len(), 2);
    // Sorted by path within a directory
    assert_eq!(apps[0].package_id, "org.example.Camera");
    assert_eq!(apps[0].label, "Camera");
    assert_eq!(apps[0].icon.name(), Some("camera"));
    assert_eq!(apps[1].package_id, "org.example.Clock");
    assert_eq!(apps[1].icon.name(), None);
}

#[test]
fn test_missing_directories_yield_nothing() {
    let registry = DesktopRegistry::with_dirs(vec!["/nonexistent/applications".into()]);
    assert!(registry.launchable_apps().is_empty());
}

#[test]
fn test_subdirectory_ids_are_dash_joined() {
    let dir = TempDir::new().unwrap();
    write_desktop_file(dir.path(), "kde/konsole.desktop", &app_entry("Konsole", "konsole"));

    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    assert_eq!(ids(&registry), vec!["kde-konsole"]);
}

#[test]
fn test_symlink_loop_is_scanned_once() {
    let dir = TempDir::new().unwrap();
    write_desktop_file(dir.path(), "a.desktop", &app_entry("A", "a"));
    std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    assert_eq!(ids(&registry), vec!["a"]);
}

#[test]
fn test_symlinked_subdirectory_is_followed() {
    let dir = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    write_desktop_file(elsewhere.path(), "b.desktop", &app_entry("B", "b"));
    std::os::unix::fs::symlink(elsewhere.path(), dir.path().join("vendor")).unwrap();

    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    assert_eq!(ids(&registry), vec!["vendor-b"]);
}

#[test]
fn test_filtered_entries_are_skipped() {
    let dir = TempDir::new().unwrap();
    write_desktop_file(dir.path(), "a.desktop", &app_entry("Visible", "a"));
    write_desktop_file(
        dir.path(),
        "b.desktop",
        &format!("{}NoDisplay=true\n", app_entry("Helper", "b")),
    );
    write_desktop_file(
        dir.path(),
        "c.desktop",
        "[Desktop Entry]\nType=Link\nName=Site\nURL=https://example.com\n",
    );
    write_desktop_file(dir.path(), "d.desktop", "[Desktop Entry]\nType=Application\nName=NoExec\n");

    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    assert_eq!(ids(&registry), vec!["a"]);
}

#[test]
fn test_first_directory_owns_id() {
    let user = TempDir::new().unwrap();
    let system = TempDir::new().unwrap();
    write_desktop_file(user.path(), "clock.desktop", &app_entry("My Clock", "clock --mine"));
    write_desktop_file(system.path(), "clock.desktop", &app_entry("Clock", "clock"));
    write_desktop_file(system.path(), "camera.desktop", &app_entry("Camera", "camera"));

    let registry = DesktopRegistry::with_dirs(vec![
        user.path().to_path_buf(),
        system.path().to_path_buf(),
    ]);
    let apps = registry.launchable_apps();

    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0].label, "My Clock");
    assert_eq!(apps[1].package_id, "camera");
}

#[test]
fn test_user_hidden_entry_removes_system_app() {
    let user = TempDir::new().unwrap();
    let system = TempDir::new().unwrap();
    write_desktop_file(
        user.path(),
        "clock.desktop",
        "[Desktop Entry]\nType=Application\nName=Clock\nExec=clock\nHidden=true\n",
    );
    write_desktop_file(system.path(), "clock.desktop", &app_entry("Clock", "clock"));

    let registry = DesktopRegistry::with_dirs(vec![
        user.path().to_path_buf(),
        system.path().to_path_buf(),
    ]);
    assert!(registry.launchable_apps().is_empty());
    assert!(registry.launch_intent("clock").is_none());
}

#[test]
fn test_launch_intent_parses_exec() {
    let dir = TempDir::new().unwrap();
    write_desktop_file(
        dir.path(),
        "player.desktop",
        &format!(
            "{}Terminal=true\nPath=/srv/media\n",
            app_entry("Player", "player --fullscreen %U")
        ),
    );

    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    let intent = registry.launch_intent("player").unwrap();

    assert_eq!(intent.package_id, "player");
    assert_eq!(intent.program, "player");
    assert_eq!(intent.args, vec!["--fullscreen".to_string()]);
    assert!(intent.terminal);
    assert_eq!(intent.working_dir, Some("/srv/media".into()));
}

#[test]
fn test_launch_intent_for_removed_entry_is_none() {
    let dir = TempDir::new().unwrap();
    write_desktop_file(dir.path(), "clock.desktop", &app_entry("Clock", "clock"));
    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    assert_eq!(ids(&registry), vec!["clock"]);

    std::fs::remove_file(dir.path().join("clock.desktop")).unwrap();
    assert!(registry.launch_intent("clock").is_none());
}

#[test]
fn test_try_exec_with_existing_program() {
    let dir = TempDir::new().unwrap();
    let program = dir.path().join("tool");
    std::fs::write(&program, "#!/bin/sh\n").unwrap();
    write_desktop_file(
        dir.path(),
        "tool.desktop",
        &format!("{}TryExec={}\n", app_entry("Tool", "tool"), program.display()),
    );

    let registry = DesktopRegistry::with_dirs(vec![dir.path().to_path_buf()]);
    assert_eq!(ids(&registry), vec!["tool"]);
}

#[test]
fn test_from_env_appends_extra_dirs() {
    let extra = std::path::PathBuf::from("/opt/apps/share/applications");
    let registry = DesktopRegistry::from_env(std::slice::from_ref(&extra));
    assert_eq!(registry.dirs().last(), Some(&extra));
}
