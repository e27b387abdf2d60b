//! Home screen state and event handling.

use crate::input::{Dispatch, DpadKey, dispatch};
use crate::state::{Lifecycle, MenuOption, Notice, OptionsMenuState, RenamePromptState, ViewMode};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use dpad_core::config::LauncherConfig;
use dpad_core::launch::launch;
use dpad_core::{AppList, AppRegistry, IntentRunner, LaunchOutcome, PreferenceStore};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The launcher screen: app list, anchor row and modal state.
pub struct LauncherApp {
    pub apps: AppList,
    prefs: PreferenceStore,
    registry: Box<dyn AppRegistry>,
    runner: Box<dyn IntentRunner>,
    /// Row the d-pad acts on
    pub anchor: usize,
    pub list_state: ListState,
    pub view_mode: ViewMode,
    pub notice: Option<Notice>,
    notice_duration: Duration,
    pub title: String,
    pub lifecycle: Lifecycle,
    pub should_quit: bool,
    /// Inner area of the row list from the last frame, for mouse hit testing
    pub list_area: Rect,
}

impl LauncherApp {
    /// Starts paused; call [`LauncherApp::resume`] before the first frame.
    pub fn new(
        registry: Box<dyn AppRegistry>,
        runner: Box<dyn IntentRunner>,
        prefs: PreferenceStore,
        config: &LauncherConfig,
    ) -> Self {
        Self {
            apps: AppList::new(),
            prefs,
            registry,
            runner,
            anchor: 0,
            list_state: ListState::default(),
            view_mode: ViewMode::default(),
            notice: None,
            notice_duration: Duration::from_millis(config.notice_ms),
            title: config.title.clone(),
            lifecycle: Lifecycle::Paused,
            should_quit: false,
            list_area: Rect::default(),
        }
    }

    /// Screen came to the foreground: rebuild the list from the registry and
    /// stored preferences. No-op if already resumed.
    pub fn resume(&mut self) {
        if self.lifecycle == Lifecycle::Resumed {
            return;
        }
        self.apps.refresh(self.registry.as_ref(), &self.prefs);
        self.clamp_anchor();
        self.lifecycle = Lifecycle::Resumed;
        info!("Resumed with {} visible apps", self.apps.visible_len());
    }

    /// Screen left the foreground: flush hidden flags and names.
    ///
    /// If the save fails the screen stays resumed, so the next resume can't
    /// rebuild the list from stale values and the next pause retries.
    pub fn pause(&mut self) {
        if self.lifecycle == Lifecycle::Paused {
            return;
        }
        if let Err(e) = self.apps.save_settings(&mut self.prefs) {
            warn!("Failed to save preferences: {e}");
            self.show_notice("Could not save preferences");
            return;
        }
        debug!("Preferences saved");
        self.lifecycle = Lifecycle::Paused;
    }

    /// Pause and resume in one go, picking up registry changes.
    pub fn reload(&mut self) {
        self.pause();
        self.resume();
    }

    pub fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::new(message, self.notice_duration));
    }

    /// Drop the notice once it has expired. Returns true if it was removed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
            return true;
        }
        false
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.apps.visible_len()
    }

    fn scroll_to(&mut self, row: usize) {
        self.anchor = row;
        self.list_state.select(Some(row));
    }

    /// Keep the anchor on an existing row after the rows changed.
    fn clamp_anchor(&mut self) {
        let rows = self.row_count();
        if rows == 0 {
            self.anchor = 0;
            self.list_state.select(None);
        } else {
            self.scroll_to(self.anchor.min(rows - 1));
        }
    }

    /// Returns whether the key was consumed.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.view_mode {
            ViewMode::List => self.handle_list_key(code),
            ViewMode::Options(_) => {
                self.handle_options_key(code);
                true
            }
            ViewMode::Rename(_) => {
                self.handle_rename_key(code);
                true
            }
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) -> bool {
        match dispatch(DpadKey::from_key_code(code), self.anchor, self.row_count()) {
            Dispatch::ScrollTo(row) => self.scroll_to(row),
            Dispatch::Launch(row) => self.launch_row(row),
            Dispatch::Consumed => {}
            Dispatch::Unhandled => return self.handle_default_key(code),
        }
        true
    }

    /// Keys the d-pad dispatcher does not own.
    fn handle_default_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Menu | KeyCode::Char('m') => self.long_press_row(self.anchor),
            KeyCode::Char('r') => self.reload(),
            _ => return false,
        }
        true
    }

    fn handle_options_key(&mut self, code: KeyCode) {
        let ViewMode::Options(ref mut menu) = self.view_mode else {
            return;
        };

        match code {
            KeyCode::Up => menu.select_previous(),
            KeyCode::Down => menu.select_next(),
            KeyCode::Enter => {
                let package_name = menu.package_name.clone();
                let app_name = menu.app_name.clone();
                match menu.selected_option() {
                    MenuOption::Hide => {
                        self.view_mode = ViewMode::List;
                        self.hide(&package_name);
                    }
                    MenuOption::Rename => {
                        self.view_mode =
                            ViewMode::Rename(RenamePromptState::new(package_name, app_name));
                    }
                }
            }
            KeyCode::Esc | KeyCode::Left | KeyCode::Char('q') => {
                self.view_mode = ViewMode::List;
            }
            _ => {}
        }
    }

    fn handle_rename_key(&mut self, code: KeyCode) {
        let ViewMode::Rename(ref mut prompt) = self.view_mode else {
            return;
        };

        match code {
            KeyCode::Enter => {
                let package_name = prompt.package_name.clone();
                let input = std::mem::take(&mut prompt.input);
                self.view_mode = ViewMode::List;
                if self.apps.rename(&package_name, &input) {
                    info!("Renamed {package_name} to {}", input.trim());
                }
            }
            KeyCode::Esc => self.view_mode = ViewMode::List,
            KeyCode::Left => prompt.move_cursor_left(),
            KeyCode::Right => prompt.move_cursor_right(),
            KeyCode::Backspace => prompt.delete_char(),
            KeyCode::Char(c) => prompt.insert_char(c),
            _ => {}
        }
    }

    fn hide(&mut self, package_name: &str) {
        if self.apps.hide(package_name) {
            info!("Hid {package_name}");
            self.clamp_anchor();
        }
    }

    /// Row tap: focus the row and launch it.
    pub fn tap_row(&mut self, row: usize) {
        if row >= self.row_count() {
            return;
        }
        self.scroll_to(row);
        self.launch_row(row);
    }

    /// Row long-press: open the options menu for it.
    pub fn long_press_row(&mut self, row: usize) {
        let Some(app) = self.apps.visible_app(row) else {
            return;
        };
        let menu = OptionsMenuState::new(app.package_name(), app.display_name());
        self.scroll_to(row);
        self.view_mode = ViewMode::Options(menu);
    }

    /// Launch the app on `row`. Hidden or missing rows are ignored.
    fn launch_row(&mut self, row: usize) {
        let Some(app) = self.apps.visible_app(row) else {
            return;
        };
        if app.hidden {
            return;
        }
        let package_name = app.package_name().to_string();
        let display_name = app.display_name().to_string();

        match launch(self.registry.as_ref(), self.runner.as_ref(), &package_name) {
            // The launched app owns the foreground now
            LaunchOutcome::Launched => self.pause(),
            LaunchOutcome::Unavailable(reason) => {
                debug!("Launch of {package_name} unavailable: {reason:?}");
                self.show_notice(format!("Unable to launch {display_name}"));
            }
        }
    }

    /// Row under a terminal position, if any.
    #[must_use]
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let index = self.list_state.offset() + usize::from(row - area.y);
        (index < self.row_count()).then_some(index)
    }

    /// Left click taps a row, right click long-presses it, the wheel scrolls.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.view_mode != ViewMode::List {
            return;
        }

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(row) = self.row_at(event.column, event.row) {
                    self.tap_row(row);
                }
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if let Some(row) = self.row_at(event.column, event.row) {
                    self.long_press_row(row);
                }
            }
            MouseEventKind::ScrollDown => {
                self.handle_list_key(KeyCode::Down);
            }
            MouseEventKind::ScrollUp => {
                self.handle_list_key(KeyCode::Up);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use dpad_core::prefs::{MemoryBackend, PrefMap, PreferenceBackend};
    use dpad_core::{LaunchIntent, StaticRegistry};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Runner that records launched package ids
    #[derive(Clone, Default)]
    struct RecordingRunner {
        launched: Rc<RefCell<Vec<String>>>,
    }

    impl IntentRunner for RecordingRunner {
        fn run(&self, intent: &LaunchIntent) -> std::io::Result<()> {
            self.launched.borrow_mut().push(intent.package_id.clone());
            Ok(())
        }
    }

    /// Memory backend whose next `failures` persists fail
    struct FlakyBackend {
        inner: MemoryBackend,
        failures: Rc<Cell<u32>>,
    }

    impl PreferenceBackend for FlakyBackend {
        fn load(&self) -> dpad_core::Result<PrefMap> {
            self.inner.load()
        }

        fn persist(&self, values: &PrefMap) -> dpad_core::Result<()> {
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(dpad_core::Error::Prefs("disk full".to_string()));
            }
            self.inner.persist(values)
        }
    }

    struct Harness {
        app: LauncherApp,
        backend: MemoryBackend,
        launched: Rc<RefCell<Vec<String>>>,
    }

    fn harness_with(registry: StaticRegistry, backend: MemoryBackend) -> Harness {
        let runner = RecordingRunner::default();
        let launched = runner.launched.clone();
        let prefs = PreferenceStore::open(backend.clone()).unwrap();
        let mut app = LauncherApp::new(
            Box::new(registry),
            Box::new(runner),
            prefs,
            &LauncherConfig::default(),
        );
        app.resume();
        Harness {
            app,
            backend,
            launched,
        }
    }

    fn camera_clock() -> StaticRegistry {
        StaticRegistry::from_pairs(&[("Camera", "pkg.cam"), ("Clock", "pkg.clock")])
    }

    fn harness() -> Harness {
        harness_with(camera_clock(), MemoryBackend::new())
    }

    fn rows(app: &LauncherApp) -> Vec<String> {
        app.apps
            .visible()
            .map(|a| a.display_name().to_string())
            .collect()
    }

    fn type_text(app: &mut LauncherApp, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn click(app: &mut LauncherApp, button: MouseButton, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_resume_loads_rows() {
        let h = harness();
        assert_eq!(rows(&h.app), vec!["Camera", "Clock"]);
        assert_eq!(h.app.anchor, 0);
        assert_eq!(h.app.list_state.selected(), Some(0));
        assert_eq!(h.app.lifecycle, Lifecycle::Resumed);
    }

    #[test]
    fn test_down_up_respect_bounds() {
        let mut h = harness();

        assert!(h.app.handle_key(KeyCode::Up));
        assert_eq!(h.app.anchor, 0);

        assert!(h.app.handle_key(KeyCode::Down));
        assert_eq!(h.app.anchor, 1);

        assert!(h.app.handle_key(KeyCode::Down));
        assert_eq!(h.app.anchor, 1);

        assert!(h.app.handle_key(KeyCode::Up));
        assert_eq!(h.app.anchor, 0);
    }

    #[test]
    fn test_left_right_consumed_without_effect() {
        let mut h = harness();
        assert!(h.app.handle_key(KeyCode::Left));
        assert!(h.app.handle_key(KeyCode::Right));
        assert_eq!(h.app.anchor, 0);
        assert!(h.launched.borrow().is_empty());
    }

    #[test]
    fn test_unknown_key_not_consumed() {
        let mut h = harness();
        assert!(!h.app.handle_key(KeyCode::Char('x')));
        assert!(!h.app.handle_key(KeyCode::Tab));
    }

    #[test]
    fn test_center_launches_anchor_row() {
        let mut h = harness();
        h.app.handle_key(KeyCode::Down);
        assert!(h.app.handle_key(KeyCode::Enter));

        assert_eq!(*h.launched.borrow(), vec!["pkg.clock".to_string()]);
        // Launching hands the foreground over, which saves preferences
        assert_eq!(h.app.lifecycle, Lifecycle::Paused);
        assert!(!h.backend.snapshot().is_empty());
    }

    #[test]
    fn test_center_with_every_app_hidden_launches_nothing() {
        let mut h = harness();
        h.app.apps.hide("pkg.cam");
        h.app.apps.hide("pkg.clock");
        h.app.clamp_anchor();

        assert!(h.app.handle_key(KeyCode::Enter));
        assert!(h.launched.borrow().is_empty());
        assert!(h.app.notice.is_none());
    }

    #[test]
    fn test_center_never_launches_hidden_app() {
        let mut h = harness();
        h.app.apps.hide("pkg.cam");
        h.app.clamp_anchor();

        h.app.handle_key(KeyCode::Enter);
        assert_eq!(*h.launched.borrow(), vec!["pkg.clock".to_string()]);
    }

    #[test]
    fn test_unavailable_launch_shows_notice() {
        let mut registry = camera_clock();
        registry.mark_unlaunchable("pkg.cam");
        let mut h = harness_with(registry, MemoryBackend::new());

        h.app.handle_key(KeyCode::Enter);

        assert!(h.launched.borrow().is_empty());
        let notice = h.app.notice.as_ref().unwrap();
        assert_eq!(notice.message, "Unable to launch Camera");
        assert_eq!(h.app.lifecycle, Lifecycle::Resumed);
    }

    #[test]
    fn test_tap_and_dpad_report_failure_the_same_way() {
        let mut registry = camera_clock();
        registry.mark_unlaunchable("pkg.clock");
        let mut h = harness_with(registry, MemoryBackend::new());

        h.app.tap_row(1);
        let tapped = h.app.notice.take().unwrap().message;

        h.app.handle_key(KeyCode::Enter);
        let pressed = h.app.notice.take().unwrap().message;

        assert_eq!(tapped, pressed);
        assert_eq!(h.app.anchor, 1);
    }

    #[test]
    fn test_long_press_hide_scenario() {
        let backend = MemoryBackend::new();
        let mut h = harness_with(camera_clock(), backend.clone());

        h.app.long_press_row(0);
        assert!(matches!(h.app.view_mode, ViewMode::Options(_)));
        h.app.handle_key(KeyCode::Enter);

        assert_eq!(h.app.view_mode, ViewMode::List);
        assert_eq!(rows(&h.app), vec!["Clock"]);
        assert_eq!(h.app.row_count(), 1);

        h.app.pause();
        h.app.resume();
        assert_eq!(rows(&h.app), vec!["Clock"]);

        // Fresh process over the same storage
        let restarted = harness_with(camera_clock(), backend);
        assert_eq!(rows(&restarted.app), vec!["Clock"]);
        assert!(restarted.app.apps.get("pkg.cam").unwrap().hidden);
    }

    #[test]
    fn test_hiding_last_row_moves_anchor_up() {
        let mut h = harness();
        h.app.handle_key(KeyCode::Down);
        h.app.long_press_row(1);
        h.app.handle_key(KeyCode::Enter);

        assert_eq!(h.app.anchor, 0);
        assert_eq!(h.app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_rename_scenario() {
        let backend = MemoryBackend::new();
        let mut h = harness_with(camera_clock(), backend.clone());

        h.app.long_press_row(1);
        h.app.handle_key(KeyCode::Down);
        h.app.handle_key(KeyCode::Enter);
        assert!(matches!(h.app.view_mode, ViewMode::Rename(_)));

        type_text(&mut h.app, "Timer");
        h.app.handle_key(KeyCode::Enter);
        assert_eq!(rows(&h.app), vec!["Camera", "Timer"]);

        h.app.pause();
        let restarted = harness_with(camera_clock(), backend);
        let clock = restarted.app.apps.visible_app(1).unwrap();
        assert_eq!(clock.display_name(), "Timer");
        assert_eq!(clock.package_name(), "pkg.clock");
    }

    #[test]
    fn test_blank_rename_keeps_name() {
        let mut h = harness();
        h.app.view_mode = ViewMode::Rename(RenamePromptState::new("pkg.clock", "Clock"));
        type_text(&mut h.app, "   ");
        h.app.handle_key(KeyCode::Enter);

        assert_eq!(h.app.view_mode, ViewMode::List);
        assert_eq!(rows(&h.app), vec!["Camera", "Clock"]);
    }

    #[test]
    fn test_rename_cancel_keeps_name() {
        let mut h = harness();
        h.app.view_mode = ViewMode::Rename(RenamePromptState::new("pkg.clock", "Clock"));
        type_text(&mut h.app, "Timer");
        h.app.handle_key(KeyCode::Esc);

        assert_eq!(h.app.view_mode, ViewMode::List);
        assert_eq!(rows(&h.app), vec!["Camera", "Clock"]);
    }

    #[test]
    fn test_rename_prompt_swallows_quit_key() {
        let mut h = harness();
        h.app.view_mode = ViewMode::Rename(RenamePromptState::new("pkg.clock", "Clock"));
        assert!(h.app.handle_key(KeyCode::Char('q')));
        assert!(!h.app.should_quit);
    }

    #[test]
    fn test_options_menu_escape_closes() {
        let mut h = harness();
        h.app.handle_key(KeyCode::Char('m'));
        assert!(matches!(h.app.view_mode, ViewMode::Options(_)));

        h.app.handle_key(KeyCode::Esc);
        assert_eq!(h.app.view_mode, ViewMode::List);
        assert_eq!(rows(&h.app), vec!["Camera", "Clock"]);
        assert!(!h.app.should_quit);
    }

    #[test]
    fn test_quit_key() {
        let mut h = harness();
        assert!(h.app.handle_key(KeyCode::Char('q')));
        assert!(h.app.should_quit);
    }

    #[test]
    fn test_resume_without_pause_keeps_mutations() {
        let mut h = harness();
        h.app.apps.hide("pkg.cam");
        h.app.resume();
        assert_eq!(rows(&h.app), vec!["Clock"]);
    }

    #[test]
    fn test_failed_save_keeps_unsaved_changes() {
        let backend = MemoryBackend::new();
        let failures = Rc::new(Cell::new(1));
        let prefs = PreferenceStore::open(FlakyBackend {
            inner: backend.clone(),
            failures: failures.clone(),
        })
        .unwrap();
        let mut app = LauncherApp::new(
            Box::new(camera_clock()),
            Box::new(RecordingRunner::default()),
            prefs,
            &LauncherConfig::default(),
        );
        app.resume();

        app.apps.hide("pkg.cam");
        app.apps.rename("pkg.clock", "Timer");
        app.pause();
        assert_eq!(app.lifecycle, Lifecycle::Resumed);
        assert_eq!(
            app.notice.as_ref().map(|n| n.message.as_str()),
            Some("Could not save preferences")
        );

        // Focus comes back before the retry
        app.resume();
        assert_eq!(rows(&app), vec!["Timer"]);

        app.pause();
        assert_eq!(failures.get(), 0);
        assert_eq!(app.lifecycle, Lifecycle::Paused);

        let restarted = harness_with(camera_clock(), backend);
        assert_eq!(rows(&restarted.app), vec!["Timer"]);
        assert!(restarted.app.apps.get("pkg.cam").unwrap().hidden);
    }

    #[test]
    fn test_reload_saves_then_reloads() {
        let mut h = harness();
        h.app.apps.rename("pkg.cam", "Photos");
        h.app.handle_key(KeyCode::Char('r'));

        assert_eq!(rows(&h.app), vec!["Photos", "Clock"]);
        assert_eq!(h.app.lifecycle, Lifecycle::Resumed);
    }

    #[test]
    fn test_mouse_left_click_taps_row() {
        let mut h = harness();
        h.app.list_area = Rect::new(2, 3, 20, 10);

        click(&mut h.app, MouseButton::Left, 5, 4);
        assert_eq!(*h.launched.borrow(), vec!["pkg.clock".to_string()]);
    }

    #[test]
    fn test_mouse_right_click_opens_menu() {
        let mut h = harness();
        h.app.list_area = Rect::new(2, 3, 20, 10);

        click(&mut h.app, MouseButton::Right, 5, 3);
        let ViewMode::Options(menu) = &h.app.view_mode else {
            panic!("expected options menu");
        };
        assert_eq!(menu.package_name, "pkg.cam");
    }

    #[test]
    fn test_click_outside_rows_is_ignored() {
        let mut h = harness();
        h.app.list_area = Rect::new(2, 3, 20, 10);

        click(&mut h.app, MouseButton::Left, 5, 9);
        click(&mut h.app, MouseButton::Left, 0, 3);
        assert!(h.launched.borrow().is_empty());
        assert_eq!(h.app.row_at(5, 9), None);
    }

    #[test]
    fn test_notice_tick_expires() {
        let mut h = harness();
        h.app.show_notice("hello");
        assert!(!h.app.tick(Instant::now()));

        let later = h.app.notice.as_ref().unwrap().expires_at;
        assert!(h.app.tick(later));
        assert!(h.app.notice.is_none());
    }
}
