//! View state types for the TUI.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Options(OptionsMenuState),
    Rename(RenamePromptState),
}

/// Whether the home screen is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Resumed,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Hide,
    Rename,
}

impl MenuOption {
    pub const ALL: [MenuOption; 2] = [MenuOption::Hide, MenuOption::Rename];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Hide => "Hide",
            MenuOption::Rename => "Rename",
        }
    }
}

/// Long-press menu for one app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsMenuState {
    pub package_name: String,
    pub app_name: String,
    pub selected: usize,
}

impl OptionsMenuState {
    pub fn new(package_name: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            app_name: app_name.into(),
            selected: 0,
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % MenuOption::ALL.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = if self.selected == 0 {
            MenuOption::ALL.len() - 1
        } else {
            self.selected - 1
        };
    }

    #[must_use]
    pub fn selected_option(&self) -> MenuOption {
        MenuOption::ALL[self.selected % MenuOption::ALL.len()]
    }
}

/// Single-line rename prompt. `cursor` counts characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePromptState {
    pub package_name: String,
    pub current_name: String,
    pub input: String,
    pub cursor: usize,
}

impl RenamePromptState {
    pub fn new(package_name: impl Into<String>, current_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            current_name: current_name.into(),
            input: String::new(),
            cursor: 0,
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.input.remove(idx);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }
}

/// Transient message shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + duration,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
