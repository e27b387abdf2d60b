//! Rendering functions for the TUI.

mod dialog;
mod list;

pub use dialog::{render_options_menu, render_rename_prompt};
pub use list::render_home;

use crate::app::LauncherApp;
use crate::state::ViewMode;
use ratatui::Frame;

/// Draw one frame. Dialogs are drawn over the home screen.
pub fn draw(f: &mut Frame, app: &mut LauncherApp) {
    render_home(f, app);

    match &app.view_mode {
        ViewMode::List => {}
        ViewMode::Options(menu) => render_options_menu(f, menu),
        ViewMode::Rename(prompt) => render_rename_prompt(f, prompt),
    }
}
