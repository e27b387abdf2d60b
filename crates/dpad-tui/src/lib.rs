//! Terminal home screen for the d-pad launcher.
//!
//! Shows the launchable apps as a vertical list driven by the arrow keys
//! and Enter, with a long-press menu to hide or rename an app.

pub mod app;
pub mod cli;
pub mod input;
pub mod render;
pub mod state;

mod colors;

pub use app::LauncherApp;
