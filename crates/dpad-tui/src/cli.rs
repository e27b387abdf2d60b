//! CLI argument parsing for dpad-launcher.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dpad-launcher")]
#[command(about = "Minimal home screen launcher driven by a directional pad", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging (logs to /tmp/dpad-launcher.log)
    #[arg(short, long)]
    pub debug: bool,

    /// Keep config and preferences under this directory
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive home screen (default)
    Tui,

    /// Print every launchable app with its package id
    List,

    /// Launch an app by package id
    Launch {
        /// Package id, e.g. org.gnome.Calculator
        package: String,
    },

    /// Show a hidden app on the home screen again
    Unhide {
        /// Package id
        package: String,
    },
}
