//! dpad-launcher - terminal home screen driven by a directional pad.
//!
//! Lists launchable desktop applications, launches the focused one with
//! Enter and keeps per-app hidden flags and custom names in `prefs.json`.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dpad_core::config::{Config, Directories};
use dpad_core::launch::launch;
use dpad_core::{AppList, DesktopRegistry, LaunchOutcome, PreferenceStore, ProcessRunner};
use dpad_tui::LauncherApp;
use dpad_tui::cli::{Cli, Commands};
use dpad_tui::render::draw;
use dpad_tui::state::Lifecycle;
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = std::env::temp_dir();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("dpad-launcher-{timestamp}.log");
    let log_path = log_dir.join(&log_filename);

    let symlink_path = log_dir.join("dpad-launcher.log");
    let _ = std::fs::remove_file(&symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

/// Everything the commands need, resolved from the CLI and config file.
struct Session {
    config: Config,
    registry: DesktopRegistry,
    runner: ProcessRunner,
    prefs: PreferenceStore,
}

impl Session {
    fn load(cli: &Cli) -> Result<Self> {
        let dirs = cli
            .base_dir
            .clone()
            .map_or_else(Directories::new, Directories::with_base);
        dirs.ensure_exists()
            .with_context(|| format!("creating {}", dirs.config.display()))?;

        let config = Config::load(&dirs.config_file)
            .with_context(|| format!("loading {}", dirs.config_file.display()))?;
        let registry = DesktopRegistry::from_env(&config.launcher.extra_app_dirs);
        let runner = ProcessRunner::new(config.launcher.terminal.clone());
        let prefs = PreferenceStore::open_file(&dirs.prefs_file)
            .with_context(|| format!("opening {}", dirs.prefs_file.display()))?;

        tracing::debug!(
            "Config from {}, prefs at {}, app dirs {:?}",
            dirs.config_file.display(),
            dirs.prefs_file.display(),
            registry.dirs()
        );

        Ok(Self {
            config,
            registry,
            runner,
            prefs,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let session = Session::load(&cli)?;

    match cli.command {
        Some(Commands::List) => list_apps(&session),
        Some(Commands::Launch { package }) => Ok(launch_once(&session, &package)),
        Some(Commands::Unhide { package }) => unhide_app(session, &package),
        Some(Commands::Tui) | None => {
            run_tui(session).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn list_apps(session: &Session) -> Result<ExitCode> {
    let mut apps = AppList::new();
    apps.load(&session.registry, &session.prefs);

    for app in apps.all() {
        let marker = if app.hidden { " [hidden]" } else { "" };
        println!("{}\t{}{marker}", app.package_name(), app.display_name());
    }
    Ok(ExitCode::SUCCESS)
}

fn launch_once(session: &Session, package: &str) -> ExitCode {
    match launch(&session.registry, &session.runner, package) {
        LaunchOutcome::Launched => ExitCode::SUCCESS,
        LaunchOutcome::Unavailable(reason) => {
            eprintln!("Unable to launch {package}: {reason:?}");
            ExitCode::FAILURE
        }
    }
}

fn unhide_app(mut session: Session, package: &str) -> Result<ExitCode> {
    let mut apps = AppList::new();
    apps.load(&session.registry, &session.prefs);

    if !apps.unhide(package) {
        eprintln!("No launchable app with package id {package}");
        return Ok(ExitCode::FAILURE);
    }
    apps.save_settings(&mut session.prefs).context("saving preferences")?;
    println!("{package} is visible again");
    Ok(ExitCode::SUCCESS)
}

// Event loop with setup/teardown; key handling lives in LauncherApp
async fn run_tui(session: Session) -> Result<()> {
    let mut app = LauncherApp::new(
        Box::new(session.registry),
        Box::new(session.runner),
        session.prefs,
        &session.config.launcher,
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.resume();

    let mut event_stream = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    let mut needs_render = true;

    let result: Result<()> = async {
        loop {
            if app.should_quit {
                break;
            }

            if needs_render {
                terminal.draw(|f| draw(f, &mut app))?;
                needs_render = false;
            }

            tokio::select! {
                Some(event_result) = event_stream.next() => {
                    let event = match event_result {
                        Ok(e) => e,
                        Err(e) => {
                            tracing::error!("Event stream error: {}", e);
                            continue;
                        }
                    };
                    needs_render = handle_event(&mut app, event);
                }

                _ = ticker.tick() => {
                    needs_render = app.tick(Instant::now());
                }

                _ = sigterm.recv() => {
                    tracing::info!("SIGTERM received, exiting");
                    app.should_quit = true;
                }

                _ = sighup.recv() => {
                    tracing::info!("SIGHUP received, exiting");
                    app.should_quit = true;
                }
            }
        }
        Ok(())
    }
    .await;

    // Leaving the foreground for good
    app.pause();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

/// Returns whether the screen needs a redraw.
fn handle_event(app: &mut LauncherApp, event: Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            tracing::debug!("KEY EVENT: code={:?}, modifiers={:?}", key.code, key.modifiers);

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.should_quit = true;
                return false;
            }

            // Back from a launched app without a focus report
            if app.lifecycle == Lifecycle::Paused {
                app.resume();
            }
            app.handle_key(key.code);
            true
        }
        Event::Mouse(mouse) if mouse.kind != MouseEventKind::Moved => {
            if app.lifecycle == Lifecycle::Paused {
                app.resume();
            }
            app.handle_mouse(mouse);
            true
        }
        Event::FocusGained => {
            app.resume();
            true
        }
        Event::FocusLost => {
            app.pause();
            false
        }
        Event::Resize(_, _) => true,
        _ => false,
    }
}
