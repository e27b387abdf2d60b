//! Starting applications by package id.

use crate::registry::AppRegistry;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// A resolved "start this app" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchIntent {
    pub package_id: String,
    pub program: String,
    pub args: Vec<String>,
    /// Needs to run inside a terminal emulator
    pub terminal: bool,
    pub working_dir: Option<PathBuf>,
}

impl LaunchIntent {
    pub fn new(package_id: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            program: program.into(),
            args: Vec::new(),
            terminal: false,
            working_dir: None,
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

/// Why a launch did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The registry no longer produces an intent for the package
    NoIntent,
    /// The intent existed but could not be executed
    SpawnFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Launched,
    Unavailable(UnavailableReason),
}

impl LaunchOutcome {
    #[must_use]
    pub fn is_launched(&self) -> bool {
        matches!(self, Self::Launched)
    }
}

/// Executes launch intents.
pub trait IntentRunner {
    /// # Errors
    ///
    /// Returns an error if the intent cannot be started.
    fn run(&self, intent: &LaunchIntent) -> std::io::Result<()>;
}

/// Spawns intents as detached processes with all I/O redirected to null.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    terminal: Option<String>,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(terminal: Option<String>) -> Self {
        Self { terminal }
    }

    fn command_for(&self, intent: &LaunchIntent) -> std::io::Result<Command> {
        let mut cmd = if intent.terminal {
            let Some(terminal) = self.terminal.as_deref() else {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no terminal configured for terminal app",
                ));
            };
            let mut cmd = Command::new(terminal);
            cmd.arg("-e").arg(&intent.program).args(&intent.args);
            cmd
        } else {
            let mut cmd = Command::new(&intent.program);
            cmd.args(&intent.args);
            cmd
        };

        if let Some(dir) = &intent.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Ok(cmd)
    }

    /// Spawn `intent` and reap it on a background thread. Returns the pid.
    fn spawn(&self, intent: &LaunchIntent) -> std::io::Result<u32> {
        let mut child = self.command_for(intent)?.spawn()?;
        let pid = child.id();
        debug!("Spawned {} as pid {pid}", intent.program);

        let reaper = std::thread::Builder::new()
            .name(format!("reap-{pid}"))
            .spawn(move || match child.wait() {
                Ok(status) => debug!("pid {pid} exited with {status}"),
                Err(e) => warn!("Failed to wait for pid {pid}: {e}"),
            });
        if let Err(e) = reaper {
            warn!("Failed to start reaper for pid {pid}: {e}");
        }
        Ok(pid)
    }
}

impl IntentRunner for ProcessRunner {
    fn run(&self, intent: &LaunchIntent) -> std::io::Result<()> {
        self.spawn(intent).map(|_| ())
    }
}

/// Resolve `package_id` through the registry and run it.
pub fn launch(
    registry: &dyn AppRegistry,
    runner: &dyn IntentRunner,
    package_id: &str,
) -> LaunchOutcome {
    let Some(intent) = registry.launch_intent(package_id) else {
        warn!("No launch intent for {package_id}");
        return LaunchOutcome::Unavailable(UnavailableReason::NoIntent);
    };

    match runner.run(&intent) {
        Ok(()) => {
            info!("Launched {package_id}");
            LaunchOutcome::Launched
        }
        Err(e) => {
            warn!("Failed to launch {package_id}: {e}");
            LaunchOutcome::Unavailable(UnavailableReason::SpawnFailed(e.to_string()))
        }
    }
}
