//! Host maintenance hook.
//!
//! Every successful test request runs an optional script from the service
//! user's home directory. The run is bounded by a wall-clock timeout and its
//! result is only ever logged: nothing in here can fail a request.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// File name of the maintenance script, relative to the home directory.
pub const MAINTENANCE_SCRIPT_NAME: &str = "server-maintenance.sh";

/// Hard limit on a single maintenance run.
pub const DEFAULT_MAINTENANCE_TIMEOUT: Duration = Duration::from_secs(300);

/// Interpreter the script is handed to.
pub const DEFAULT_SHELL: &str = "bash";

/// `~/server-maintenance.sh`, if a home directory can be resolved.
pub fn default_script_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(MAINTENANCE_SCRIPT_NAME))
}

#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// Script to run. `None` behaves like a script that does not exist.
    pub script: Option<PathBuf>,
    pub timeout: Duration,
    pub shell: String,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            script: default_script_path(),
            timeout: DEFAULT_MAINTENANCE_TIMEOUT,
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

/// How a maintenance run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// No script on disk.
    Skipped,
    /// The process ran to completion, whatever its exit code.
    Completed,
    /// The process was killed at the timeout.
    TimedOut,
    /// The process could not be started or waited on.
    Failed,
}

/// Result of one maintenance run. Internal only, never sent to clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceOutcome {
    /// A script was found and an invocation was attempted.
    pub ran: bool,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    /// Recorded for logs; it does not affect [`OutcomeKind`].
    pub exit_code: Option<i32>,
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl MaintenanceOutcome {
    fn skipped() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> OutcomeKind {
        if !self.ran {
            OutcomeKind::Skipped
        } else if self.timed_out {
            OutcomeKind::TimedOut
        } else if self.error.is_some() {
            OutcomeKind::Failed
        } else {
            OutcomeKind::Completed
        }
    }

    /// Emit the log lines for this outcome.
    pub fn log(&self) {
        match self.kind() {
            OutcomeKind::Skipped => {
                info!("Maintenance script not found, skipping maintenance");
            }
            OutcomeKind::Completed => {
                info!("Maintenance output: {}", self.stdout);
                if !self.stderr.is_empty() {
                    warn!("Maintenance errors: {}", self.stderr);
                }
                debug!(
                    "Maintenance exit code {:?} after {:?}",
                    self.exit_code, self.elapsed
                );
                info!("Maintenance completed successfully");
            }
            OutcomeKind::TimedOut => {
                warn!("Maintenance script timed out after {:?}", self.elapsed);
            }
            OutcomeKind::Failed => {
                error!(
                    "Error running maintenance script: {}",
                    self.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
}

/// Runs the maintenance script with a bounded wait.
#[derive(Debug, Clone)]
pub struct MaintenanceRunner {
    config: MaintenanceConfig,
}

impl MaintenanceRunner {
    pub fn new(config: MaintenanceConfig) -> Self {
        Self { config }
    }

    /// Run the script once and wait for it, up to the configured timeout.
    ///
    /// Never returns an error: every failure mode is folded into the outcome.
    pub async fn run(&self) -> MaintenanceOutcome {
        info!("Running server maintenance...");

        let Some(script) = self.config.script.as_ref() else {
            return MaintenanceOutcome::skipped();
        };
        if !tokio::fs::try_exists(script).await.unwrap_or(false) {
            debug!("No maintenance script at {}", script.display());
            return MaintenanceOutcome::skipped();
        }

        info!("Executing maintenance script {}...", script.display());
        let started = Instant::now();

        // Dropping the output future on timeout kills the child.
        let result = tokio::time::timeout(
            self.config.timeout,
            Command::new(&self.config.shell)
                .arg(script)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let mut outcome = MaintenanceOutcome {
            ran: true,
            elapsed: started.elapsed(),
            ..MaintenanceOutcome::default()
        };

        match result {
            Ok(Ok(output)) => {
                outcome.stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                outcome.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                outcome.exit_code = output.status.code();
            }
            Ok(Err(e)) => {
                outcome.error = Some(e.to_string());
            }
            Err(_) => {
                outcome.timed_out = true;
            }
        }
        outcome
    }
}
