//! Hand-off to the Presto launcher.
//!
//! The launcher is always invoked as
//!
//! ```text
//! launcher run \
//!   --node-config=<configs>/node.properties \
//!   --jvm-config=<configs>/jvm.config \
//!   --config=<configs>/config.properties \
//!   --log-levels-file=<configs>/log.properties
//! ```
//!
//! with stdio inherited, and the entrypoint exits with whatever code it returns.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::constants::{
    CONFIG_PROPERTIES_FILE, JVM_CONFIG_FILE, LAUNCHER_PROGRAM, LOG_PROPERTIES_FILE,
    NODE_PROPERTIES_FILE,
};
use crate::core::BootstrapError;

/// How a launch attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Dry run; nothing was spawned
    Skipped,
    /// The launcher ran and exited with this code
    Exited(i32),
}

impl LaunchOutcome {
    /// Process exit code the entrypoint should report.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            LaunchOutcome::Skipped => 0,
            LaunchOutcome::Exited(code) => code,
        }
    }
}

/// Builds and runs the launcher command for one config directory.
#[derive(Debug, Clone)]
pub struct Launcher {
    program: String,
    configs_dir: PathBuf,
}

impl Launcher {
    /// Launcher for the rendered files in `configs_dir`, using `launcher` from `PATH`.
    pub fn new(configs_dir: impl AsRef<Path>) -> Self {
        Self {
            program: LAUNCHER_PROGRAM.to_string(),
            configs_dir: configs_dir.as_ref().to_path_buf(),
        }
    }

    /// Run a different program with the same arguments.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let file = |name: &str| self.configs_dir.join(name).display().to_string();
        vec![
            "run".to_string(),
            format!("--node-config={}", file(NODE_PROPERTIES_FILE)),
            format!("--jvm-config={}", file(JVM_CONFIG_FILE)),
            format!("--config={}", file(CONFIG_PROPERTIES_FILE)),
            format!("--log-levels-file={}", file(LOG_PROPERTIES_FILE)),
        ]
    }

    /// Program followed by its arguments.
    #[must_use]
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.program.clone()).chain(self.args()).collect()
    }

    /// Print the command and, unless `dry_run`, run it to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::LaunchFailed`] if the program cannot be spawned or
    /// waited on. A non-zero exit is not an error; it is reported through
    /// [`LaunchOutcome::Exited`].
    pub async fn launch(&self, dry_run: bool) -> Result<LaunchOutcome, BootstrapError> {
        let command_line = self.command_line();

        println!("\n[LAUNCH]: Starting Presto");
        for token in &command_line {
            println!("  {token}");
        }

        if dry_run {
            info!("Dry run, not starting {}", self.program);
            println!("[DRY-RUN]: Skipped launch call");
            return Ok(LaunchOutcome::Skipped);
        }

        debug!("Spawning {:?}", command_line);
        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.failed(&e))?;

        let status = child.wait().await.map_err(|e| self.failed(&e))?;
        let code = exit_code(status);
        if code == 0 {
            info!("{} exited successfully", self.program);
        } else {
            warn!("{} exited with code {}", self.program, code);
        }
        Ok(LaunchOutcome::Exited(code))
    }

    fn failed(&self, error: &std::io::Error) -> BootstrapError {
        BootstrapError::LaunchFailed {
            program: self.program.clone(),
            reason: error.to_string(),
        }
    }
}

/// Exit code of a finished process, using the shell's `128 + signal` for signal deaths.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
