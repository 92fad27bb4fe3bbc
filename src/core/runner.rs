//! External deploy tool invocation.
//!
//! The pipeline talks to the deploy tool only through the [`Runner`] trait.
//!
//! ## Implementations
//!
//! - [`Gcloud`]: spawns the tool, echoes its stderr, and waits for it to exit
//! - [`DryRun`]: logs each command and reports success without spawning

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::core::constants;
use crate::error::{CommandError, Result};

/// Runs deploy tool commands.
pub trait Runner {
    /// Program name used when rendering commands.
    fn program(&self) -> &str;

    /// Run the tool with `args` and block until it exits.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Spawn` if the process can't be started, or
    /// `CommandError::Failed` if it exits unsuccessfully.
    fn run(&self, args: &[String]) -> Result<()>;
}

/// Render a command line for logs and error messages.
pub fn render(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deploy tool backed by a real process.
#[derive(Debug, Clone)]
pub struct Gcloud {
    program: String,
}

impl Gcloud {
    /// Use `program` as the deploy tool executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the tool on `PATH`, if it can be found.
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }
}

impl Default for Gcloud {
    fn default() -> Self {
        Self::new(constants::DEFAULT_TOOL)
    }
}

impl Runner for Gcloud {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[String]) -> Result<()> {
        let command = render(&self.program, args);
        debug!(command = %command, "spawning deploy tool");

        // stdout stays attached so the tool's progress output reaches the user
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // stderr is echoed line by line as it arrives and kept for the error
        let mut stderr = String::new();
        if let Some(pipe) = child.stderr.take() {
            for line in BufReader::new(pipe).split(b'\n') {
                let line = String::from_utf8_lossy(&line?).into_owned();
                eprintln!("{line}");
                stderr.push_str(&line);
                stderr.push('\n');
            }
        }

        let status = child.wait()?;
        debug!(command = %command, code = ?status.code(), "deploy tool exited");

        if !status.success() {
            warn!(command = %command, code = ?status.code(), "deploy tool failed");
            return Err(CommandError::Failed {
                command,
                code: status.code(),
                stderr,
            }
            .into());
        }

        Ok(())
    }
}

/// Runner that only reports what would be run.
#[derive(Debug, Clone)]
pub struct DryRun {
    program: String,
}

impl DryRun {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Runner for DryRun {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[String]) -> Result<()> {
        info!(command = %render(&self.program, args), "dry run, not executing");
        Ok(())
    }
}
