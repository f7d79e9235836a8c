use std::{
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::BatchError;

pub const DEFAULT_SOLVER: &str = "build/e-adarp";

/// External solver invocation: `<program> <args..> <instance> <log>`.
///
/// The solver appends one `;` separated line per run to the log, writing the
/// header first when the log is empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolverCommand {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for SolverCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_SOLVER),
            args: vec![],
        }
    }
}

impl SolverCommand {
    pub fn new<P: Into<PathBuf>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn run(&self, instance: &Path, log: &Path) -> Result<ExitStatus, BatchError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(instance)
            .arg(log)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| BatchError::Spawn {
                command: self.program.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{}", stdout.trim_end());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                "Solver exited with {} on {:?}: {}",
                output.status,
                instance,
                stderr.trim_end()
            );
        }

        Ok(output.status)
    }
}

/// Commands compiling the solver before a batch, run in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BuildStep {
    pub commands: Vec<Vec<String>>,
}

impl Default for BuildStep {
    fn default() -> Self {
        Self {
            commands: vec![
                vec![String::from("cmake"), String::from("build")],
                vec![
                    String::from("make"),
                    String::from("-C"),
                    String::from("build"),
                ],
            ],
        }
    }
}

impl BuildStep {
    pub fn run(&self) -> Result<(), BatchError> {
        for command in &self.commands {
            let Some((program, args)) = command.split_first() else {
                continue;
            };

            let line = command.join(" ");
            info!("Running `{}`", line);

            let status = Command::new(program)
                .args(args)
                .status()
                .map_err(|source| BatchError::Spawn {
                    command: line.clone(),
                    source,
                })?;

            if !status.success() {
                return Err(BatchError::Build {
                    command: line,
                    status,
                });
            }
        }

        Ok(())
    }
}
