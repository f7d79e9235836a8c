use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Instance path {} does not exist", .0.display())]
    InstanceNotFound(PathBuf),

    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("No instance files found")]
    NoInstances,

    #[error("Solver binary {} not found", .0.display())]
    SolverNotFound(PathBuf),

    #[error("Failed to start {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Build command `{command}` failed with {status}")]
    Build { command: String, status: ExitStatus },

    #[error("Solver failed on {} (run {run}) with {status}", .instance.display())]
    SolverFailed {
        instance: PathBuf,
        run: usize,
        status: ExitStatus,
    },

    #[error("Invalid option: {0:?}")]
    InvalidOption(String),

    #[error("Number of runs must be an integer greater than 0, got {0:?}")]
    InvalidRuns(String),

    #[error("Unexpected end of input")]
    UnexpectedEof,
}
