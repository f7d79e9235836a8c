use std::{num::NonZeroUsize, path::Path, path::PathBuf};

use adarp_report::{ColumnSchema, SchemaVariant};
use anyhow::Context;
use serde::Deserialize;

use crate::solver::{BuildStep, SolverCommand};

/// Either a built-in report variant or a full custom schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaSource {
    Variant(SchemaVariant),
    Custom(ColumnSchema),
}

impl Default for SchemaSource {
    fn default() -> Self {
        SchemaSource::Variant(SchemaVariant::Grasp)
    }
}

impl SchemaSource {
    pub fn schema(&self) -> ColumnSchema {
        match self {
            SchemaSource::Variant(variant) => variant.schema(),
            SchemaSource::Custom(schema) => schema.clone(),
        }
    }
}

/// Everything a batch needs, in place of the interactive prompts.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Instance files or directories of instance files
    pub instances: Vec<PathBuf>,

    /// Solver runs per instance
    pub runs: NonZeroUsize,

    #[serde(default)]
    pub schema: SchemaSource,

    #[serde(default)]
    pub solver: SolverCommand,

    /// Compile the solver before the first run
    #[serde(default)]
    pub build: Option<BuildStep>,

    /// Folder receiving logs and reports, instead of mirroring `instances` into `results`
    #[serde(default)]
    pub results_dir: Option<PathBuf>,

    /// Keep run logs once their report is written
    #[serde(default)]
    pub keep_logs: bool,

    /// Abort the batch on the first failing solver run
    #[serde(default)]
    pub fail_fast: bool,
}

impl BatchConfig {
    pub fn new(instances: Vec<PathBuf>, runs: NonZeroUsize) -> Self {
        Self {
            instances,
            runs,
            schema: SchemaSource::default(),
            solver: SolverCommand::default(),
            build: None,
            results_dir: None,
            keep_logs: false,
            fail_fast: false,
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch config {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Invalid batch config {}", path.display()))
    }
}
