use std::path::{Component, Path, PathBuf};

use adarp_report::{
    ColumnSchema,
    aggregator::{LOG_EXTENSION, report_path_for},
    run_log::RunLog,
    summary::{ColumnSummary, summarize},
    write_report,
    writer::XlsxReportWriter,
};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::{
    config::BatchConfig,
    error::BatchError,
    preflight::{ensure_program, resolve_instances},
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const INSTANCES_DIR: &str = "instances";
const RESULTS_DIR: &str = "results";

/// Result of all runs over one instance.
#[derive(Debug)]
pub struct BatchOutcome {
    pub instance: PathBuf,
    pub report: PathBuf,
    pub runs: usize,
    pub failed_runs: usize,
    pub summaries: Vec<ColumnSummary>,
}

/// Run log path for `instance`.
///
/// Logs land in `results_dir` when given, otherwise next to the instance with
/// every `instances` folder swapped for `results`. The file name is the
/// instance stem followed by `timestamp`.
pub fn log_path_for(instance: &Path, results_dir: Option<&Path>, timestamp: &str) -> PathBuf {
    let dir = match results_dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            let mut dir = PathBuf::new();
            for component in instance.parent().unwrap_or(Path::new("")).components() {
                match component {
                    Component::Normal(name) if name == INSTANCES_DIR => dir.push(RESULTS_DIR),
                    other => dir.push(other),
                }
            }
            dir
        }
    };

    let stem = instance
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    dir.join(format!("{stem}_{timestamp}.{LOG_EXTENSION}"))
}

/// Appends a counter to the log name while the log or its report already exists.
fn unused_log_path(path: PathBuf) -> PathBuf {
    let is_free = |path: &Path| !path.exists() && !report_path_for(path).exists();
    if is_free(path.as_path()) {
        return path;
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = path.with_file_name(format!("{stem}_{counter}.{LOG_EXTENSION}"));
        if is_free(candidate.as_path()) {
            return candidate;
        }
        counter += 1;
    }
}

pub fn run(config: &BatchConfig) -> Result<Vec<BatchOutcome>, anyhow::Error> {
    let instances = resolve_instances(&config.instances)?;
    info!(
        "Running {} instances, {} runs each",
        instances.len(),
        config.runs
    );

    if let Some(build) = &config.build {
        build.run()?;
    }

    ensure_program(&config.solver.program)?;

    let schema = config.schema.schema();
    let mut outcomes = Vec::with_capacity(instances.len());

    for instance in instances {
        let timestamp = jiff::Zoned::now().strftime(TIMESTAMP_FORMAT).to_string();
        let log_path = unused_log_path(log_path_for(
            &instance,
            config.results_dir.as_deref(),
            &timestamp,
        ));

        outcomes.push(run_instance(config, &schema, &instance, &log_path)?);
    }

    Ok(outcomes)
}

fn run_instance(
    config: &BatchConfig,
    schema: &ColumnSchema,
    instance: &Path,
    log_path: &Path,
) -> Result<BatchOutcome, anyhow::Error> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create results folder {}", parent.display()))?;
    }

    info!("Solving {:?}, logging to {:?}", instance, log_path);

    let runs = config.runs.get();
    let bar = ProgressBar::new(runs as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(
        instance
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );

    let mut failed_runs = 0;
    for run in 1..=runs {
        let status = config.solver.run(instance, log_path)?;

        if !status.success() {
            failed_runs += 1;
            if config.fail_fast {
                bar.abandon();
                return Err(BatchError::SolverFailed {
                    instance: instance.to_path_buf(),
                    run,
                    status,
                }
                .into());
            }
        }

        bar.inc(1);
    }

    bar.finish_and_clear();

    if failed_runs > 0 {
        warn!("{} of {} runs failed on {:?}", failed_runs, runs, instance);
    }

    let context = || format!("Failed to generate report for {}", instance.display());
    let log = RunLog::from_file(log_path, schema.arity()).with_context(context)?;
    let report =
        write_report(&log, log_path, schema, &XlsxReportWriter::default()).with_context(context)?;

    let labels: Vec<&str> = schema
        .columns()
        .iter()
        .map(|column| column.label.as_str())
        .collect();
    let summaries = summarize(&log, &labels);

    if !config.keep_logs {
        std::fs::remove_file(log_path)
            .with_context(|| format!("Failed to remove run log {}", log_path.display()))?;
    }

    Ok(BatchOutcome {
        instance: instance.to_path_buf(),
        report,
        runs: log.len(),
        failed_runs,
        summaries,
    })
}
