use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use adarp_report::{ColumnSchema, SchemaVariant, generate_report};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use tracing::info;

use crate::{
    batch::BatchOutcome,
    config::{BatchConfig, SchemaSource},
    solver::{BuildStep, DEFAULT_SOLVER, SolverCommand},
};

mod batch;
mod config;
mod error;
mod file_utils;
mod preflight;
mod prompt;
mod solver;
mod table;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the solver over instances and write one report per instance
    Run {
        #[command(flatten)]
        args: RunArgs,
    },
    /// Write the report of an existing run log
    Report {
        #[command(flatten)]
        args: ReportArgs,
    },
    /// Pick instances and run count through prompts, then run
    #[command(visible_alias = "i")]
    Interactive {
        #[command(flatten)]
        solver: SolverArgs,

        #[command(flatten)]
        schema: SchemaArgs,
    },
}

#[derive(Args)]
struct SchemaArgs {
    /// Built-in report variant
    #[arg(long, default_value_t = SchemaVariant::Grasp)]
    schema: SchemaVariant,

    /// JSON column schema, overrides --schema
    #[arg(long)]
    schema_file: Option<PathBuf>,
}

impl SchemaArgs {
    fn source(&self) -> Result<SchemaSource, anyhow::Error> {
        match &self.schema_file {
            Some(path) => Ok(SchemaSource::Custom(ColumnSchema::from_json_file(path)?)),
            None => Ok(SchemaSource::Variant(self.schema)),
        }
    }
}

#[derive(Args)]
struct SolverArgs {
    /// Solver binary [default: build/e-adarp]
    #[arg(long, env = "ADARP_SOLVER")]
    solver: Option<PathBuf>,

    /// Extra argument passed to the solver before the instance path (repeatable)
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    solver_args: Vec<String>,

    /// Compile the solver (cmake build && make -C build) before running
    #[arg(long)]
    build: bool,

    /// Folder receiving logs and reports
    #[arg(long, env = "ADARP_RESULTS_DIR")]
    results_dir: Option<PathBuf>,

    /// Keep run logs once their report is written
    #[arg(long)]
    keep_logs: bool,

    /// Stop at the first failing solver run
    #[arg(long)]
    fail_fast: bool,
}

impl SolverArgs {
    fn apply(&self, config: &mut BatchConfig) {
        let program = self.solver.as_deref().unwrap_or(Path::new(DEFAULT_SOLVER));
        config.solver = SolverCommand::new(program, self.solver_args.clone());
        config.build = self.build.then(BuildStep::default);
        config.results_dir = self.results_dir.clone();
        config.keep_logs = self.keep_logs;
        config.fail_fast = self.fail_fast;
    }

    /// Solver binary and results folder given on the command line or in the
    /// environment take precedence over a batch config file.
    fn override_config(&self, config: &mut BatchConfig) {
        if let Some(program) = &self.solver {
            config.solver.program = program.clone();
        }
        if let Some(results_dir) = &self.results_dir {
            config.results_dir = Some(results_dir.clone());
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// JSON batch configuration, only --solver and --results-dir can be combined with it
    #[arg(
        short,
        long,
        conflicts_with_all = [
            "instances",
            "runs",
            "schema",
            "schema_file",
            "solver_args",
            "build",
            "keep_logs",
            "fail_fast",
        ]
    )]
    config: Option<PathBuf>,

    /// Instance files or directories
    #[arg(short, long, num_args = 1.., required_unless_present = "config")]
    instances: Vec<PathBuf>,

    /// Solver runs per instance
    #[arg(short = 'n', long, required_unless_present = "config")]
    runs: Option<NonZeroUsize>,

    #[command(flatten)]
    solver: SolverArgs,

    #[command(flatten)]
    schema: SchemaArgs,
}

impl RunArgs {
    fn into_config(self) -> Result<BatchConfig, anyhow::Error> {
        if let Some(path) = &self.config {
            let mut config = BatchConfig::from_json_file(path)?;
            self.solver.override_config(&mut config);
            return Ok(config);
        }

        let runs = self.runs.context("--runs is required")?;
        let mut config = BatchConfig::new(self.instances, runs);
        config.schema = self.schema.source()?;
        self.solver.apply(&mut config);

        Ok(config)
    }
}

#[derive(Args)]
struct ReportArgs {
    /// Run log to aggregate
    log: PathBuf,

    #[command(flatten)]
    schema: SchemaArgs,
}

fn print_outcomes(outcomes: &[BatchOutcome], config: &BatchConfig) {
    let schema = config.schema.schema();
    for outcome in outcomes {
        info!(
            "{}: {} runs ({} failed) -> {}",
            outcome.instance.display(),
            outcome.runs,
            outcome.failed_runs,
            outcome.report.display()
        );
        println!("{}", table::summary_table(outcome, schema.summaries()));
    }
}

fn run_batch(config: BatchConfig) -> Result<(), anyhow::Error> {
    let outcomes = batch::run(&config)?;
    print_outcomes(&outcomes, &config);
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Run { args } => run_batch(args.into_config()?)?,
        Commands::Report { args } => {
            let schema = args.schema.source()?.schema();
            let report = generate_report(&args.log, &schema)?;
            println!("{}", report.display());
        }
        Commands::Interactive { solver, schema } => {
            let stdin = std::io::stdin();
            let selection = prompt::ask(&mut stdin.lock(), &mut std::io::stdout())?;

            let mut config = BatchConfig::new(selection.instances, selection.runs);
            config.schema = schema.source()?;
            solver.apply(&mut config);

            run_batch(config)?
        }
    }

    Ok(())
}
