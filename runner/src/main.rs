mod algorithms;
mod config;
mod environment;
mod experiment;
mod matrix;
mod suite;

use crate::{
    algorithms::build_configs,
    config::{ConfigErrors, ExperimentConfig},
    environment::{select_suite, Environments},
    experiment::{plan::PlanRecorder, Experiment, ExperimentError},
};
use clap::{Args, Parser, Subcommand};
use globset::{Glob, GlobMatcher};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::exit,
};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum RunnerError {
    #[error("{0}")]
    Config(#[from] ConfigErrors),
    #[error("{0}")]
    Experiment(#[from] ExperimentError),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan revision and build comparisons for planner issues")]
struct Cli {
    /// Log filter directives, e.g. `debug` or `issuelab=trace`
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ExperimentArgs {
    /// Experiment file (YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// Run on the local machine with the test suite
    #[arg(long, env = "ISSUELAB_TEST_RUN")]
    test_run: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the complete experiment plan
    Plan {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Directory containing the benchmark domains
        #[arg(long, env = "DOWNWARD_BENCHMARKS")]
        benchmarks_dir: PathBuf,

        /// Write the plan to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only register reports whose name matches this glob
        #[arg(long)]
        filter: Option<String>,

        /// Expand the suite into single tasks
        #[arg(long)]
        resolve: bool,
    },
    /// List the algorithm configurations
    Configs {
        #[command(flatten)]
        experiment: ExperimentArgs,
    },
    /// List the names of all generated reports
    Reports {
        #[command(flatten)]
        experiment: ExperimentArgs,

        /// Only list reports whose name matches this glob
        #[arg(long)]
        filter: Option<String>,
    },
}

fn compile_filter(filter: Option<&str>) -> Result<Option<GlobMatcher>, ConfigErrors> {
    match filter {
        Some(pattern) => Ok(Some(Glob::new(pattern)?.compile_matcher())),
        None => Ok(None),
    }
}

fn run(command: Command) -> Result<(), RunnerError> {
    match command {
        Command::Plan {
            experiment: args,
            benchmarks_dir,
            output,
            filter,
            resolve,
        } => {
            let config = ExperimentConfig::load(&args.config)?;
            let filter = compile_filter(filter.as_deref())?;
            let configs = build_configs(&config.searches, &config.builds);
            let environment = Environments::select(&config.environment, args.test_run);

            let writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout().lock()),
            };

            let mut recorder =
                PlanRecorder::new(&config.revisions, &configs, environment, writer)
                    .resolve_suite(resolve);

            experiment::register(
                &mut recorder,
                &config,
                &benchmarks_dir,
                select_suite(&config, args.test_run),
                filter.as_ref(),
            )?;
            recorder.run_steps()?;

            if let Some(path) = output {
                info!(path = %path.to_string_lossy(), "Experiment plan written");
            }
        }
        Command::Configs { experiment: args } => {
            let config = ExperimentConfig::load(&args.config)?;
            let mut stdout = io::stdout().lock();

            for algorithm in build_configs(&config.searches, &config.builds) {
                writeln!(stdout, "{}", algorithm.name)?;
            }
        }
        Command::Reports {
            experiment: args,
            filter,
        } => {
            let config = ExperimentConfig::load(&args.config)?;
            let filter = compile_filter(filter.as_deref())?;
            let mut stdout = io::stdout().lock();

            for (name, _) in experiment::reports(&config, filter.as_ref()) {
                writeln!(stdout, "{name}")?;
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .with_writer(io::stderr)
        .init();

    if let Err(error) = run(cli.command) {
        error!("{error}");

        exit(1)
    }
}
