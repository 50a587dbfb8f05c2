//! Contract of the experiment-automation collaborator
//!
//! The generators only ever talk to an [`Experiment`]. The crate ships one
//! implementation, [`plan::PlanRecorder`], which serializes everything it receives
//! into an experiment plan for the external automation tooling.
pub mod plan;

use crate::{
    algorithms::AlgorithmId,
    config::ExperimentConfig,
    matrix::{
        scatter::{scatter_plots, ScatterPlot},
        ComparisonGroup, ComparisonMatrix, ComparisonPair,
    },
    suite::SuiteError,
};
use globset::GlobMatcher;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("Report {0} was registered more than once")]
    DuplicateReport(String),
    #[error("Failed to load suite: {0}")]
    Suite(#[from] SuiteError),
    #[error("Failed to serialize experiment plan")]
    Serialize(#[from] serde_yaml::Error),
    #[error("Failed to write experiment plan")]
    Write(#[from] std::io::Error),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    /// pairwise comparison of the given attributes
    Comparative {
        algorithm_pairs: Vec<ComparisonPair>,
        attributes: Vec<String>,
    },
    /// relative scatter plot restricted to the listed algorithms
    RelativeScatterPlot {
        attributes: Vec<String>,
        filter_algorithm: Vec<AlgorithmId>,
    },
}

impl Report {
    pub fn comparative(group: ComparisonGroup, attributes: &[String]) -> (String, Self) {
        (
            group.name,
            Self::Comparative {
                algorithm_pairs: group.pairs,
                attributes: attributes.to_vec(),
            },
        )
    }

    pub fn scatter(plot: ScatterPlot) -> (String, Self) {
        (
            plot.name,
            Self::RelativeScatterPlot {
                attributes: vec![plot.attribute],
                filter_algorithm: plot.filter_algorithm,
            },
        )
    }
}

pub trait Experiment {
    /// register the benchmark suite found in `benchmarks`
    fn add_suite(&mut self, benchmarks: &Path, suite: &[String]) -> Result<(), ExperimentError>;

    /// add a report over all algorithms with absolute values
    fn add_absolute_report_step(&mut self, attributes: &[String]);

    fn add_report(&mut self, report: Report, name: String) -> Result<(), ExperimentError>;

    /// hand all registered steps over for execution
    fn run_steps(self) -> Result<(), ExperimentError>;
}

/// every report of the experiment, optionally restricted to names matching `filter`
pub fn reports(config: &ExperimentConfig, filter: Option<&GlobMatcher>) -> Vec<(String, Report)> {
    let prefix = config.prefix();
    let matrix = ComparisonMatrix::new(
        &prefix,
        &config.revisions,
        &config.builds,
        config.nicknames(),
    );

    matrix
        .groups()
        .into_iter()
        .map(|group| Report::comparative(group, &config.attributes))
        .chain(
            scatter_plots(&prefix, &config.scatter)
                .into_iter()
                .map(Report::scatter),
        )
        .filter(|(name, _)| match filter {
            Some(matcher) => {
                let matched = matcher.is_match(name);
                if !matched {
                    debug!(name = %name, "Skipped report not matching the filter");
                }
                matched
            }
            None => true,
        })
        .collect()
}

/// configure `experiment` with suite, absolute report and all generated reports
pub fn register<E: Experiment>(
    experiment: &mut E,
    config: &ExperimentConfig,
    benchmarks: &Path,
    suite: &[String],
    filter: Option<&GlobMatcher>,
) -> Result<(), ExperimentError> {
    experiment.add_suite(benchmarks, suite)?;
    experiment.add_absolute_report_step(&config.attributes);

    let reports = reports(config, filter);
    let count = reports.len();

    for (name, report) in reports {
        experiment.add_report(report, name)?;
    }

    info!(reports = count, "Registered reports");

    Ok(())
}
