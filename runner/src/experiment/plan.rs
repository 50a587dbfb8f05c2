use super::{Experiment, ExperimentError, Report};
use crate::{
    algorithms::{AlgorithmConfig, AlgorithmId},
    environment::Environments,
    suite::{self, Task},
};
use itertools::{iproduct, Itertools};
use serde::Serialize;
use std::{
    collections::BTreeSet,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

#[derive(Serialize, Debug, Clone)]
pub struct PlannedAlgorithm {
    pub name: AlgorithmId,
    pub revision: String,
    pub config: String,
    pub component_options: Vec<String>,
    pub build_options: Vec<String>,
    pub driver_options: Vec<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct PlannedSuite {
    pub benchmarks: PathBuf,
    pub entries: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Build {
        revisions: Vec<String>,
        builds: Vec<String>,
    },
    StartRuns,
    Fetch,
    AbsoluteReport {
        attributes: Vec<String>,
    },
    Report {
        name: String,
        report: Report,
    },
}

#[derive(Serialize, Debug, Clone)]
/// Everything an experiment was configured with, in registration order
pub struct ExperimentPlan {
    pub environment: Environments,
    pub revisions: Vec<String>,
    pub algorithms: Vec<PlannedAlgorithm>,
    pub suite: Option<PlannedSuite>,
    pub steps: Vec<Step>,
}

/// Experiment that records its steps and writes them out as a YAML plan
#[derive(Debug)]
pub struct PlanRecorder<W: Write> {
    plan: ExperimentPlan,
    report_names: BTreeSet<String>,
    resolve_suite: bool,
    writer: W,
}

impl<W: Write> PlanRecorder<W> {
    /// register every config under every revision, followed by the build, run and fetch steps
    pub fn new(
        revisions: &[String],
        configs: &[AlgorithmConfig],
        environment: Environments,
        writer: W,
    ) -> Self {
        let algorithms = iproduct!(revisions.iter(), configs.iter())
            .map(|(revision, config)| PlannedAlgorithm {
                name: config.id(revision),
                revision: revision.clone(),
                config: config.name.clone(),
                component_options: config.component_options.clone(),
                build_options: config.build_options.clone(),
                driver_options: config.driver_options.clone(),
            })
            .collect_vec();

        debug!(algorithms = algorithms.len(), "Registered algorithms");

        let builds = configs
            .iter()
            .map(|config| config.build.clone())
            .unique()
            .collect();

        Self {
            plan: ExperimentPlan {
                environment,
                revisions: revisions.to_vec(),
                algorithms,
                suite: None,
                steps: vec![
                    Step::Build {
                        revisions: revisions.to_vec(),
                        builds,
                    },
                    Step::StartRuns,
                    Step::Fetch,
                ],
            },
            report_names: BTreeSet::new(),
            resolve_suite: false,
            writer,
        }
    }

    /// expand the suite into single tasks when it is added
    pub fn resolve_suite(mut self, resolve: bool) -> Self {
        self.resolve_suite = resolve;
        self
    }

    pub fn plan(&self) -> &ExperimentPlan {
        &self.plan
    }
}

impl<W: Write> Experiment for PlanRecorder<W> {
    #[instrument(skip(self, suite), level = "debug")]
    fn add_suite(&mut self, benchmarks: &Path, suite: &[String]) -> Result<(), ExperimentError> {
        let tasks = if self.resolve_suite {
            suite::resolve(benchmarks, suite)?
        } else {
            Vec::new()
        };

        self.plan.suite = Some(PlannedSuite {
            benchmarks: benchmarks.to_path_buf(),
            entries: suite.to_vec(),
            tasks,
        });

        Ok(())
    }

    fn add_absolute_report_step(&mut self, attributes: &[String]) {
        self.plan.steps.push(Step::AbsoluteReport {
            attributes: attributes.to_vec(),
        });
    }

    fn add_report(&mut self, report: Report, name: String) -> Result<(), ExperimentError> {
        if !self.report_names.insert(name.clone()) {
            return Err(ExperimentError::DuplicateReport(name));
        }

        debug!(name = %name, "Added report");
        self.plan.steps.push(Step::Report { name, report });

        Ok(())
    }

    #[instrument(skip(self), level = "info")]
    fn run_steps(mut self) -> Result<(), ExperimentError> {
        serde_yaml::to_writer(&mut self.writer, &self.plan)?;
        self.writer.flush()?;

        info!(
            algorithms = self.plan.algorithms.len(),
            steps = self.plan.steps.len(),
            reports = self.report_names.len(),
            "Wrote experiment plan"
        );

        Ok(())
    }
}
