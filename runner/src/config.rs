use crate::{
    algorithms::{SearchStrategy, SEPARATOR},
    experiment::reports,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Error, path::Path};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Globs were invalid")]
    InvalidGlobs(#[from] globset::Error),
    #[error("Experiment file could not be read: {0}")]
    FileNotReadable(#[from] Error),
    #[error("Experiment file is malformed: {0}")]
    Malformed(#[from] serde_yaml::Error),
    #[error("Experiment file failed the preflight checks")]
    FailedPreflight,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    // issue number, prefixes every report name
    pub issue: u32,
    // revisions under test, earlier revisions are compared against later ones
    pub revisions: Vec<String>,
    pub builds: Vec<String>,
    pub searches: Vec<SearchStrategy>,
    // attributes compared by every comparative report
    #[serde(default = "default_attributes")]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub suite: SuiteConfig,
    #[serde(default, alias = "env")]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub scatter: Vec<ScatterConfig>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    #[serde(default)]
    pub default: Vec<String>,
    #[serde(default = "default_test_suite")]
    pub test: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            default: Vec::new(),
            test: default_test_suite(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub local: Option<LocalConfig>,
    pub cluster: Option<ClusterConfig>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    // upper bound of concurrently running processes
    pub processes: Option<usize>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    pub email: Option<String>,
    pub partition: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct ScatterConfig {
    #[serde(alias = "nick")]
    pub nickname: String,
    pub build: String,
    // exactly two revisions, the first one is plotted on the x axis
    pub revisions: Vec<String>,
    #[serde(default = "default_scatter_attributes")]
    pub attributes: Vec<String>,
}

impl ExperimentConfig {
    /// read and validate an experiment file
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let config: Self = serde_yaml::from_reader(File::open(path)?)?;

        info!(
            path = %path.to_string_lossy(),
            issue = config.issue,
            "Loaded experiment file"
        );

        if config.preflight_checks() {
            Err(ConfigErrors::FailedPreflight)
        } else {
            Ok(config)
        }
    }

    /// common prefix of every report name
    pub fn prefix(&self) -> String {
        format!("issue{}", self.issue)
    }

    pub fn nicknames(&self) -> impl Iterator<Item = &str> + Clone {
        self.searches.iter().map(|search| search.nickname.as_str())
    }

    /// returns true if any problem was found
    pub fn preflight_checks(&self) -> bool {
        // report every problem at once instead of piece-by-piece to make debugging easier for users
        let mut contains_error = false;

        contains_error |= check_names("revisions", self.revisions.iter(), false);
        contains_error |= check_names("builds", self.builds.iter(), true);
        contains_error |= check_names("searches", self.nicknames(), true);

        for search in self.searches.iter() {
            if search.command.trim().is_empty() {
                error!("searches.{} has an empty search command", search.nickname);
                contains_error = true;
            }
        }

        if self.attributes.is_empty() {
            error!("attributes must contain at least one attribute to compare");
            contains_error = true;
        }

        if self.suite.default.is_empty() {
            warn!("suite.default is empty, full runs will not contain any tasks");
        }
        if self.suite.test.is_empty() {
            warn!("suite.test is empty, test runs will not contain any tasks");
        }

        if let Some(local) = &self.environment.local {
            if local.processes == Some(0) {
                error!("environment.local.processes cannot be 0");
                contains_error = true;
            }
        }

        if let Some(cluster) = &self.environment.cluster {
            if cluster.name.trim().is_empty() {
                error!("environment.cluster.name cannot be empty");
                contains_error = true;
            }
        }

        for (index, scatter) in self.scatter.iter().enumerate() {
            if !self
                .nicknames()
                .any(|nickname| nickname == scatter.nickname)
            {
                error!(
                    "scatter.{index} references search {} but it is not defined",
                    scatter.nickname
                );
                contains_error = true;
            }

            if !self.builds.contains(&scatter.build) {
                error!(
                    "scatter.{index} references build {} but it is not defined",
                    scatter.build
                );
                contains_error = true;
            }

            for revision in scatter.revisions.iter() {
                if !self.revisions.contains(revision) {
                    error!("scatter.{index} references revision {revision} but it is not defined");
                    contains_error = true;
                }
            }

            if scatter.revisions.len() != 2 || scatter.revisions.iter().all_equal() {
                error!("scatter.{index}.revisions must name exactly two distinct revisions");
                contains_error = true;
            }

            if scatter.attributes.is_empty() {
                warn!("scatter.{index} has no attributes and will not produce any plot");
            }
        }

        // revision and build names share one name template space
        for name in reports(self, None)
            .into_iter()
            .map(|(name, _)| name)
            .duplicates()
        {
            error!("Report {name} would be generated more than once, rename revisions or builds");
            contains_error = true;
        }

        contains_error
    }
}

/// checks a list of names for emptiness, duplicates and (optionally) the id separator
fn check_names<I, S>(field: &str, names: I, reject_separator: bool) -> bool
where
    I: Iterator<Item = S> + Clone,
    S: AsRef<str>,
{
    let mut contains_error = false;

    if names.clone().next().is_none() {
        error!("{field} must not be empty");
        contains_error = true;
    }

    for name in names.clone() {
        let name = name.as_ref();

        if name.is_empty() {
            error!("{field} contains an empty name");
            contains_error = true;
        } else if reject_separator && name.contains(SEPARATOR) {
            error!("{field} entry '{name}' must not contain '{SEPARATOR}', algorithm ids could not be parsed");
            contains_error = true;
        }
    }

    for duplicate in names.map(|name| name.as_ref().to_owned()).duplicates() {
        error!("{field} contains '{duplicate}' more than once");
        contains_error = true;
    }

    contains_error
}

fn default_attributes() -> Vec<String> {
    [
        "coverage",
        "error",
        "expansions_until_last_jump",
        "memory",
        "score_memory",
        "total_time",
        "score_total_time",
    ]
    .map(String::from)
    .to_vec()
}

fn default_scatter_attributes() -> Vec<String> {
    vec!["total_time".to_owned(), "memory".to_owned()]
}

fn default_test_suite() -> Vec<String> {
    vec!["depot:p01.pddl".to_owned(), "gripper:prob01.pddl".to_owned()]
}
