pub mod id;

pub use id::AlgorithmId;

use itertools::iproduct;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Separator used in configuration names and algorithm ids
pub const SEPARATOR: char = '-';

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
/// A planner search configuration identified by a short nickname
pub struct SearchStrategy {
    #[serde(alias = "nick")]
    pub nickname: String,
    #[serde(rename = "search")]
    pub command: String,
}

impl SearchStrategy {
    pub fn new(nickname: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            command: command.into(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
/// One search strategy bound to one build
pub struct AlgorithmConfig {
    pub name: String,
    pub nickname: String,
    pub build: String,
    pub component_options: Vec<String>,
    pub build_options: Vec<String>,
    pub driver_options: Vec<String>,
}

impl AlgorithmConfig {
    pub fn new(search: &SearchStrategy, build: &str) -> Self {
        Self {
            name: format!("{}{SEPARATOR}{build}", search.nickname),
            nickname: search.nickname.clone(),
            build: build.to_owned(),
            component_options: vec!["--search".to_owned(), search.command.clone()],
            build_options: vec![build.to_owned()],
            driver_options: vec!["--build".to_owned(), build.to_owned()],
        }
    }

    /// id of this configuration when run under `revision`
    pub fn id(&self, revision: &str) -> AlgorithmId {
        AlgorithmId::new(revision, &self.nickname, &self.build)
    }
}

/// Cross product of all searches with all builds, builds vary fastest
pub fn build_configs<S: AsRef<str>>(searches: &[SearchStrategy], builds: &[S]) -> Vec<AlgorithmConfig> {
    let configs: Vec<_> = iproduct!(searches.iter(), builds.iter())
        .map(|(search, build)| AlgorithmConfig::new(search, build.as_ref()))
        .collect();

    debug!(
        searches = searches.len(),
        builds = builds.len(),
        "Built {} algorithm configurations",
        configs.len()
    );

    configs
}
