//! Comparison matrix over revisions, builds and search nicknames
//!
//! Every generated group pairs the runs of all nicknames between two points of the
//! revision x build grid:
//! - revision pairs at a fixed build
//! - build pairs at a fixed revision
//! - the diagonal from the first revision and build to the last revision and build
pub mod scatter;

#[cfg(test)]
mod matrix_test;

use crate::algorithms::AlgorithmId;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ComparisonPair {
    pub first: AlgorithmId,
    pub second: AlgorithmId,
    pub label: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ComparisonGroup {
    pub name: String,
    pub pairs: Vec<ComparisonPair>,
}

#[derive(Debug, Clone)]
pub struct ComparisonMatrix {
    prefix: String,
    revisions: Vec<String>,
    builds: Vec<String>,
    nicknames: Vec<String>,
}

impl ComparisonMatrix {
    pub fn new<R, B, N>(prefix: &str, revisions: R, builds: B, nicknames: N) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            prefix: prefix.to_owned(),
            revisions: revisions.into_iter().map(Into::into).collect(),
            builds: builds.into_iter().map(Into::into).collect(),
            nicknames: nicknames.into_iter().map(Into::into).collect(),
        }
    }

    /// one entry per nickname, in nickname order
    fn group<F>(&self, name: String, pair: F) -> ComparisonGroup
    where
        F: Fn(&str) -> (AlgorithmId, AlgorithmId, String),
    {
        let pairs = self
            .nicknames
            .iter()
            .map(|nickname| {
                let (first, second, label) = pair(nickname.as_str());

                ComparisonPair {
                    first,
                    second,
                    label,
                }
            })
            .collect();

        debug!(name = %name, "Generated comparison group");

        ComparisonGroup { name, pairs }
    }

    /// all revision combinations, once per build
    pub fn revision_pairs(&self) -> impl Iterator<Item = ComparisonGroup> + '_ {
        self.builds.iter().flat_map(move |build| {
            self.revisions
                .iter()
                .tuple_combinations()
                .map(move |(first, second)| {
                    self.group(
                        format!("{}-{first}-vs-{second}-{build}", self.prefix),
                        |nickname| {
                            (
                                AlgorithmId::new(first, nickname, build),
                                AlgorithmId::new(second, nickname, build),
                                format!("Diff ({nickname}-{build})"),
                            )
                        },
                    )
                })
        })
    }

    /// all build combinations, once per revision
    pub fn build_pairs(&self) -> impl Iterator<Item = ComparisonGroup> + '_ {
        self.builds
            .iter()
            .tuple_combinations()
            .flat_map(move |(first, second)| {
                self.revisions.iter().map(move |revision| {
                    self.group(
                        format!("{}-{first}-vs-{second}-{revision}", self.prefix),
                        |nickname| {
                            (
                                AlgorithmId::new(revision, nickname, first),
                                AlgorithmId::new(revision, nickname, second),
                                format!("Diff ({nickname}-{revision})"),
                            )
                        },
                    )
                })
            })
    }

    /// first revision on the first build against last revision on the last build
    ///
    /// `None` only when there are no revisions or no builds.
    pub fn diagonal(&self) -> Option<ComparisonGroup> {
        let (first_revision, last_revision) = (self.revisions.first()?, self.revisions.last()?);
        let (first_build, last_build) = (self.builds.first()?, self.builds.last()?);

        Some(self.group(format!("{}-before-vs-after", self.prefix), |nickname| {
            (
                AlgorithmId::new(first_revision, nickname, first_build),
                AlgorithmId::new(last_revision, nickname, last_build),
                format!("Diff ({nickname})"),
            )
        }))
    }

    /// every group of the matrix in registration order
    pub fn groups(&self) -> Vec<ComparisonGroup> {
        self.revision_pairs()
            .chain(self.build_pairs())
            .chain(self.diagonal())
            .collect()
    }
}
