use super::SEPARATOR;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Algorithm id '{0}' needs the form <revision>-<nickname>-<build>")]
    MissingSegment(String),
    #[error("Algorithm id '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// Key of a single algorithm run in the results store
///
/// Rendered as `{revision}-{nickname}-{build}`. Revisions may contain the separator,
/// nicknames and builds may not, which is what makes the rendering reversible.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlgorithmId {
    pub revision: String,
    pub nickname: String,
    pub build: String,
}

impl AlgorithmId {
    pub fn new(revision: &str, nickname: &str, build: &str) -> Self {
        Self {
            revision: revision.to_owned(),
            nickname: nickname.to_owned(),
            build: build.to_owned(),
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.revision, self.nickname, self.build
        )
    }
}

impl FromStr for AlgorithmId {
    type Err = IdentifierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut segments = value.rsplitn(3, SEPARATOR);

        match (segments.next(), segments.next(), segments.next()) {
            (Some(build), Some(nickname), Some(revision)) => {
                if build.is_empty() || nickname.is_empty() || revision.is_empty() {
                    Err(IdentifierError::EmptySegment(value.to_owned()))
                } else {
                    Ok(Self::new(revision, nickname, build))
                }
            }
            _ => Err(IdentifierError::MissingSegment(value.to_owned())),
        }
    }
}

impl Serialize for AlgorithmId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AlgorithmId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
