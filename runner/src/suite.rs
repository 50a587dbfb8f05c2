use ignore::{DirEntry, WalkBuilder};
use itertools::Itertools;
use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Benchmarks directory {0:?} does not exist")]
    MissingBenchmarks(PathBuf),
    #[error("Domain {0} was not found in the benchmarks directory")]
    MissingDomain(String),
    #[error("Problem {0}:{1} was not found in the benchmarks directory")]
    MissingProblem(String, String),
    #[error("Suite entry '{0}' is malformed")]
    MalformedEntry(String),
}

/// `domain` or `domain:problem`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteEntry {
    pub domain: String,
    pub problem: Option<String>,
}

impl FromStr for SuiteEntry {
    type Err = SuiteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once(':') {
            None if !value.is_empty() => Ok(Self {
                domain: value.to_owned(),
                problem: None,
            }),
            Some((domain, problem))
                if !domain.is_empty() && !problem.is_empty() && !problem.contains(':') =>
            {
                Ok(Self {
                    domain: domain.to_owned(),
                    problem: Some(problem.to_owned()),
                })
            }
            _ => Err(SuiteError::MalformedEntry(value.to_owned())),
        }
    }
}

impl fmt::Display for SuiteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Some(problem) => write!(f, "{}:{problem}", self.domain),
            None => write!(f, "{}", self.domain),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub domain: String,
    pub problem: String,
    pub path: PathBuf,
}

/// problem files of a domain directory, domain files excluded
fn is_problem(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();

    entry.file_type().map_or(false, |kind| kind.is_file())
        && name.ends_with(".pddl")
        && !name.contains("domain")
}

/// expand every suite entry to the problem files in `benchmarks`
pub fn resolve<S: AsRef<str>>(benchmarks: &Path, suite: &[S]) -> Result<Vec<Task>, SuiteError> {
    if !benchmarks.is_dir() {
        return Err(SuiteError::MissingBenchmarks(benchmarks.to_path_buf()));
    }

    let mut tasks = Vec::new();

    for entry in suite.iter() {
        let entry: SuiteEntry = entry.as_ref().parse()?;
        let domain_path = benchmarks.join(&entry.domain);

        if !domain_path.is_dir() {
            return Err(SuiteError::MissingDomain(entry.domain));
        }

        match entry.problem {
            Some(problem) => {
                let path = domain_path.join(&problem);

                if !path.is_file() {
                    return Err(SuiteError::MissingProblem(entry.domain, problem));
                }

                tasks.push(Task {
                    domain: entry.domain,
                    problem,
                    path,
                });
            }
            None => {
                let paths = WalkBuilder::new(&domain_path)
                    .max_depth(Some(1))
                    .build()
                    .filter_map(|result| match result {
                        Ok(dir_entry) => Some(dir_entry),
                        Err(error) => {
                            warn!(domain = %entry.domain, "Failed to read domain entry: {error}");
                            None
                        }
                    })
                    .filter(is_problem)
                    .map(DirEntry::into_path)
                    .sorted()
                    .collect_vec();

                if paths.is_empty() {
                    warn!(domain = %entry.domain, "Domain does not contain any problems");
                }
                debug!(domain = %entry.domain, problems = paths.len(), "Resolved domain");

                tasks.extend(paths.into_iter().map(|path| Task {
                    domain: entry.domain.clone(),
                    problem: path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    path,
                }));
            }
        }
    }

    info!(tasks = tasks.len(), "Resolved suite");

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn benchmarks() -> TempDir {
        let dir = tempfile::tempdir().unwrap();

        for (domain, file) in [
            ("depot", "domain.pddl"),
            ("depot", "p01.pddl"),
            ("depot", "p02.pddl"),
            ("gripper", "domain.pddl"),
            ("gripper", "prob01.pddl"),
            ("gripper", "README"),
        ] {
            fs::create_dir_all(dir.path().join(domain)).unwrap();
            fs::write(dir.path().join(domain).join(file), "(define)").unwrap();
        }

        dir
    }

    #[test]
    fn parse_entries() {
        assert_eq!(
            "depot:p01.pddl".parse::<SuiteEntry>().unwrap(),
            SuiteEntry {
                domain: "depot".to_owned(),
                problem: Some("p01.pddl".to_owned())
            }
        );
        assert_eq!("airport".parse::<SuiteEntry>().unwrap().problem, None);
        assert_eq!(
            "depot:p01.pddl".parse::<SuiteEntry>().unwrap().to_string(),
            "depot:p01.pddl"
        );
        assert!("".parse::<SuiteEntry>().is_err());
        assert!("depot:".parse::<SuiteEntry>().is_err());
        assert!("a:b:c".parse::<SuiteEntry>().is_err());
    }

    #[test]
    fn resolves_domains_and_problems() {
        let dir = benchmarks();
        let tasks = resolve(dir.path(), &["depot", "gripper:prob01.pddl"]).unwrap();

        assert_eq!(
            tasks
                .iter()
                .map(|task| format!("{}:{}", task.domain, task.problem))
                .collect_vec(),
            ["depot:p01.pddl", "depot:p02.pddl", "gripper:prob01.pddl"]
        );
        assert_eq!(tasks[2].path, dir.path().join("gripper").join("prob01.pddl"));
    }

    #[test]
    fn missing_domain() {
        let dir = benchmarks();

        assert!(matches!(
            resolve(dir.path(), &["airport"]),
            Err(SuiteError::MissingDomain(domain)) if domain == "airport"
        ));
    }

    #[test]
    fn missing_problem() {
        let dir = benchmarks();

        assert!(matches!(
            resolve(dir.path(), &["depot:p99.pddl"]),
            Err(SuiteError::MissingProblem(..))
        ));
    }

    #[test]
    fn missing_benchmarks() {
        let dir = benchmarks();

        assert!(matches!(
            resolve::<&str>(&dir.path().join("nope"), &[]),
            Err(SuiteError::MissingBenchmarks(_))
        ));
    }
}
