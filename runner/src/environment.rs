use crate::config::{ClusterConfig, EnvironmentConfig, ExperimentConfig};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Where the experiment's runs are dispatched to
pub enum Environments {
    Local { processes: usize },
    Cluster(ClusterConfig),
}

impl Environments {
    /// choose the environment for a test or a full run
    pub fn select(config: &EnvironmentConfig, test_run: bool) -> Self {
        let configured_processes = config.local.as_ref().and_then(|local| local.processes);

        if test_run {
            let processes = configured_processes.unwrap_or(1);
            info!(processes = processes, "Test run, using the local environment");

            return Self::Local { processes };
        }

        match &config.cluster {
            Some(cluster) => {
                info!(name = %cluster.name, priority = cluster.priority, "Using the cluster environment");

                Self::Cluster(cluster.clone())
            }
            None => {
                let processes = configured_processes.unwrap_or_else(num_cpus::get);
                warn!(
                    processes = processes,
                    "No cluster environment configured, falling back to the local environment"
                );

                Self::Local { processes }
            }
        }
    }
}

/// suite matching the environment selection
pub fn select_suite(config: &ExperimentConfig, test_run: bool) -> &[String] {
    if test_run {
        &config.suite.test
    } else {
        &config.suite.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocalConfig;

    fn cluster() -> ClusterConfig {
        ClusterConfig {
            name: "maia".to_owned(),
            priority: 0,
            email: Some("someone@example.org".to_owned()),
            partition: None,
        }
    }

    #[test]
    fn test_run_is_local_with_one_process() {
        let config = EnvironmentConfig {
            local: None,
            cluster: Some(cluster()),
        };

        assert_eq!(
            Environments::select(&config, true),
            Environments::Local { processes: 1 }
        );
    }

    #[test]
    fn test_run_respects_configured_processes() {
        let config = EnvironmentConfig {
            local: Some(LocalConfig { processes: Some(4) }),
            cluster: None,
        };

        assert_eq!(
            Environments::select(&config, true),
            Environments::Local { processes: 4 }
        );
    }

    #[test]
    fn full_run_uses_cluster() {
        let config = EnvironmentConfig {
            local: Some(LocalConfig { processes: Some(2) }),
            cluster: Some(cluster()),
        };

        assert_eq!(
            Environments::select(&config, false),
            Environments::Cluster(cluster())
        );
    }

    #[test]
    fn full_run_without_cluster_falls_back_to_local() {
        match Environments::select(&EnvironmentConfig::default(), false) {
            Environments::Local { processes } => assert_eq!(processes, num_cpus::get()),
            other => panic!("expected a local environment, got {other:?}"),
        }
    }
}
