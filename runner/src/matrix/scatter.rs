use crate::{algorithms::AlgorithmId, config::ScatterConfig};
use serde::Serialize;
use tracing::debug;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
/// Relative scatter plot of a single attribute between two runs of one configuration
pub struct ScatterPlot {
    pub name: String,
    pub attribute: String,
    pub filter_algorithm: Vec<AlgorithmId>,
}

/// expand every request into one plot per attribute
pub fn scatter_plots(prefix: &str, requests: &[ScatterConfig]) -> Vec<ScatterPlot> {
    requests
        .iter()
        .filter_map(|request| match request.revisions.as_slice() {
            [first, second] => Some((request, first, second)),
            // rejected by the preflight checks
            _ => None,
        })
        .flat_map(|(request, first, second)| {
            request.attributes.iter().map(move |attribute| {
                let name = format!(
                    "{prefix}-relative-scatter-{}-{}-{first}-vs-{second}-{attribute}",
                    request.nickname, request.build
                );
                debug!(name = %name, "Generated scatter plot");

                ScatterPlot {
                    name,
                    attribute: attribute.clone(),
                    filter_algorithm: vec![
                        AlgorithmId::new(first, &request.nickname, &request.build),
                        AlgorithmId::new(second, &request.nickname, &request.build),
                    ],
                }
            })
        })
        .collect()
}
