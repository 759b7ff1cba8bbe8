use serde::Deserialize;

/// reduction applied to a node's incident edge weights by
/// [`super::Graph::aggregate_edge_costs`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeAggregation {
    /// sum of incident edge weights
    Sum,
    /// mean of incident edge weights; an isolated node scores 0
    Average,
    /// number of incident edges
    Count,
}
