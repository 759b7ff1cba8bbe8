use serde::Deserialize;

/// reduction applied per origin over the distances of its hit rays.
/// misses never contribute; an origin whose rays all miss scores 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAggregation {
    /// mean hit distance
    Average,
    /// sum of hit distances
    Sum,
    /// number of rays that hit
    Count,
    /// mean of reciprocal hit distances, weighing near geometry heavily
    InverseAverage,
    /// farthest hit
    Max,
    /// nearest hit
    Min,
}
