use serde::Deserialize;

use crate::model::geometry::Vec3;

/// parameters for walkable-graph generation.
///
/// distances are in mesh units, slopes in degrees. `spacing` is the grid
/// step between candidate children in x and y; its z component is how much
/// higher each occlusion retry casts from.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// seed position, projected onto the mesh by a downward ray
    pub start: Vec3,
    /// grid step between candidate children
    pub spacing: Vec3,
    /// upper bound on discovered nodes; 0 means unbounded
    pub max_nodes: usize,
    /// largest vertical rise an edge may cross
    pub up_step: f32,
    /// largest vertical drop an edge may cross
    pub down_step: f32,
    /// steepest admissible ascending slope, degrees
    pub up_slope: f32,
    /// steepest admissible descending slope, degrees
    pub down_slope: f32,
    /// ray-drop attempts per candidate column; attempts past the first
    /// cast from progressively higher origins to clear occlusions
    pub max_step_connections: usize,
    /// nodes with fewer connections than this are dropped after expansion
    pub min_connections: usize,
    /// worker threads; -1 or 0 leaves the choice to the runtime
    pub core_count: i32,
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            start: Vec3::ZERO,
            spacing: Vec3::new(1.0, 1.0, 1.0),
            max_nodes: 0,
            up_step: 0.2,
            down_step: 0.2,
            up_slope: 20.0,
            down_slope: 20.0,
            max_step_connections: 1,
            min_connections: 1,
            core_count: -1,
        }
    }
}
