use rayon::prelude::*;
use serde::Deserialize;

use super::{fibonacci_directions, ViewAggregation, ViewAnalysisError};
use crate::model::geometry::{Ray, Scene, Vec3, RAY_OFFSET};
use crate::model::graph::{Graph, NodeId};

/// distance recorded for a miss when no finite maximum is configured
const MISS_SENTINEL: f32 = -1.0;

/// parameters for spherical view analysis
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewAnalysisConfig {
    /// directions requested per origin before field-of-view clamping
    pub ray_count: usize,
    /// how far above each origin the rays start (eye height)
    pub height_offset: f32,
    /// hit search range per ray; infinite by default
    pub max_distance: f32,
    /// discard directions more than this many degrees above the horizon
    pub upward_fov: Option<f32>,
    /// discard directions more than this many degrees below the horizon
    pub downward_fov: Option<f32>,
}

impl Default for ViewAnalysisConfig {
    fn default() -> ViewAnalysisConfig {
        ViewAnalysisConfig {
            ray_count: 1000,
            height_offset: 1.7,
            max_distance: f32::INFINITY,
            upward_fov: None,
            downward_fov: None,
        }
    }
}

impl ViewAnalysisConfig {
    fn validate(&self) -> Result<(), ViewAnalysisError> {
        if self.ray_count == 0 {
            return Err(ViewAnalysisError::InvalidConfig(String::from(
                "ray_count must be at least 1",
            )));
        }
        if !(self.max_distance > 0.0) {
            return Err(ViewAnalysisError::InvalidConfig(format!(
                "max_distance must be positive, got {}",
                self.max_distance
            )));
        }
        Ok(())
    }
}

/// one ray of the per-ray result grid
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewRayResult {
    pub hit: bool,
    /// hit distance; for misses, the configured max distance or -1 when
    /// the search range is unbounded
    pub distance: f32,
    /// id of the mesh hit, if any
    pub mesh_id: Option<u32>,
}

/// the full origins x directions result grid, row-major by origin
#[derive(Clone, Debug)]
pub struct ViewRayGrid {
    pub results: Vec<ViewRayResult>,
    pub origin_count: usize,
    /// directions surviving the field-of-view clamp; the grid row width
    pub rays_per_origin: usize,
}

/// per-origin aggregated view scores
#[derive(Clone, Debug)]
pub struct ScoreArray {
    pub scores: Vec<f32>,
    pub aggregation: ViewAggregation,
}

/// cast a stratified direction bundle from every origin and reduce each
/// origin's hit distances to one score. origins are processed in
/// parallel; scores are indexed by input order.
pub fn sphere_view_analysis(
    scene: &Scene,
    origins: &[Vec3],
    config: &ViewAnalysisConfig,
    aggregation: ViewAggregation,
) -> Result<ScoreArray, ViewAnalysisError> {
    config.validate()?;
    let directions =
        fibonacci_directions(config.ray_count, config.upward_fov, config.downward_fov);
    log::debug!(
        "view analysis: {} origins x {} rays, {:?}",
        origins.len(),
        directions.len(),
        aggregation
    );

    let scores = origins
        .par_iter()
        .map(|origin| {
            let eye = *origin + Vec3::UP.scaled(config.height_offset + RAY_OFFSET);
            let hits = directions.iter().filter_map(|direction| {
                scene
                    .intersect_within(&Ray::new(eye, *direction), config.max_distance)
                    .map(|hit| hit.distance)
            });
            aggregate(hits, aggregation)
        })
        .collect();

    Ok(ScoreArray {
        scores,
        aggregation,
    })
}

/// [`sphere_view_analysis`] with origins given as graph node ids
pub fn sphere_view_analysis_nodes(
    scene: &Scene,
    graph: &Graph,
    nodes: &[NodeId],
    config: &ViewAnalysisConfig,
    aggregation: ViewAggregation,
) -> Result<ScoreArray, ViewAnalysisError> {
    let origins = nodes
        .iter()
        .map(|id| graph.node_from_id(*id).map(|n| n.position))
        .collect::<Result<Vec<_>, _>>()?;
    sphere_view_analysis(scene, &origins, config, aggregation)
}

/// cast the bundle from every origin and emit the full result grid
/// instead of aggregating
pub fn sphere_view_analysis_per_ray(
    scene: &Scene,
    origins: &[Vec3],
    config: &ViewAnalysisConfig,
) -> Result<ViewRayGrid, ViewAnalysisError> {
    config.validate()?;
    let directions =
        fibonacci_directions(config.ray_count, config.upward_fov, config.downward_fov);
    let miss_distance = if config.max_distance.is_finite() {
        config.max_distance
    } else {
        MISS_SENTINEL
    };

    let results: Vec<ViewRayResult> = origins
        .par_iter()
        .flat_map_iter(|origin| {
            let eye = *origin + Vec3::UP.scaled(config.height_offset + RAY_OFFSET);
            directions.iter().map(move |direction| {
                match scene.intersect_within(&Ray::new(eye, *direction), config.max_distance) {
                    Some(hit) => ViewRayResult {
                        hit: true,
                        distance: hit.distance,
                        mesh_id: Some(hit.mesh_id),
                    },
                    None => ViewRayResult {
                        hit: false,
                        distance: miss_distance,
                        mesh_id: None,
                    },
                }
            })
        })
        .collect();

    Ok(ViewRayGrid {
        results,
        origin_count: origins.len(),
        rays_per_origin: directions.len(),
    })
}

/// reduce one origin's hit distances. every aggregation of zero hits is 0.
fn aggregate(hits: impl Iterator<Item = f32>, aggregation: ViewAggregation) -> f32 {
    let mut count = 0usize;
    let mut sum = 0.0f32;
    let mut inverse_sum = 0.0f32;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for distance in hits {
        count += 1;
        sum += distance;
        inverse_sum += 1.0 / distance;
        min = min.min(distance);
        max = max.max(distance);
    }
    if count == 0 {
        return 0.0;
    }
    match aggregation {
        ViewAggregation::Average => sum / count as f32,
        ViewAggregation::Sum => sum,
        ViewAggregation::Count => count as f32,
        ViewAggregation::InverseAverage => inverse_sum / count as f32,
        ViewAggregation::Max => max,
        ViewAggregation::Min => min,
    }
}
