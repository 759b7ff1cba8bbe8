mod direction;
mod view_aggregation;
mod view_analysis;
mod view_error;

pub use direction::fibonacci_directions;
pub use view_aggregation::ViewAggregation;
pub use view_analysis::{
    sphere_view_analysis, sphere_view_analysis_nodes, sphere_view_analysis_per_ray, ScoreArray,
    ViewAnalysisConfig, ViewRayGrid, ViewRayResult,
};
pub use view_error::ViewAnalysisError;
