use crate::model::geometry::Vec3;
use crate::model::graph::GraphError;

#[derive(thiserror::Error, Debug)]
pub enum GeneratorError {
    #[error("no ground found below start point {0}")]
    NoGround(Vec3),
    #[error("generation produced an empty graph")]
    EmptyGraph,
    #[error("invalid generator configuration: {0}")]
    InvalidConfig(String),
    #[error("generation cancelled")]
    Cancelled,
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("{0}")]
    InternalError(String),
}
