use crate::model::graph::GraphError;

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("cost layer '{layer}' contains negative weight {weight}")]
    NegativeWeight { layer: String, weight: f32 },
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("search cancelled")]
    Cancelled,
}
