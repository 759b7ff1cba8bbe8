use crate::model::graph::GraphError;

#[derive(thiserror::Error, Debug)]
pub enum CostError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("{0}")]
    InternalError(String),
}
