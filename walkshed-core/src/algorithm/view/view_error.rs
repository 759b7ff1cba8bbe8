use crate::model::graph::GraphError;

#[derive(thiserror::Error, Debug)]
pub enum ViewAnalysisError {
    #[error("invalid view analysis configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
