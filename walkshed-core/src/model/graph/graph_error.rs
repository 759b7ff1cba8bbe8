use super::NodeId;

#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("edge weight must be a number, got NaN for edge {0}")]
    InvalidWeight(String),
    #[error("graph must be compressed before {0}")]
    Uncompressed(&'static str),
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
    #[error("cost layer '{0}' not found in graph")]
    LayerNotFound(String),
    #[error("edge ({1}, {2}) does not exist in the default layer, cannot add to layer '{0}'")]
    NoSuchEdge(String, NodeId, NodeId),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}
