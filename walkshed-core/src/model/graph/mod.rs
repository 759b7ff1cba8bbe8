mod csr;
mod edge_aggregation;
mod graph;
mod graph_error;
mod node;
mod node_id;
mod point_key;

pub use csr::{CsrMatrix, CsrPointers};
pub use edge_aggregation::EdgeAggregation;
pub use graph::{Graph, DEFAULT_LAYER};
pub use graph_error::GraphError;
pub use node::{Node, NodeType};
pub use node_id::NodeId;
pub use point_key::PointKey;
