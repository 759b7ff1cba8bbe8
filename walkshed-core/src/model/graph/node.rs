use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::model::geometry::Vec3;

/// role tag for a graph position. generated walkable surface nodes are the
/// default; the other tags exist for caller-inserted positions.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Walkable,
    PointOfInterest,
    Other,
}

/// a position in the graph together with its assigned id
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Vec3,
    pub node_type: NodeType,
}

impl Node {
    pub fn new(id: NodeId, position: Vec3) -> Node {
        Node {
            id,
            position,
            node_type: NodeType::Walkable,
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node {} {}", self.id, self.position)
    }
}
