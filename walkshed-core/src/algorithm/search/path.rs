use crate::model::graph::NodeId;

/// one hop of a path: the node reached and what the edge into it cost.
/// the first member of a path has cost 0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathMember {
    pub node_id: NodeId,
    pub cost_from_parent: f32,
}

/// an ordered walk through the graph, produced by the pathfinder
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    members: Vec<PathMember>,
}

impl Path {
    pub fn new(members: Vec<PathMember>) -> Path {
        Path { members }
    }

    /// the zero-length path, used for the all-pairs diagonal
    pub fn empty() -> Path {
        Path::default()
    }

    pub fn members(&self) -> &[PathMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().map(|m| m.node_id)
    }

    /// sum of per-hop costs along the path
    pub fn total_cost(&self) -> f32 {
        self.members.iter().map(|m| m.cost_from_parent).sum()
    }
}
