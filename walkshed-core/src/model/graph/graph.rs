use indexmap::IndexMap;
use itertools::Itertools;

use super::{CsrMatrix, CsrPointers, EdgeAggregation, GraphError, Node, NodeId, PointKey};
use crate::model::geometry::Vec3;

/// name of the default (geometric distance) cost layer in the public API
pub const DEFAULT_LAYER: &str = "";

/// a sparse directed graph keyed by 3-D positions, carrying one default
/// edge-cost layer (geometric distance) and any number of named alternate
/// layers over a subset of the same topology.
///
/// mutation goes through a pending triplet list; [`Graph::compress`] merges
/// it into compressed sparse-row storage. edge queries require a compressed
/// graph, so interleaved mutation and inspection pays the merge cost at
/// each boundary rather than per edge.
#[derive(Debug, Default)]
pub struct Graph {
    ordered_nodes: Vec<Node>,
    id_map: IndexMap<PointKey, NodeId>,
    default_csr: CsrMatrix,
    alt_csrs: IndexMap<String, CsrMatrix>,
    pending_triplets: Vec<(usize, usize, f32)>,
    needs_compression: bool,
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    /// build a compressed graph from parallel arrays: node positions, edge
    /// endpoint indices into `positions`, and edge weights.
    ///
    /// # Arguments
    ///
    /// * `positions` - one entry per node; positions equal under the point
    ///   tolerance collapse to one node
    /// * `edges` - (parent, child) indices into `positions`
    /// * `distances` - one weight per edge
    pub fn from_nodes_and_edges(
        positions: &[Vec3],
        edges: &[(usize, usize)],
        distances: &[f32],
    ) -> Result<Graph, GraphError> {
        if edges.len() != distances.len() {
            return Err(GraphError::ShapeMismatch(format!(
                "{} edges but {} distances",
                edges.len(),
                distances.len()
            )));
        }
        let mut graph = Graph::new();
        let ids: Vec<NodeId> = positions
            .iter()
            .map(|p| graph.get_or_assign_id(*p))
            .collect();
        for ((parent, child), distance) in edges.iter().zip(distances) {
            let (parent, child) = match (ids.get(*parent), ids.get(*child)) {
                (Some(p), Some(c)) => (*p, *c),
                _ => {
                    return Err(GraphError::ShapeMismatch(format!(
                        "edge ({}, {}) indexes outside {} positions",
                        parent,
                        child,
                        positions.len()
                    )))
                }
            };
            graph.add_edge_by_id(parent, child, *distance)?;
        }
        graph.compress();
        Ok(graph)
    }

    /// number of nodes with a stored record
    pub fn node_count(&self) -> usize {
        self.ordered_nodes.len()
    }

    /// number of edges in the default layer. pending edges are not counted
    /// until compression.
    pub fn edge_count(&self) -> usize {
        self.default_csr.nnz()
    }

    pub fn is_compressed(&self) -> bool {
        !self.needs_compression
    }

    pub fn nodes(&self) -> &[Node] {
        &self.ordered_nodes
    }

    /// the node record for `id`
    pub fn node_from_id(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.ordered_nodes
            .get(id.0)
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// the id assigned to `position`, if any, under the point tolerance
    pub fn id_from_point(&self, position: &Vec3) -> Option<NodeId> {
        self.id_map.get(&PointKey::new(position)).copied()
    }

    /// return the id for `position`, assigning the next dense id if the
    /// point (under the point tolerance) has not been seen before
    pub fn get_or_assign_id(&mut self, position: Vec3) -> NodeId {
        let key = PointKey::new(&position);
        if let Some(id) = self.id_map.get(&key) {
            return *id;
        }
        let id = NodeId(self.ordered_nodes.len());
        self.ordered_nodes.push(Node::new(id, position));
        self.id_map.insert(key, id);
        self.needs_compression = true;
        id
    }

    /// add a directed edge between two positions, assigning ids as needed
    pub fn add_edge(&mut self, parent: Vec3, child: Vec3, weight: f32) -> Result<(), GraphError> {
        if weight.is_nan() {
            return Err(GraphError::InvalidWeight(format!("({}, {})", parent, child)));
        }
        let parent_id = self.get_or_assign_id(parent);
        let child_id = self.get_or_assign_id(child);
        self.push_triplet(parent_id, child_id, weight);
        Ok(())
    }

    /// add a directed edge between ids. ids need not have node records;
    /// rows for the largest referenced id are materialized at compression.
    pub fn add_edge_by_id(
        &mut self,
        parent: NodeId,
        child: NodeId,
        weight: f32,
    ) -> Result<(), GraphError> {
        if weight.is_nan() {
            return Err(GraphError::InvalidWeight(format!("({}, {})", parent, child)));
        }
        self.push_triplet(parent, child, weight);
        Ok(())
    }

    fn push_triplet(&mut self, parent: NodeId, child: NodeId, weight: f32) {
        self.pending_triplets.push((parent.0, child.0, weight));
        self.needs_compression = true;
    }

    /// merge pending edges into CSR storage. a no-op on an already
    /// compressed graph, so calling twice yields identical storage.
    pub fn compress(&mut self) {
        if !self.needs_compression {
            return;
        }
        let max_pending_id = self
            .pending_triplets
            .iter()
            .map(|(p, c, _)| (*p).max(*c) + 1)
            .max()
            .unwrap_or(0);
        let dims = self
            .ordered_nodes
            .len()
            .max(self.default_csr.rows())
            .max(max_pending_id);

        // existing entries first, pending after, so a pending write to an
        // existing (parent, child) pair wins
        let mut triplets = self.default_csr.to_triplets();
        triplets.extend_from_slice(&self.pending_triplets);
        self.default_csr = CsrMatrix::from_triplets(dims, dims, &triplets);
        self.pending_triplets.clear();

        // alternate layers keep their entries but follow the default shape
        for (_, csr) in self.alt_csrs.iter_mut() {
            if csr.rows() != dims {
                *csr = CsrMatrix::from_triplets(dims, dims, &csr.to_triplets());
            }
        }

        self.needs_compression = false;
        log::debug!(
            "compressed graph: {} nodes, {} edges, {} alternate layers",
            self.ordered_nodes.len(),
            self.default_csr.nnz(),
            self.alt_csrs.len()
        );
    }

    /// reset to the empty state
    pub fn clear(&mut self) {
        self.ordered_nodes.clear();
        self.id_map.clear();
        self.default_csr = CsrMatrix::default();
        self.alt_csrs.clear();
        self.pending_triplets.clear();
        self.needs_compression = false;
    }

    fn require_compressed(&self, operation: &'static str) -> Result<(), GraphError> {
        if self.needs_compression {
            Err(GraphError::Uncompressed(operation))
        } else {
            Ok(())
        }
    }

    /// resolve a layer name to its CSR; the empty string is the default
    /// (distance) layer
    pub fn layer(&self, name: &str) -> Result<&CsrMatrix, GraphError> {
        if name == DEFAULT_LAYER {
            Ok(&self.default_csr)
        } else {
            self.alt_csrs
                .get(name)
                .ok_or_else(|| GraphError::LayerNotFound(name.to_string()))
        }
    }

    /// names of the attached alternate layers, in attachment order
    pub fn layer_names(&self) -> Vec<&str> {
        self.alt_csrs.keys().map(|k| k.as_str()).collect()
    }

    /// whether the default layer holds edge (parent, child), or either
    /// direction when `undirected`
    pub fn has_edge(
        &self,
        parent: NodeId,
        child: NodeId,
        undirected: bool,
    ) -> Result<bool, GraphError> {
        self.require_compressed("has_edge")?;
        let forward = self.default_csr.get(parent.0, child.0).is_some();
        if forward {
            return Ok(true);
        }
        if undirected {
            return Ok(self.default_csr.get(child.0, parent.0).is_some());
        }
        Ok(false)
    }

    /// point-keyed form of [`Graph::has_edge`]; unknown positions have no
    /// edges
    pub fn has_edge_between(
        &self,
        parent: &Vec3,
        child: &Vec3,
        undirected: bool,
    ) -> Result<bool, GraphError> {
        match (self.id_from_point(parent), self.id_from_point(child)) {
            (Some(p), Some(c)) => self.has_edge(p, c, undirected),
            _ => {
                self.require_compressed("has_edge")?;
                Ok(false)
            }
        }
    }

    /// outgoing edges of `node` in the chosen layer as (child, weight)
    pub fn edges_from(&self, node: NodeId, layer: &str) -> Result<Vec<(NodeId, f32)>, GraphError> {
        self.require_compressed("edges_from")?;
        let csr = self.layer(layer)?;
        Ok(csr.row(node.0).map(|(c, w)| (NodeId(c), w)).collect())
    }

    /// incoming ∪ outgoing edges of `node` in the default layer. for a
    /// neighbor connected in both directions the outgoing weight is
    /// reported.
    pub fn undirected_edges(&self, node: NodeId) -> Result<Vec<(NodeId, f32)>, GraphError> {
        self.require_compressed("undirected_edges")?;
        let mut edges: Vec<(NodeId, f32)> = self
            .default_csr
            .row(node.0)
            .map(|(c, w)| (NodeId(c), w))
            .collect();
        let outgoing: Vec<usize> = edges.iter().map(|(c, _)| c.0).collect();
        for row in 0..self.default_csr.rows() {
            if outgoing.contains(&row) {
                continue;
            }
            if let Some(weight) = self.default_csr.get(row, node.0) {
                edges.push((NodeId(row), weight));
            }
        }
        Ok(edges)
    }

    /// every node's outgoing edge list over the default layer
    pub fn get_edges(&self) -> Result<Vec<(NodeId, Vec<(NodeId, f32)>)>, GraphError> {
        self.require_compressed("get_edges")?;
        Ok((0..self.default_csr.rows())
            .map(|row| {
                let children = self
                    .default_csr
                    .row(row)
                    .map(|(c, w)| (NodeId(c), w))
                    .collect_vec();
                (NodeId(row), children)
            })
            .collect())
    }

    /// reduce each node's incident default-layer edge weights to a scalar.
    ///
    /// directed aggregation reads outgoing edges only. undirected
    /// aggregation considers each unordered neighbor pair once, preferring
    /// the outgoing weight when both directions exist. AVERAGE over a node
    /// with no incident edges is 0 by convention.
    pub fn aggregate_edge_costs(
        &self,
        aggregation: EdgeAggregation,
        directed: bool,
    ) -> Result<Vec<f32>, GraphError> {
        self.require_compressed("aggregate_edge_costs")?;
        let rows = self.default_csr.rows();
        let mut scores = Vec::with_capacity(rows);
        for row in 0..rows {
            let weights: Vec<f32> = if directed {
                self.default_csr.row(row).map(|(_, w)| w).collect()
            } else {
                self.undirected_edges(NodeId(row))?
                    .iter()
                    .map(|(_, w)| *w)
                    .collect()
            };
            let score = match aggregation {
                EdgeAggregation::Sum => weights.iter().sum(),
                EdgeAggregation::Count => weights.len() as f32,
                EdgeAggregation::Average => {
                    if weights.is_empty() {
                        0.0
                    } else {
                        weights.iter().sum::<f32>() / weights.len() as f32
                    }
                }
            };
            scores.push(score);
        }
        Ok(scores)
    }

    /// attach (or replace) a named cost layer from edge triplets. every
    /// (parent, child) pair must already exist in the default layer;
    /// alternate layers never introduce topology.
    pub fn attach_cost_layer(
        &mut self,
        name: &str,
        edges: &[(NodeId, NodeId, f32)],
    ) -> Result<(), GraphError> {
        self.require_compressed("attach_cost_layer")?;
        let mut triplets = Vec::with_capacity(edges.len());
        for (parent, child, weight) in edges {
            if weight.is_nan() {
                return Err(GraphError::InvalidWeight(format!("({}, {})", parent, child)));
            }
            if self.default_csr.get(parent.0, child.0).is_none() {
                return Err(GraphError::NoSuchEdge(name.to_string(), *parent, *child));
            }
            triplets.push((parent.0, child.0, *weight));
        }
        let csr = CsrMatrix::from_triplets(self.default_csr.rows(), self.default_csr.cols(), &triplets);
        self.alt_csrs.insert(name.to_string(), csr);
        Ok(())
    }

    /// write one edge into a named layer, creating the layer if absent.
    /// fails `NoSuchEdge` when the default layer lacks the pair.
    pub fn add_edge_to_layer(
        &mut self,
        name: &str,
        parent: NodeId,
        child: NodeId,
        weight: f32,
    ) -> Result<(), GraphError> {
        self.require_compressed("add_edge_to_layer")?;
        if weight.is_nan() {
            return Err(GraphError::InvalidWeight(format!("({}, {})", parent, child)));
        }
        if self.default_csr.get(parent.0, child.0).is_none() {
            return Err(GraphError::NoSuchEdge(name.to_string(), parent, child));
        }
        let dims = self.default_csr.rows();
        let mut triplets = match self.alt_csrs.get(name) {
            Some(csr) => csr.to_triplets(),
            None => Vec::new(),
        };
        triplets.push((parent.0, child.0, weight));
        self.alt_csrs
            .insert(name.to_string(), CsrMatrix::from_triplets(dims, dims, &triplets));
        Ok(())
    }

    /// raw CSR arrays for the chosen layer, compressing first if needed.
    /// the pointers stay valid until the graph is next mutated or dropped.
    pub fn csr_pointers(&mut self, layer: &str) -> Result<CsrPointers, GraphError> {
        self.compress();
        Ok(self.layer(layer)?.pointers())
    }
}
