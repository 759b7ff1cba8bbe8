use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use rayon::prelude::*;

use super::{Path, PathMember, SearchError};
use crate::model::graph::{CsrMatrix, Graph, GraphError, NodeId};
use crate::util::{priority_queue::InternalPriorityQueue, CancellationToken};

/// queue priority for the frontier. the priority queue pops its maximum,
/// so the ordering is reversed on both fields: the top of the queue is the
/// lowest tentative cost, ties going to the lower node id for
/// deterministic visit order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct SearchPriority {
    cost: OrderedFloat<f32>,
    node: NodeId,
}

impl Ord for SearchPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for SearchPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// predecessor tree of one single-source sweep: for each reached node,
/// the node it was reached from and the relaxed edge's weight
struct SearchTree {
    source: NodeId,
    predecessors: Vec<Option<(NodeId, f32)>>,
    reached: Vec<bool>,
}

impl SearchTree {
    /// walk predecessors from `target` back to the source and emit the
    /// path in forward order. None when the target was never reached.
    fn route_to(&self, target: NodeId) -> Option<Path> {
        if !self.reached[target.0] {
            return None;
        }
        let mut members = vec![];
        let mut current = target;
        while current != self.source {
            let (parent, weight) = self.predecessors[current.0]?;
            members.push(PathMember {
                node_id: current,
                cost_from_parent: weight,
            });
            current = parent;
        }
        members.push(PathMember {
            node_id: self.source,
            cost_from_parent: 0.0,
        });
        members.reverse();
        Some(Path::new(members))
    }
}

/// Dijkstra sweep from `source` over one CSR layer. stops early when
/// `target` is given and reached; otherwise settles every reachable node.
fn single_source(csr: &CsrMatrix, source: NodeId, target: Option<NodeId>) -> SearchTree {
    let n = csr.rows();
    let mut distances = vec![f32::INFINITY; n];
    let mut predecessors: Vec<Option<(NodeId, f32)>> = vec![None; n];
    let mut reached = vec![false; n];
    let mut frontier: InternalPriorityQueue<NodeId, SearchPriority> =
        InternalPriorityQueue::default();

    distances[source.0] = 0.0;
    frontier.push(
        source,
        SearchPriority {
            cost: OrderedFloat(0.0),
            node: source,
        },
    );

    let mut iterations = 0u64;
    while let Some((current, priority)) = frontier.pop() {
        iterations += 1;
        reached[current.0] = true;
        if target == Some(current) {
            break;
        }
        let current_cost = priority.cost.into_inner();
        for (child, weight) in csr.row(current.0) {
            if reached[child] {
                continue;
            }
            let tentative = current_cost + weight;
            if tentative < distances[child] {
                distances[child] = tentative;
                predecessors[child] = Some((current, weight));
                frontier.push_increase(
                    NodeId(child),
                    SearchPriority {
                        cost: OrderedFloat(tentative),
                        node: NodeId(child),
                    },
                );
            }
        }
    }
    log::debug!(
        "dijkstra from {}: {} iterations, {} nodes",
        source,
        iterations,
        n
    );

    SearchTree {
        source,
        predecessors,
        reached,
    }
}

/// resolve the layer and run the entry checks shared by every
/// pathfinding call: the graph must be compressed, the layer known, the
/// endpoint ids within the layer, and every weight non-negative.
fn checked_layer<'a>(
    graph: &'a Graph,
    layer: &str,
    endpoints: &[NodeId],
) -> Result<&'a CsrMatrix, SearchError> {
    if !graph.is_compressed() {
        return Err(GraphError::Uncompressed("pathfinding").into());
    }
    let csr = graph.layer(layer)?;
    for id in endpoints {
        if id.0 >= csr.rows() {
            return Err(GraphError::NodeNotFound(*id).into());
        }
    }
    if let Some(weight) = csr.data().iter().find(|w| **w < 0.0) {
        return Err(SearchError::NegativeWeight {
            layer: layer.to_string(),
            weight: *weight,
        });
    }
    Ok(csr)
}

/// shortest path between one pair of nodes over the chosen cost layer
/// (empty string selects the default distance layer).
///
/// a disconnected pair returns `Ok(None)`; it is an expected outcome, not
/// an error. `start == end` returns the single-member zero-cost path.
pub fn shortest_path(
    graph: &Graph,
    start: NodeId,
    end: NodeId,
    layer: &str,
) -> Result<Option<Path>, SearchError> {
    let csr = checked_layer(graph, layer, &[start, end])?;
    if start == end {
        return Ok(Some(Path::new(vec![PathMember {
            node_id: start,
            cost_from_parent: 0.0,
        }])));
    }
    let tree = single_source(csr, start, Some(end));
    Ok(tree.route_to(end))
}

/// shortest paths for index-paired start/end arrays, parallelized over
/// pairs. results are indexed by input order.
pub fn shortest_path_multi(
    graph: &Graph,
    starts: &[NodeId],
    ends: &[NodeId],
    layer: &str,
) -> Result<Vec<Option<Path>>, SearchError> {
    shortest_path_multi_cancellable(graph, starts, ends, layer, None)
}

/// [`shortest_path_multi`] with a cancellation signal polled between
/// pairs. on cancellation the partial results are discarded.
pub fn shortest_path_multi_cancellable(
    graph: &Graph,
    starts: &[NodeId],
    ends: &[NodeId],
    layer: &str,
    cancellation: Option<&CancellationToken>,
) -> Result<Vec<Option<Path>>, SearchError> {
    if starts.len() != ends.len() {
        return Err(SearchError::ShapeMismatch(format!(
            "{} starts but {} ends",
            starts.len(),
            ends.len()
        )));
    }
    let endpoints: Vec<NodeId> = starts.iter().chain(ends.iter()).copied().collect();
    checked_layer(graph, layer, &endpoints)?;

    let results: Vec<Option<Path>> = starts
        .par_iter()
        .zip(ends.par_iter())
        .map(|(start, end)| {
            if cancellation.is_some_and(|c| c.is_cancelled()) {
                return None;
            }
            // entry checks already ran; per-pair failure is unreachable
            shortest_path(graph, *start, *end, layer).unwrap_or(None)
        })
        .collect();

    if cancellation.is_some_and(|c| c.is_cancelled()) {
        return Err(SearchError::Cancelled);
    }
    Ok(results)
}

/// all-pairs shortest paths, row-major: entry `i * n + j` is the path
/// from i to j. the diagonal holds the empty path; unreachable pairs hold
/// None. parallelized over sources, one full sweep per source.
pub fn all_to_all(graph: &Graph, layer: &str) -> Result<Vec<Option<Path>>, SearchError> {
    let csr = checked_layer(graph, layer, &[])?;
    let n = csr.rows();

    let rows: Vec<Vec<Option<Path>>> = (0..n)
        .into_par_iter()
        .map(|source| {
            let tree = single_source(csr, NodeId(source), None);
            (0..n)
                .map(|target| {
                    if source == target {
                        Some(Path::empty())
                    } else {
                        tree.route_to(NodeId(target))
                    }
                })
                .collect()
        })
        .collect();

    Ok(rows.into_iter().flatten().collect())
}
