use std::collections::HashMap;

use rayon::prelude::*;

use super::{GeneratorConfig, GeneratorError};
use crate::model::geometry::{Ray, Scene, Vec3, RAY_OFFSET};
use crate::model::graph::{Graph, NodeId, PointKey};
use crate::util::CancellationToken;

/// compass offsets explored around each node, in canonical order. the
/// order fixes id assignment, so it is part of the determinism contract.
const NEIGHBOR_DIRECTIONS: [(f32, f32); 8] = [
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
];

/// a walkable connection discovered by a worker, staged until the serial
/// drain assigns ids
#[derive(Copy, Clone, Debug)]
struct CandidateEdge {
    parent: NodeId,
    position: Vec3,
}

/// discover the positions a walking agent can reach on `scene` and
/// connect them into a graph whose default layer carries Euclidean
/// distance.
///
/// expansion runs in breadth-first waves. each wave's frontier nodes are
/// probed in parallel with per-node ray batches; accepted candidates are
/// drained serially in canonical order, so id assignment is deterministic
/// for a fixed configuration regardless of worker count.
///
/// # Arguments
///
/// * `scene` - the ray-traceable environment, read-only and shared
/// * `config` - geometric feasibility rules and bounds
/// * `cancellation` - optional signal polled between waves
pub fn generate_graph(
    scene: &Scene,
    config: &GeneratorConfig,
    cancellation: Option<&CancellationToken>,
) -> Result<Graph, GeneratorError> {
    if config.spacing.x <= 0.0 || config.spacing.y <= 0.0 {
        return Err(GeneratorError::InvalidConfig(format!(
            "spacing must be positive in x and y, got {}",
            config.spacing
        )));
    }
    if config.max_step_connections == 0 {
        return Err(GeneratorError::InvalidConfig(String::from(
            "max_step_connections must be at least 1",
        )));
    }

    let run = || expand(scene, config, cancellation);
    if config.core_count > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.core_count as usize)
            .build()
            .map_err(|e| GeneratorError::InternalError(e.to_string()))?;
        pool.install(run)
    } else {
        run()
    }
}

fn expand(
    scene: &Scene,
    config: &GeneratorConfig,
    cancellation: Option<&CancellationToken>,
) -> Result<Graph, GeneratorError> {
    // project the seed onto the mesh
    let seed = scene
        .intersect(&Ray::down(config.start))
        .ok_or(GeneratorError::NoGround(config.start))?
        .point;

    let mut graph = Graph::new();
    let seed_id = graph.get_or_assign_id(seed);

    // candidate columns are deduplicated on the xy plane at half the grid
    // spacing, mapping each cell to the node that claimed it
    let cell_x = 0.5 * config.spacing.x;
    let cell_y = 0.5 * config.spacing.y;
    let mut visited: HashMap<PointKey, NodeId> = HashMap::new();
    visited.insert(PointKey::planar(&seed, cell_x, cell_y), seed_id);

    let mut frontier: Vec<NodeId> = vec![seed_id];
    let mut wave = 0usize;

    while !frontier.is_empty() {
        if cancellation.is_some_and(|c| c.is_cancelled()) {
            return Err(GeneratorError::Cancelled);
        }

        let parents: Vec<(NodeId, Vec3)> = frontier
            .iter()
            .map(|id| (*id, graph.node_from_id(*id).map(|n| n.position)))
            .map(|(id, p)| p.map(|p| (id, p)))
            .collect::<Result<_, _>>()?;

        // probe every frontier node's neighborhood in parallel; collect
        // preserves input order, which the serial drain depends on
        let batches: Vec<Vec<CandidateEdge>> = parents
            .par_iter()
            .map(|(id, position)| probe_neighbors(scene, config, *id, *position))
            .collect();

        let mut next_frontier: Vec<NodeId> = Vec::new();
        for candidate in batches.into_iter().flatten() {
            let key = PointKey::planar(&candidate.position, cell_x, cell_y);
            let (child_id, child_position) = match visited.get(&key) {
                Some(existing) => (*existing, graph.node_from_id(*existing)?.position),
                None => {
                    if config.max_nodes != 0 && graph.node_count() >= config.max_nodes {
                        continue;
                    }
                    let id = graph.get_or_assign_id(candidate.position);
                    visited.insert(key, id);
                    next_frontier.push(id);
                    (id, candidate.position)
                }
            };
            if child_id == candidate.parent {
                continue;
            }
            let parent_position = graph.node_from_id(candidate.parent)?.position;
            let weight = parent_position.distance(&child_position);
            graph.add_edge_by_id(candidate.parent, child_id, weight)?;
            graph.add_edge_by_id(child_id, candidate.parent, weight)?;
        }

        wave += 1;
        log::debug!(
            "generation wave {}: {} parents, {} new nodes, {} total",
            wave,
            frontier.len(),
            next_frontier.len(),
            graph.node_count()
        );
        frontier = next_frontier;

        if config.max_nodes != 0 && graph.node_count() >= config.max_nodes {
            break;
        }
    }

    graph.compress();
    prune_underconnected(graph, config)
}

/// probe the 8-neighborhood of one node. pure read-only ray work, safe to
/// run from any worker.
fn probe_neighbors(
    scene: &Scene,
    config: &GeneratorConfig,
    parent: NodeId,
    position: Vec3,
) -> Vec<CandidateEdge> {
    let mut accepted = Vec::new();
    for (dx, dy) in NEIGHBOR_DIRECTIONS {
        let column = Vec3::new(
            position.x + dx * config.spacing.x,
            position.y + dy * config.spacing.y,
            position.z,
        );
        if let Some(candidate) = probe_column(scene, config, &position, &column) {
            accepted.push(CandidateEdge {
                parent,
                position: candidate,
            });
        }
    }
    accepted
}

/// drop onto one candidate column and test geometric feasibility: ground
/// contact within the step range, slope within bounds, and a clear
/// step-height line from the parent. occluded connections retry from
/// progressively higher origins, which lets nodes climb onto obstacles.
fn probe_column(
    scene: &Scene,
    config: &GeneratorConfig,
    parent: &Vec3,
    column: &Vec3,
) -> Option<Vec3> {
    for attempt in 0..config.max_step_connections {
        let lift = config.up_step + attempt as f32 * config.spacing.z;
        let origin = Vec3::new(column.x, column.y, parent.z + lift);
        let range = lift + config.down_step;

        let ground = scene.intersect_within(&Ray::down(origin), range)?.point;

        let dz = ground.z - parent.z;
        if dz > config.up_step || -dz > config.down_step {
            // a higher origin only finds the same or higher ground
            return None;
        }

        let horizontal = parent.horizontal_distance(&ground);
        let slope = dz.abs().atan2(horizontal).to_degrees();
        if (dz > 0.0 && slope > config.up_slope) || (dz < 0.0 && slope > config.down_slope) {
            return None;
        }

        // step-clearance line: the segment from parent to candidate,
        // raised by the lift. clear means the agent can cross.
        let clearance_origin = Vec3::new(parent.x, parent.y, parent.z + lift);
        let clearance_target = Vec3::new(ground.x, ground.y, ground.z + lift);
        let toward = clearance_target - clearance_origin;
        let span = toward.length();
        if span == 0.0 {
            return None;
        }
        if !scene.occluded(&Ray::new(clearance_origin, toward), span - RAY_OFFSET) {
            return Some(ground);
        }
        // occluded: retry higher
    }
    None
}

/// drop nodes with fewer connections than the configured minimum, along
/// with their edges, and rebuild the graph densely.
fn prune_underconnected(
    graph: Graph,
    config: &GeneratorConfig,
) -> Result<Graph, GeneratorError> {
    if graph.node_count() == 0 {
        return Err(GeneratorError::EmptyGraph);
    }
    if config.min_connections == 0 {
        return Ok(graph);
    }

    let degrees = graph
        .aggregate_edge_costs(crate::model::graph::EdgeAggregation::Count, true)
        .map_err(GeneratorError::Graph)?;
    let survivors: Vec<NodeId> = graph
        .nodes()
        .iter()
        .filter(|n| degrees[n.id.0] >= config.min_connections as f32)
        .map(|n| n.id)
        .collect();

    if survivors.len() == graph.node_count() {
        return Ok(graph);
    }
    log::debug!(
        "pruning {} of {} nodes below {} connections",
        graph.node_count() - survivors.len(),
        graph.node_count(),
        config.min_connections
    );
    if survivors.is_empty() {
        return Err(GeneratorError::EmptyGraph);
    }

    let mut rebuilt = Graph::new();
    let mut remap: HashMap<usize, NodeId> = HashMap::new();
    for id in &survivors {
        let position = graph.node_from_id(*id)?.position;
        remap.insert(id.0, rebuilt.get_or_assign_id(position));
    }
    for id in &survivors {
        for (child, weight) in graph.edges_from(*id, "")? {
            if let Some(new_child) = remap.get(&child.0) {
                rebuilt.add_edge_by_id(remap[&id.0], *new_child, weight)?;
            }
        }
    }
    rebuilt.compress();
    Ok(rebuilt)
}
