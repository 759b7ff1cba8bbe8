use super::CostError;
use crate::model::graph::{Graph, NodeId};

/// layer name written by [`generate_energy_expenditure`]
pub const ENERGY_LAYER: &str = "energy";

/// metabolic cost of walking on a gradient, J/(kg·m), from the published
/// pedestrian energy curve of Minetti et al. (2002). `slope` is rise over
/// run.
fn energy_rate(slope: f32) -> f32 {
    280.5 * slope.powi(5) - 58.7 * slope.powi(4) - 76.8 * slope.powi(3)
        + 51.9 * slope.powi(2)
        + 19.6 * slope
        + 2.5
}

/// derive an `"energy"` cost layer from the default distance layer: each
/// edge costs the gradient energy rate between its endpoints times its
/// length. edges with zero horizontal run have no defined gradient and
/// are omitted from the layer.
pub fn generate_energy_expenditure(graph: &mut Graph) -> Result<(), CostError> {
    graph.compress();
    let mut edges: Vec<(NodeId, NodeId, f32)> = Vec::with_capacity(graph.edge_count());
    let mut omitted = 0usize;
    for (parent, children) in graph.get_edges()? {
        let parent_position = graph.node_from_id(parent)?.position;
        for (child, _) in children {
            let child_position = graph.node_from_id(child)?.position;
            let run = parent_position.horizontal_distance(&child_position);
            if run == 0.0 {
                omitted += 1;
                continue;
            }
            let rise = child_position.z - parent_position.z;
            let length = parent_position.distance(&child_position);
            edges.push((parent, child, energy_rate(rise / run) * length));
        }
    }
    log::debug!(
        "energy layer: {} edges, {} omitted for zero horizontal run",
        edges.len(),
        omitted
    );
    graph.attach_cost_layer(ENERGY_LAYER, &edges)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::Vec3;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_level_walking_rate() {
        // the canonical level-walking constant of the curve
        assert_abs_diff_eq!(energy_rate(0.0), 2.5);
    }

    #[test]
    fn test_rate_rises_with_gradient() {
        assert!(energy_rate(0.2) > energy_rate(0.1));
        assert!(energy_rate(0.1) > energy_rate(0.0));
        // gentle descents are cheaper than level walking
        assert!(energy_rate(-0.1) < energy_rate(0.0));
        // but every gradient in the walkable range still costs energy
        for step in -10..=10 {
            assert!(energy_rate(step as f32 * 0.05) > 0.0);
        }
    }

    #[test]
    fn test_layer_weights() {
        let mut g = Graph::new();
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.3);
        let length = a.distance(&b);
        g.add_edge(a, b, length).unwrap();
        g.add_edge(b, a, length).unwrap();
        g.compress();
        generate_energy_expenditure(&mut g).unwrap();

        let csr = g.layer(ENERGY_LAYER).unwrap();
        // 0.3 up over 1 along: gradient 0.3 uphill, -0.3 back down
        assert_abs_diff_eq!(
            csr.get(0, 1).unwrap(),
            energy_rate(0.3) * length,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            csr.get(1, 0).unwrap(),
            energy_rate(-0.3) * length,
            epsilon = 1e-3
        );
        assert!(csr.get(0, 1).unwrap() > csr.get(1, 0).unwrap());
    }

    #[test]
    fn test_vertical_edge_omitted() {
        let mut g = Graph::new();
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(1.0, 0.0, 2.0); // directly above b
        g.add_edge(a, b, 1.0).unwrap();
        g.add_edge(b, c, 2.0).unwrap();
        g.compress();
        generate_energy_expenditure(&mut g).unwrap();

        let csr = g.layer(ENERGY_LAYER).unwrap();
        assert!(csr.get(0, 1).is_some());
        assert!(csr.get(1, 2).is_none());
    }
}
