use super::CostError;
use crate::model::geometry::{Ray, Scene, Vec3};
use crate::model::graph::{Graph, NodeId};

/// layer name written by [`generate_cross_slope`]
pub const CROSS_SLOPE_LAYER: &str = "cross_slope";

/// derive a `"cross_slope"` cost layer: for each edge of the default
/// layer, sample the terrain on both sides of the edge midpoint,
/// perpendicular to the walking direction, and store the slope across the
/// path in degrees.
///
/// the lateral sampling offset is half the edge's horizontal length, and
/// sample rays drop from that same height above the midpoint. an edge
/// where either lateral drop misses the mesh (the path runs along an
/// opening) or whose direction has no horizontal component keeps a cross
/// slope of 0.
pub fn generate_cross_slope(graph: &mut Graph, scene: &Scene) -> Result<(), CostError> {
    graph.compress();
    let mut edges: Vec<(NodeId, NodeId, f32)> = Vec::with_capacity(graph.edge_count());
    for (parent, children) in graph.get_edges()? {
        let parent_position = graph.node_from_id(parent)?.position;
        for (child, _) in children {
            let child_position = graph.node_from_id(child)?.position;
            let slope =
                cross_slope_at(scene, &parent_position, &child_position).unwrap_or(0.0);
            edges.push((parent, child, slope));
        }
    }
    graph.attach_cost_layer(CROSS_SLOPE_LAYER, &edges)?;
    log::debug!("cross slope layer: {} edges", edges.len());
    Ok(())
}

/// terrain slope across the parent->child walking line at its midpoint,
/// in degrees. None when the edge has no horizontal direction or a
/// lateral sample finds no ground.
fn cross_slope_at(scene: &Scene, parent: &Vec3, child: &Vec3) -> Option<f32> {
    let offset = 0.5 * parent.horizontal_distance(child);
    if offset == 0.0 {
        return None;
    }
    let along = Vec3::new(child.x - parent.x, child.y - parent.y, 0.0).normalized();
    let lateral = Vec3::new(-along.y, along.x, 0.0);
    let midpoint = (*parent + *child).scaled(0.5);

    let left = sample_ground(scene, &midpoint, &lateral.scaled(offset))?;
    let right = sample_ground(scene, &midpoint, &lateral.scaled(-offset))?;
    Some((left.z - right.z).abs().atan2(2.0 * offset).to_degrees())
}

/// drop a ray from above `midpoint + shift` and return the ground point.
/// the drop origin sits |shift| above the midpoint and reaches the same
/// distance below it.
fn sample_ground(scene: &Scene, midpoint: &Vec3, shift: &Vec3) -> Option<Vec3> {
    let reach = shift.length();
    let origin = Vec3::new(
        midpoint.x + shift.x,
        midpoint.y + shift.y,
        midpoint.z + reach,
    );
    scene
        .intersect_within(&Ray::down(origin), 2.0 * reach)
        .map(|hit| hit.point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::Scene;
    use crate::testing;
    use approx::assert_abs_diff_eq;

    /// a ramp rising in +x at slope 0.5, with a graph edge running along
    /// y (across the fall line) and one running along x (down it)
    fn ramp_setup() -> (Graph, Scene) {
        let scene =
            Scene::from_mesh(testing::ramp_mesh(0.0, 10.0, 0.0, 5.0, -5.0, 5.0)).unwrap();
        let mut g = Graph::new();
        let z = |x: f32| x * 0.5;
        let a = Vec3::new(4.0, 0.0, z(4.0));
        let b = Vec3::new(4.0, 1.0, z(4.0));
        let c = Vec3::new(5.0, 0.0, z(5.0));
        g.add_edge(a, b, a.distance(&b)).unwrap();
        g.add_edge(a, c, a.distance(&c)).unwrap();
        g.compress();
        (g, scene)
    }

    #[test]
    fn test_across_fall_line_sees_ramp_slope() {
        let (mut g, scene) = ramp_setup();
        generate_cross_slope(&mut g, &scene).unwrap();
        let csr = g.layer(CROSS_SLOPE_LAYER).unwrap();
        // walking along y, the terrain falls across the path at the
        // ramp's own gradient: atan(0.5)
        let expected = 0.5f32.atan().to_degrees();
        assert_abs_diff_eq!(csr.get(0, 1).unwrap(), expected, epsilon = 0.5);
    }

    #[test]
    fn test_down_fall_line_is_level_across() {
        let (mut g, scene) = ramp_setup();
        generate_cross_slope(&mut g, &scene).unwrap();
        let csr = g.layer(CROSS_SLOPE_LAYER).unwrap();
        // walking straight down the gradient, left and right samples are
        // at equal height
        assert_abs_diff_eq!(csr.get(0, 2).unwrap(), 0.0, epsilon = 0.5);
    }

    #[test]
    fn test_edge_over_opening_defaults_to_zero() {
        // a small island plane: lateral samples for an edge along its rim
        // fall off the mesh
        let scene = Scene::from_mesh(testing::plane_mesh(0.0, 1.0, 0.0)).unwrap();
        let mut g = Graph::new();
        // the edge hugs the rim: the lateral sample at y > 1 leaves the mesh
        let a = Vec3::new(0.1, 0.95, 0.0);
        let b = Vec3::new(0.9, 0.95, 0.0);
        g.add_edge(a, b, a.distance(&b)).unwrap();
        g.compress();
        generate_cross_slope(&mut g, &scene).unwrap();
        let csr = g.layer(CROSS_SLOPE_LAYER).unwrap();
        assert_eq!(csr.get(0, 1), Some(0.0));
    }
}
