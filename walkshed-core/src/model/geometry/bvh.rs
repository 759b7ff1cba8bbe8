use super::{Aabb, Ray, TriangleMesh, Vec3};

/// triangles per leaf before splitting stops
const LEAF_SIZE: usize = 4;

/// a flattened binary bounding-volume hierarchy over one mesh's triangles.
/// interior nodes store child indices into `nodes`; leaves store a range
/// into `triangle_order`, a permutation of the mesh's triangle indices.
#[derive(Debug)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    triangle_order: Vec<usize>,
}

#[derive(Debug)]
enum BvhNode {
    Interior {
        aabb: Aabb,
        left: usize,
        right: usize,
    },
    Leaf {
        aabb: Aabb,
        start: usize,
        count: usize,
    },
}

impl BvhNode {
    fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Interior { aabb, .. } => aabb,
            BvhNode::Leaf { aabb, .. } => aabb,
        }
    }
}

impl Bvh {
    /// build by recursive longest-axis median split over triangle centroids.
    pub fn build(mesh: &TriangleMesh) -> Bvh {
        let centroids: Vec<Vec3> = mesh.triangles().map(|t| t.centroid()).collect();
        let mut triangle_order: Vec<usize> = (0..mesh.triangle_count()).collect();
        let mut nodes = Vec::with_capacity(2 * mesh.triangle_count());

        let range = 0..triangle_order.len();
        build_recursive(mesh, &centroids, &mut triangle_order, range, &mut nodes);

        Bvh {
            nodes,
            triangle_order,
        }
    }

    /// closest hit along the ray within `max_distance`. returns the mesh
    /// triangle index and the ray parameter.
    pub fn closest_hit(
        &self,
        mesh: &TriangleMesh,
        ray: &Ray,
        max_distance: f32,
    ) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        let mut limit = max_distance;
        let mut stack = vec![0usize];

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];
            if !node.aabb().intersects(ray, limit) {
                continue;
            }
            match node {
                BvhNode::Interior { left, right, .. } => {
                    stack.push(*left);
                    stack.push(*right);
                }
                BvhNode::Leaf { start, count, .. } => {
                    for ordinal in *start..*start + *count {
                        let triangle_id = self.triangle_order[ordinal];
                        if let Some(t) = mesh.triangle(triangle_id).intersect(ray) {
                            if t <= limit {
                                limit = t;
                                best = Some((triangle_id, t));
                            }
                        }
                    }
                }
            }
        }
        best
    }

    /// any-hit within `max_distance`, terminating on the first intersection
    pub fn any_hit(&self, mesh: &TriangleMesh, ray: &Ray, max_distance: f32) -> bool {
        let mut stack = vec![0usize];
        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];
            if !node.aabb().intersects(ray, max_distance) {
                continue;
            }
            match node {
                BvhNode::Interior { left, right, .. } => {
                    stack.push(*left);
                    stack.push(*right);
                }
                BvhNode::Leaf { start, count, .. } => {
                    for ordinal in *start..*start + *count {
                        let triangle_id = self.triangle_order[ordinal];
                        if let Some(t) = mesh.triangle(triangle_id).intersect(ray) {
                            if t <= max_distance {
                                return true;
                            }
                        }
                    }
                }
            }
        }
        false
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// partition `order[range]` in place and append the subtree's nodes,
/// returning the index of the subtree root.
fn build_recursive(
    mesh: &TriangleMesh,
    centroids: &[Vec3],
    order: &mut [usize],
    range: std::ops::Range<usize>,
    nodes: &mut Vec<BvhNode>,
) -> usize {
    let mut aabb = Aabb::empty();
    for &triangle_id in &order[range.clone()] {
        aabb.grow_triangle(&mesh.triangle(triangle_id));
    }

    let count = range.len();
    if count <= LEAF_SIZE {
        nodes.push(BvhNode::Leaf {
            aabb,
            start: range.start,
            count,
        });
        return nodes.len() - 1;
    }

    // median split on the widest axis of the centroid bounds; centroid
    // bounds avoid degenerate splits when triangle sizes vary widely
    let mut centroid_bounds = Aabb::empty();
    for &triangle_id in &order[range.clone()] {
        centroid_bounds.grow(&centroids[triangle_id]);
    }
    let axis = centroid_bounds.longest_axis();

    let slice = &mut order[range.clone()];
    slice.sort_unstable_by(|a, b| {
        let ca = axis_component(&centroids[*a], axis);
        let cb = axis_component(&centroids[*b], axis);
        ca.total_cmp(&cb)
    });

    let mid = range.start + count / 2;
    // reserve this node's slot before recursing so children land after it
    nodes.push(BvhNode::Leaf {
        aabb,
        start: 0,
        count: 0,
    });
    let node_index = nodes.len() - 1;

    let left = build_recursive(mesh, centroids, order, range.start..mid, nodes);
    let right = build_recursive(mesh, centroids, order, mid..range.end, nodes);
    nodes[node_index] = BvhNode::Interior { aabb, left, right };
    node_index
}

fn axis_component(v: &Vec3, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// a 10x10 grid of quads in the z=0 plane, two triangles each
    fn grid_mesh() -> TriangleMesh {
        let mut triangles = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                let x = i as f32;
                let y = j as f32;
                let a = Vec3::new(x, y, 0.0);
                let b = Vec3::new(x + 1.0, y, 0.0);
                let c = Vec3::new(x + 1.0, y + 1.0, 0.0);
                let d = Vec3::new(x, y + 1.0, 0.0);
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }
        TriangleMesh::from_triangles(&triangles, 0).unwrap()
    }

    #[test]
    fn test_closest_hit_matches_brute_force() {
        let mesh = grid_mesh();
        let bvh = Bvh::build(&mesh);
        let ray = Ray::down(Vec3::new(4.3, 7.6, 3.0));

        let brute: f32 = mesh
            .triangles()
            .filter_map(|t| t.intersect(&ray))
            .fold(f32::INFINITY, f32::min);
        let (_, t) = bvh
            .closest_hit(&mesh, &ray, f32::INFINITY)
            .expect("downward ray over the grid should hit");
        assert_abs_diff_eq!(t, brute, epsilon = 1e-6);
        assert_abs_diff_eq!(t, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_miss_outside_grid() {
        let mesh = grid_mesh();
        let bvh = Bvh::build(&mesh);
        let ray = Ray::down(Vec3::new(50.0, 50.0, 3.0));
        assert!(bvh.closest_hit(&mesh, &ray, f32::INFINITY).is_none());
    }

    #[test]
    fn test_any_hit_respects_max_distance() {
        let mesh = grid_mesh();
        let bvh = Bvh::build(&mesh);
        let ray = Ray::down(Vec3::new(5.0, 5.0, 3.0));
        assert!(!bvh.any_hit(&mesh, &ray, 2.0));
        assert!(bvh.any_hit(&mesh, &ray, 3.5));
    }

    #[test]
    fn test_single_triangle_mesh() {
        let tri = [[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]];
        let mesh = TriangleMesh::from_triangles(&tri, 0).unwrap();
        let bvh = Bvh::build(&mesh);
        assert_eq!(bvh.node_count(), 1);
        let ray = Ray::down(Vec3::new(0.2, 0.2, 1.0));
        assert!(bvh.closest_hit(&mesh, &ray, f32::INFINITY).is_some());
    }
}
