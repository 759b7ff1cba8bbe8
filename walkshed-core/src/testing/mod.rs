//! procedural mesh and graph fixtures shared between unit tests and the
//! integration scenarios. not part of the public analysis API.

use crate::model::geometry::{TriangleMesh, Vec3};

/// initialize test logging once; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// a square horizontal plane spanning `[min, max]` in x and y at height
/// `z`, two triangles
pub fn plane_mesh(min: f32, max: f32, z: f32) -> TriangleMesh {
    let a = Vec3::new(min, min, z);
    let b = Vec3::new(max, min, z);
    let c = Vec3::new(max, max, z);
    let d = Vec3::new(min, max, z);
    TriangleMesh::from_triangles(&[[a, b, c], [a, c, d]], 0).expect("plane fixture")
}

/// an inclined rectangular surface rising from `z0` at `x0` to `z1` at
/// `x1`, spanning `[y_min, y_max]` in y
pub fn ramp_mesh(x0: f32, x1: f32, z0: f32, z1: f32, y_min: f32, y_max: f32) -> TriangleMesh {
    let a = Vec3::new(x0, y_min, z0);
    let b = Vec3::new(x1, y_min, z1);
    let c = Vec3::new(x1, y_max, z1);
    let d = Vec3::new(x0, y_max, z0);
    TriangleMesh::from_triangles(&[[a, b, c], [a, c, d]], 0).expect("ramp fixture")
}

/// a straight staircase climbing in +x: `steps` treads of the given depth
/// and rise, with vertical risers between them. the first tread sits at
/// z = 0 starting at x = 0; y spans `[y_min, y_max]`.
pub fn staircase_mesh(steps: usize, depth: f32, rise: f32, y_min: f32, y_max: f32) -> TriangleMesh {
    let mut triangles = Vec::new();
    let mut quad = |a: Vec3, b: Vec3, c: Vec3, d: Vec3| {
        triangles.push([a, b, c]);
        triangles.push([a, c, d]);
    };
    for step in 0..steps {
        let x0 = step as f32 * depth;
        let x1 = x0 + depth;
        let z = step as f32 * rise;
        // tread
        quad(
            Vec3::new(x0, y_min, z),
            Vec3::new(x1, y_min, z),
            Vec3::new(x1, y_max, z),
            Vec3::new(x0, y_max, z),
        );
        // riser up to the next tread
        if step + 1 < steps {
            quad(
                Vec3::new(x1, y_min, z),
                Vec3::new(x1, y_max, z),
                Vec3::new(x1, y_max, z + rise),
                Vec3::new(x1, y_min, z + rise),
            );
        }
    }
    TriangleMesh::from_triangles(&triangles, 0).expect("staircase fixture")
}

/// an axis-aligned closed box between `min` and `max`, twelve triangles.
/// winding is arbitrary; the ray tracer treats triangles as double-sided,
/// so the box works as a hollow room viewed from inside.
pub fn box_mesh(min: Vec3, max: Vec3) -> TriangleMesh {
    let corners = [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, max.y, max.z),
    ];
    let faces: [[usize; 4]; 6] = [
        [0, 1, 2, 3], // floor
        [4, 5, 6, 7], // ceiling
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];
    let mut triangles = Vec::new();
    for [a, b, c, d] in faces {
        triangles.push([corners[a], corners[b], corners[c]]);
        triangles.push([corners[a], corners[c], corners[d]]);
    }
    TriangleMesh::from_triangles(&triangles, 0).expect("box fixture")
}

/// a closed UV sphere of the given radius centered at `center`
pub fn sphere_mesh(center: Vec3, radius: f32, rings: usize, segments: usize) -> TriangleMesh {
    let point = |ring: usize, segment: usize| {
        let theta = std::f32::consts::PI * ring as f32 / rings as f32;
        let phi = 2.0 * std::f32::consts::PI * segment as f32 / segments as f32;
        Vec3::new(
            center.x + radius * theta.sin() * phi.cos(),
            center.y + radius * theta.sin() * phi.sin(),
            center.z + radius * theta.cos(),
        )
    };
    let mut triangles = Vec::new();
    for ring in 0..rings {
        for segment in 0..segments {
            let next_segment = (segment + 1) % segments;
            let a = point(ring, segment);
            let b = point(ring + 1, segment);
            let c = point(ring + 1, next_segment);
            let d = point(ring, next_segment);
            if ring > 0 {
                triangles.push([a, b, c]);
            }
            if ring + 1 < rings {
                triangles.push([a, c, d]);
            }
        }
    }
    TriangleMesh::from_triangles(&triangles, 0).expect("sphere fixture")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::{Ray, Scene};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_staircase_heights() {
        let mesh = staircase_mesh(5, 1.0, 0.15, -1.0, 1.0);
        let scene = Scene::from_mesh(mesh).unwrap();
        for step in 0..5 {
            let x = step as f32 + 0.5;
            let hit = scene
                .intersect(&Ray::down(Vec3::new(x, 0.0, 10.0)))
                .expect("tread under probe");
            assert_abs_diff_eq!(hit.point.z, step as f32 * 0.15, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sphere_radius_from_center() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let mesh = sphere_mesh(center, 2.0, 32, 64);
        let scene = Scene::from_mesh(mesh).unwrap();
        for direction in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.577, 0.577, 0.577),
        ] {
            let hit = scene
                .intersect(&Ray::new(center, direction))
                .expect("closed sphere surrounds center");
            // chord hits land slightly inside the ideal radius
            assert!(hit.distance <= 2.0 + 1e-4 && hit.distance > 1.9);
        }
    }

    #[test]
    fn test_box_is_closed_from_inside() {
        let mesh = box_mesh(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let scene = Scene::from_mesh(mesh).unwrap();
        let center = Vec3::new(0.5, 0.5, 0.5);
        for direction in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::UP,
            Vec3::DOWN,
        ] {
            let hit = scene.intersect(&Ray::new(center, direction)).unwrap();
            assert_abs_diff_eq!(hit.distance, 0.5, epsilon = 1e-5);
        }
    }
}
