use rayon::prelude::*;

use super::{Bvh, GeometryError, Ray, RayHit, TriangleMesh};

/// a set of meshes with their acceleration structures, immutable once
/// built. queries borrow the scene read-only, so a scene can serve many
/// worker threads at once.
#[derive(Debug)]
pub struct Scene {
    meshes: Vec<SceneMesh>,
}

#[derive(Debug)]
struct SceneMesh {
    mesh: TriangleMesh,
    bvh: Bvh,
}

impl Scene {
    /// build acceleration structures for every mesh. fails on an empty
    /// mesh list; individual meshes were validated at construction.
    pub fn new(meshes: Vec<TriangleMesh>) -> Result<Scene, GeometryError> {
        if meshes.is_empty() {
            return Err(GeometryError::InvalidMesh(String::from(
                "scene requires at least one mesh",
            )));
        }
        let meshes = meshes
            .into_iter()
            .map(|mesh| {
                let bvh = Bvh::build(&mesh);
                SceneMesh { mesh, bvh }
            })
            .collect::<Vec<_>>();
        log::debug!(
            "built scene with {} meshes, {} triangles",
            meshes.len(),
            meshes.iter().map(|m| m.mesh.triangle_count()).sum::<usize>()
        );
        Ok(Scene { meshes })
    }

    /// convenience constructor for the common single-mesh case
    pub fn from_mesh(mesh: TriangleMesh) -> Result<Scene, GeometryError> {
        Scene::new(vec![mesh])
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// closest hit across all meshes along `ray`, or None on a miss
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        self.intersect_within(ray, f32::INFINITY)
    }

    /// closest hit with a distance bound
    pub fn intersect_within(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        let mut limit = max_distance;
        for entry in &self.meshes {
            if let Some((triangle_id, t)) = entry.bvh.closest_hit(&entry.mesh, ray, limit) {
                limit = t;
                let triangle = entry.mesh.triangle(triangle_id);
                let mut normal = triangle.normal().normalized();
                // orient toward the ray origin so callers can offset
                // follow-up rays off the surface they hit
                if normal.dot(&ray.direction) > 0.0 {
                    normal = -normal;
                }
                best = Some(RayHit {
                    distance: t,
                    triangle_id,
                    mesh_id: entry.mesh.mesh_id(),
                    point: ray.point_at(t),
                    normal,
                });
            }
        }
        best
    }

    /// any-hit occlusion test within `[0, max_distance]`
    pub fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.meshes
            .iter()
            .any(|entry| entry.bvh.any_hit(&entry.mesh, ray, max_distance))
    }

    /// batched closest-hit queries, parallelized over rays. results are
    /// indexed by input order regardless of completion order.
    pub fn fire_bundle(&self, rays: &[Ray], max_distance: Option<f32>) -> Vec<Option<RayHit>> {
        let limit = max_distance.unwrap_or(f32::INFINITY);
        rays.par_iter()
            .map(|ray| self.intersect_within(ray, limit))
            .collect()
    }
}
