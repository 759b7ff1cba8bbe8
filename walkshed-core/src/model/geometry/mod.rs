mod aabb;
mod bvh;
mod geometry_error;
mod mesh;
mod ray;
mod scene;
mod triangle;
mod vec3;

pub use aabb::Aabb;
pub use bvh::Bvh;
pub use geometry_error::GeometryError;
pub use mesh::TriangleMesh;
pub use ray::{Ray, RayHit};
pub use scene::Scene;
pub use triangle::Triangle;
pub use vec3::Vec3;

/// absolute tolerance for treating two positions as the same point
pub const POINT_TOLERANCE: f32 = 1e-4;

/// distance rays are offset from a surface before casting, so a ray fired
/// from a hit point does not re-intersect the triangle it started on
pub const RAY_OFFSET: f32 = 1e-4;
