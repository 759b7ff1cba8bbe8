use super::Vec3;

/// a half-line query against the scene. `direction` must be unit length;
/// constructors normalize.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray {
            origin,
            direction: direction.normalized(),
        }
    }

    /// a ray dropped straight down from `origin`, the generator's ground probe
    pub fn down(origin: Vec3) -> Ray {
        Ray {
            origin,
            direction: Vec3::DOWN,
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction.scaled(distance)
    }
}

/// the closest intersection found for a ray
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    /// distance from the ray origin to the intersection point
    pub distance: f32,
    /// index of the triangle within its mesh
    pub triangle_id: usize,
    /// id of the mesh the triangle belongs to
    pub mesh_id: u32,
    /// the intersection point
    pub point: Vec3,
    /// unit geometric normal of the intersected triangle, oriented to face
    /// the ray origin
    pub normal: Vec3,
}
