use super::{Ray, Vec3};

/// minimum ray parameter accepted as a hit. rejects intersections at the
/// ray origin itself without masking legitimate nearby geometry.
const T_MIN: f32 = 1e-6;

#[derive(Copy, Clone, Debug)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Triangle {
        Triangle { v0, v1, v2 }
    }

    /// unnormalized geometric normal (counterclockwise winding)
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2).scaled(1.0 / 3.0)
    }

    /// Moeller-Trumbore ray/triangle intersection, double-sided. returns the
    /// ray parameter of the hit, or None on a miss or a degenerate triangle.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let pvec = ray.direction.cross(&edge2);
        let det = edge1.dot(&pvec);

        // parallel or degenerate
        if det.abs() < 1e-12 {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.v0;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&edge1);
        let v = ray.direction.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&qvec) * inv_det;
        if t > T_MIN {
            Some(t)
        } else {
            None
        }
    }
}
