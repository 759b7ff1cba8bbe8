use super::{Ray, Triangle, Vec3};

/// axis-aligned bounding box. the empty box has +inf min and -inf max so
/// that growing it by any point produces that point's box.
#[derive(Copy, Clone, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn empty() -> Aabb {
        Aabb {
            min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn grow(&mut self, point: &Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn grow_triangle(&mut self, triangle: &Triangle) {
        self.grow(&triangle.v0);
        self.grow(&triangle.v1);
        self.grow(&triangle.v2);
    }

    /// index of the widest axis (0=x, 1=y, 2=z)
    pub fn longest_axis(&self) -> usize {
        let extent = self.max - self.min;
        if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        }
    }

    /// slab test. returns true when the ray enters the box within
    /// `[0, max_distance]`. a zero direction component is handled outside
    /// the slab arithmetic so boundary-plane origins never produce NaN.
    pub fn intersects(&self, ray: &Ray, max_distance: f32) -> bool {
        let mut t_near = 0.0f32;
        let mut t_far = max_distance;

        for axis in 0..3 {
            let (origin, dir, min, max) = match axis {
                0 => (ray.origin.x, ray.direction.x, self.min.x, self.max.x),
                1 => (ray.origin.y, ray.direction.y, self.min.y, self.max.y),
                _ => (ray.origin.z, ray.direction.z, self.min.z, self.max.z),
            };
            if dir == 0.0 {
                if origin < min || origin > max {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let t0 = (min - origin) * inv;
            let t1 = (max - origin) * inv;
            let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            if t0 > t_near {
                t_near = t0;
            }
            if t1 < t_far {
                t_far = t1;
            }
            if t_near > t_far {
                return false;
            }
        }
        true
    }
}
