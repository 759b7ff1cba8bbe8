use std::fmt::Display;

use derive_more::{Add, Neg, Sub, Sum};
use serde::{Deserialize, Serialize};

/// a position or direction in 3-D space. walkshed uses a right-handed,
/// z-up coordinate system throughout; units are the caller's.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Add, Sub, Neg, Sum, Serialize, Deserialize,
)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// unit vector pointing straight down, the direction of every ground drop
    pub const DOWN: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: -1.0,
    };

    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    pub fn dot(&self, other: &Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Euclidean (L2) distance between two points
    pub fn distance(&self, other: &Vec3) -> f32 {
        (*self - *other).length()
    }

    /// distance between two points projected onto the xy plane
    pub fn horizontal_distance(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// the unit vector in this direction. a zero-length input returns the
    /// zero vector; callers that cannot tolerate it must check.
    pub fn normalized(&self) -> Vec3 {
        let len = self.length();
        if len == 0.0 {
            Vec3::ZERO
        } else {
            self.scaled(1.0 / len)
        }
    }

    pub fn scaled(&self, factor: f32) -> Vec3 {
        Vec3 {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// componentwise equality under an absolute tolerance
    pub fn approx_eq(&self, other: &Vec3, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::Vec3;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_distance() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_abs_diff_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_normalized_unit_length() {
        let v = Vec3::new(1.0, 2.0, -2.0).normalized();
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalized_zero_vector() {
        let v = Vec3::ZERO.normalized();
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn test_cross_follows_right_hand_rule() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3::UP);
    }

    #[test]
    fn test_approx_eq_within_tolerance() {
        let a = Vec3::new(1.0, 1.0, 1.0);
        let b = Vec3::new(1.00005, 0.99995, 1.0);
        assert!(a.approx_eq(&b, 1e-4));
        assert!(!a.approx_eq(&b, 1e-6));
    }
}
