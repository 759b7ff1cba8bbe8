use crate::model::geometry::{Vec3, POINT_TOLERANCE};

/// hashable identity of a position: each component quantized to the point
/// tolerance, so positions equal under the tolerance land in the same
/// bucket. all point-keyed access to a graph goes through this key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PointKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PointKey {
    pub fn new(position: &Vec3) -> PointKey {
        PointKey {
            x: quantize(position.x, POINT_TOLERANCE),
            y: quantize(position.y, POINT_TOLERANCE),
            z: quantize(position.z, POINT_TOLERANCE),
        }
    }

    /// key over the xy plane only, at a caller-chosen resolution. the graph
    /// generator deduplicates candidate columns with this at half the grid
    /// spacing.
    pub fn planar(position: &Vec3, resolution_x: f32, resolution_y: f32) -> PointKey {
        PointKey {
            x: quantize(position.x, resolution_x),
            y: quantize(position.y, resolution_y),
            z: 0,
        }
    }
}

fn quantize(value: f32, resolution: f32) -> i64 {
    (value / resolution).round() as i64
}

#[cfg(test)]
mod tests {
    use super::PointKey;
    use crate::model::geometry::Vec3;

    #[test]
    fn test_points_within_tolerance_share_key() {
        let a = PointKey::new(&Vec3::new(1.0, 2.0, 3.0));
        let b = PointKey::new(&Vec3::new(1.00004, 1.99996, 3.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_points_differ() {
        let a = PointKey::new(&Vec3::new(1.0, 2.0, 3.0));
        let b = PointKey::new(&Vec3::new(1.001, 2.0, 3.0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_planar_key_ignores_z() {
        let a = PointKey::planar(&Vec3::new(1.0, 2.0, 3.0), 0.5, 0.5);
        let b = PointKey::planar(&Vec3::new(1.1, 2.1, -7.0), 0.5, 0.5);
        assert_eq!(a, b);
    }
}
