use crate::model::geometry::Vec3;

/// deterministic near-uniform directions over the sphere via the
/// Fibonacci spiral: the i-th of n directions has polar angle
/// `acos(1 - 2(i + 0.5) / n)` and azimuth `pi * (1 + sqrt 5) * i`.
///
/// `up_fov` and `down_fov` (degrees above and below the horizon) discard
/// out-of-range directions, so the returned count is at most `n`.
pub fn fibonacci_directions(n: usize, up_fov: Option<f32>, down_fov: Option<f32>) -> Vec<Vec3> {
    let golden = std::f32::consts::PI * (1.0 + 5.0f32.sqrt());
    (0..n)
        .filter_map(|i| {
            let polar = (1.0 - 2.0 * (i as f32 + 0.5) / n as f32).acos();
            let azimuth = golden * i as f32;
            let altitude = 90.0 - polar.to_degrees();
            if up_fov.is_some_and(|fov| altitude > fov) {
                return None;
            }
            if down_fov.is_some_and(|fov| altitude < -fov) {
                return None;
            }
            Some(Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.sin() * azimuth.sin(),
                polar.cos(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_full_sphere_count_and_unit_length() {
        let directions = fibonacci_directions(500, None, None);
        assert_eq!(directions.len(), 500);
        for d in &directions {
            assert_abs_diff_eq!(d.length(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_near_uniform_coverage() {
        let directions = fibonacci_directions(2000, None, None);
        let mean: Vec3 = directions.iter().copied().sum();
        let mean = mean.scaled(1.0 / 2000.0);
        // a uniform distribution sums to nearly zero
        assert!(mean.length() < 0.01, "directional bias {}", mean);
        let upward = directions.iter().filter(|d| d.z > 0.0).count();
        assert!((900..=1100).contains(&upward));
    }

    #[test]
    fn test_fov_clamp() {
        let directions = fibonacci_directions(1000, Some(10.0), Some(30.0));
        assert!(!directions.is_empty());
        assert!(directions.len() < 1000);
        for d in &directions {
            let altitude = d.z.asin().to_degrees();
            assert!(altitude <= 10.0 + 0.5, "too far above horizon: {}", altitude);
            assert!(altitude >= -30.0 - 0.5, "too far below horizon: {}", altitude);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = fibonacci_directions(64, None, None);
        let b = fibonacci_directions(64, None, None);
        assert_eq!(a, b);
    }
}
