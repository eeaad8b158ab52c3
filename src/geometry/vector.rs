use nalgebra::Vector3;

/// Angle reported when either input has no direction.
///
/// 180° is the widest possible separation, so a missing direction never
/// trips an exclusion cone.
pub const DEGENERATE_ANGLE_DEG: f64 = 180.0;

/// Angle between two vectors in degrees.
///
/// Returns [`DEGENERATE_ANGLE_DEG`] when either vector has zero magnitude.
pub fn angle_deg(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let (n1, n2) = (v1.norm(), v2.norm());
    if n1 == 0.0 || n2 == 0.0 || !n1.is_finite() || !n2.is_finite() {
        return DEGENERATE_ANGLE_DEG;
    }
    let cos = (v1.dot(v2) / (n1 * n2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Unit vector along `v`, or `None` for the zero vector.
pub fn unit(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    v.try_normalize(0.0)
}

/// Linear interpolation between two vectors, `t` in `[0, 1]`.
pub fn lerp(v1: &Vector3<f64>, v2: &Vector3<f64>, t: f64) -> Vector3<f64> {
    v1 + (v2 - v1) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identical_and_opposite() {
        let v = Vector3::new(0.3, -0.4, 0.5).normalize();
        assert_abs_diff_eq!(angle_deg(&v, &v), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(angle_deg(&v, &-v), 180.0, epsilon = 1e-6);
    }

    #[test]
    fn symmetric() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-2.0, 0.5, 7.0);
        assert_eq!(angle_deg(&a, &b), angle_deg(&b, &a));
    }

    #[test]
    fn scale_invariant() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        let b = Vector3::new(0.0, 7000.0, 0.0);
        assert_abs_diff_eq!(angle_deg(&a, &b), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_vector_is_degenerate() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(angle_deg(&a, &Vector3::zeros()), DEGENERATE_ANGLE_DEG);
        assert_eq!(angle_deg(&Vector3::zeros(), &a), DEGENERATE_ANGLE_DEG);
    }

    #[test]
    fn nearly_parallel_does_not_produce_nan() {
        let a = Vector3::new(1.0, 1e-9, 0.0);
        let b = Vector3::new(1.0, 1.0000001e-9, 0.0);
        assert!(angle_deg(&a, &b).is_finite());
    }

    #[test]
    fn lerp_endpoints() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(2.0, 4.0, -6.0);
        assert_eq!(lerp(&a, &b, 0.0), a);
        assert_eq!(lerp(&a, &b, 1.0), b);
        assert_eq!(lerp(&a, &b, 0.5), Vector3::new(1.0, 2.0, -3.0));
    }
}
