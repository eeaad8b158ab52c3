use nalgebra::{Quaternion, UnitQuaternion, Vector3};

const SLERP_EPSILON: f64 = 1.0e-9;

/// Normalize a scalar-first quaternion `[w, x, y, z]`.
///
/// Returns `None` for the zero quaternion, which has no orientation.
pub fn normalize(q: Quaternion<f64>) -> Option<UnitQuaternion<f64>> {
    UnitQuaternion::try_new(q, 0.0)
}

/// Build a unit quaternion from scalar-first components.
pub fn from_wxyz(w: f64, x: f64, y: f64, z: f64) -> Option<UnitQuaternion<f64>> {
    normalize(Quaternion::new(w, x, y, z))
}

/// Rotate `v` by `q`.
pub fn rotate(q: &UnitQuaternion<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    q.transform_vector(v)
}

/// Modified Rodrigues parameters to quaternion:
/// `q = [(1 - |m|²), 2m₀, 2m₁, 2m₂] / (1 + |m|²)`.
pub fn mrp_to_quaternion(mrp: &Vector3<f64>) -> UnitQuaternion<f64> {
    let mag_sq = mrp.norm_squared();
    let scale = 1.0 / (1.0 + mag_sq);
    let q = Quaternion::new(
        (1.0 - mag_sq) * scale,
        2.0 * mrp.x * scale,
        2.0 * mrp.y * scale,
        2.0 * mrp.z * scale,
    );
    // The formula is unit-norm by construction; this only strips rounding.
    UnitQuaternion::new_normalize(q)
}

/// Orientation at fraction `t` along the shortest arc from `q1` to `q2`.
pub fn slerp_at(q1: &UnitQuaternion<f64>, q2: &UnitQuaternion<f64>, t: f64) -> UnitQuaternion<f64> {
    let q2 = if q1.quaternion().dot(q2.quaternion()) < 0.0 {
        UnitQuaternion::new_unchecked(-(*q2).into_inner())
    } else {
        *q2
    };
    // try_slerp declines nearly coincident inputs; nlerp is exact enough there.
    q1.try_slerp(&q2, t, SLERP_EPSILON)
        .unwrap_or_else(|| shortest_nlerp(q1, &q2, t))
}

/// `steps + 1` orientations from `q1` to `q2` inclusive, at constant angular rate.
pub fn slerp(q1: &UnitQuaternion<f64>, q2: &UnitQuaternion<f64>, steps: usize) -> Vec<UnitQuaternion<f64>> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|k| slerp_at(q1, q2, k as f64 / steps as f64))
        .collect()
}

/// Yaw (rotation about Z) of the attitude, in degrees.
pub fn heading_deg(q: &UnitQuaternion<f64>) -> f64 {
    let (_roll, _pitch, yaw) = q.euler_angles();
    yaw.to_degrees()
}

fn shortest_nlerp(q1: &UnitQuaternion<f64>, q2: &UnitQuaternion<f64>, t: f64) -> UnitQuaternion<f64> {
    let a = *q1.quaternion();
    let mut b = *q2.quaternion();
    if a.dot(&b) < 0.0 {
        b = -b;
    }
    let blended = a * (1.0 - t) + b * t;
    normalize(blended).unwrap_or(*q1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn zero_quaternion_has_no_orientation() {
        assert!(normalize(Quaternion::new(0.0, 0.0, 0.0, 0.0)).is_none());
        let q = normalize(Quaternion::new(2.0, 0.0, 0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(q.w, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn quarter_turn_about_z() {
        let s = 0.5_f64.sqrt();
        let q = from_wxyz(s, 0.0, 0.0, s).unwrap();
        let v = rotate(&q, &Vector3::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(v, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(heading_deg(&q), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_mrp_is_identity() {
        let q = mrp_to_quaternion(&Vector3::zeros());
        assert_abs_diff_eq!(q.angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn mrp_matches_rotation_angle() {
        // |m| = tan(θ/4); θ = 90° about X.
        let m = Vector3::new((FRAC_PI_2 / 4.0).tan(), 0.0, 0.0);
        let q = mrp_to_quaternion(&m);
        assert_abs_diff_eq!(q.angle(), FRAC_PI_2, epsilon = 1e-12);
        let v = rotate(&q, &Vector3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(v, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn slerp_is_inclusive_and_uniform() {
        let q1 = UnitQuaternion::identity();
        let q2 = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let path = slerp(&q1, &q2, 4);
        assert_eq!(path.len(), 5);
        assert_abs_diff_eq!(path[0].angle_to(&q1), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(path[4].angle_to(&q2), 0.0, epsilon = 1e-12);
        for pair in path.windows(2) {
            assert_abs_diff_eq!(pair[0].angle_to(&pair[1]), FRAC_PI_2 / 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let q1 = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.2);
        let q2 = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.4);
        let flipped = UnitQuaternion::new_unchecked(-q2.into_inner());
        let mid = slerp_at(&q1, &flipped, 0.5);
        assert_abs_diff_eq!(mid.angle_to(&q1), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn slerp_of_identical_orientations() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.0);
        for p in slerp(&q, &q, 3) {
            assert_abs_diff_eq!(p.angle_to(&q), 0.0, epsilon = 1e-12);
        }
    }
}
