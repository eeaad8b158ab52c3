use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geodetic::ellipsoid::{ecef_to_geodetic, EQUATORIAL_RADIUS_M, POLAR_RADIUS_M};
use crate::geodetic::error::GeodeticError;

pub const DEFAULT_MARCH_TOLERANCE_M: f64 = 1.0;
pub const DEFAULT_MARCH_MAX_DISTANCE_M: f64 = 1.0e7;
pub const MAX_MARCH_STEPS: usize = 10_000;
const MIN_MARCH_STEP_M: f64 = 0.1;

fn default_tolerance() -> f64 {
    DEFAULT_MARCH_TOLERANCE_M
}

fn default_max_distance() -> f64 {
    DEFAULT_MARCH_MAX_DISTANCE_M
}

/// How a boresight ray is intersected with the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum IntersectionStrategy {
    /// Quadratic solution against the WGS-84 ellipsoid.
    #[default]
    ClosedForm,
    /// Step along the ray by the current geodetic altitude.
    Marching {
        #[serde(default = "default_tolerance")]
        tolerance_m: f64,
        #[serde(default = "default_max_distance")]
        max_distance_m: f64,
    },
}

impl IntersectionStrategy {
    pub fn marching() -> Self {
        IntersectionStrategy::Marching {
            tolerance_m: DEFAULT_MARCH_TOLERANCE_M,
            max_distance_m: DEFAULT_MARCH_MAX_DISTANCE_M,
        }
    }
}

/// First point where the ray `position + t·direction` (t ≥ 0) meets the
/// Earth's surface, in meters. `None` when the ray misses.
pub fn ray_earth_intersection(
    position: &Vector3<f64>,
    direction: &Vector3<f64>,
    strategy: IntersectionStrategy,
) -> Option<Vector3<f64>> {
    let direction = direction.try_normalize(0.0)?;
    match strategy {
        IntersectionStrategy::ClosedForm => closed_form(position, &direction),
        IntersectionStrategy::Marching {
            tolerance_m,
            max_distance_m,
        } => march(position, &direction, tolerance_m, max_distance_m),
    }
}

fn closed_form(position: &Vector3<f64>, direction: &Vector3<f64>) -> Option<Vector3<f64>> {
    // Stretch z so the ellipsoid becomes a sphere of the equatorial radius.
    let stretch = Vector3::new(1.0, 1.0, EQUATORIAL_RADIUS_M / POLAR_RADIUS_M);
    let p = position.component_mul(&stretch);
    let d = direction.component_mul(&stretch);

    let a = d.norm_squared();
    let b = 2.0 * p.dot(&d);
    let c = p.norm_squared() - EQUATORIAL_RADIUS_M * EQUATORIAL_RADIUS_M;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = (-b - root) / (2.0 * a);
    let far = (-b + root) / (2.0 * a);
    let t = [near, far].into_iter().find(|t| *t >= 0.0)?;
    Some(position + direction * t)
}

fn march(
    position: &Vector3<f64>,
    direction: &Vector3<f64>,
    tolerance_m: f64,
    max_distance_m: f64,
) -> Option<Vector3<f64>> {
    let mut t = 0.0;
    for _ in 0..MAX_MARCH_STEPS {
        let point = position + direction * t;
        let altitude = match ecef_to_geodetic(&point) {
            Ok(g) => g.altitude_m,
            Err(GeodeticError::NotConverged { best, .. }) => best.altitude_m,
            Err(_) => return None,
        };
        if altitude <= tolerance_m {
            return Some(point);
        }
        t += (altitude - tolerance_m).max(MIN_MARCH_STEP_M);
        if t > max_distance_m {
            return None;
        }
    }
    log::debug!("Ray march gave up after {} steps", MAX_MARCH_STEPS);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodetic::ellipsoid::{geodetic_to_ecef, Geodetic};
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    const ORBIT_M: f64 = EQUATORIAL_RADIUS_M + 500_000.0;

    #[rstest]
    #[case(IntersectionStrategy::ClosedForm)]
    #[case(IntersectionStrategy::marching())]
    fn nadir_from_equatorial_orbit(#[case] strategy: IntersectionStrategy) {
        let p = Vector3::new(ORBIT_M, 0.0, 0.0);
        let hit = ray_earth_intersection(&p, &Vector3::new(-1.0, 0.0, 0.0), strategy).unwrap();
        assert_abs_diff_eq!(hit, Vector3::new(EQUATORIAL_RADIUS_M, 0.0, 0.0), epsilon = 1.5);
    }

    #[rstest]
    #[case(IntersectionStrategy::ClosedForm)]
    #[case(IntersectionStrategy::marching())]
    fn looking_away_misses(#[case] strategy: IntersectionStrategy) {
        let p = Vector3::new(ORBIT_M, 0.0, 0.0);
        assert!(ray_earth_intersection(&p, &Vector3::new(1.0, 0.0, 0.0), strategy).is_none());
        assert!(ray_earth_intersection(&p, &Vector3::new(0.0, 0.0, 1.0), strategy).is_none());
    }

    #[test]
    fn zero_direction_misses() {
        let p = Vector3::new(ORBIT_M, 0.0, 0.0);
        assert!(ray_earth_intersection(&p, &Vector3::zeros(), IntersectionStrategy::ClosedForm).is_none());
    }

    #[test]
    fn closed_form_lands_on_the_ellipsoid() {
        let p = geodetic_to_ecef(&Geodetic {
            latitude_deg: 52.0,
            longitude_deg: 13.0,
            altitude_m: 600_000.0,
        });
        let dir = -p + Vector3::new(1.0e5, -2.0e5, 0.0);
        let hit = ray_earth_intersection(&p, &dir, IntersectionStrategy::ClosedForm).unwrap();
        let surface = ecef_to_geodetic(&hit).unwrap();
        assert_abs_diff_eq!(surface.altitude_m, 0.0, epsilon = 1e-3);
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(35.0, -120.0)]
    #[case(-62.0, 40.0)]
    #[case(80.0, 170.0)]
    fn strategies_agree(#[case] latitude_deg: f64, #[case] longitude_deg: f64) {
        let p = geodetic_to_ecef(&Geodetic {
            latitude_deg,
            longitude_deg,
            altitude_m: 500_000.0,
        });
        let dir = -p.normalize() + Vector3::new(0.05, 0.02, -0.03);
        let exact = ray_earth_intersection(&p, &dir, IntersectionStrategy::ClosedForm).unwrap();
        let marched = ray_earth_intersection(&p, &dir, IntersectionStrategy::marching()).unwrap();
        assert!((exact - marched).norm() < 5.0, "{} m apart", (exact - marched).norm());
    }

    #[test]
    fn strategy_from_config_text() {
        let closed: IntersectionStrategy = serde_yaml::from_str("method: closed_form").unwrap();
        assert_eq!(closed, IntersectionStrategy::ClosedForm);
        let marching: IntersectionStrategy = serde_yaml::from_str("method: marching\ntolerance_m: 0.5\n").unwrap();
        assert_eq!(
            marching,
            IntersectionStrategy::Marching {
                tolerance_m: 0.5,
                max_distance_m: DEFAULT_MARCH_MAX_DISTANCE_M,
            }
        );
    }
}
