use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geodetic::error::GeodeticError;

// WGS-84, meters
pub const EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;
pub const FLATTENING: f64 = 1.0 / 298.257_223_563;
pub const POLAR_RADIUS_M: f64 = EQUATORIAL_RADIUS_M * (1.0 - FLATTENING);
pub const ECCENTRICITY_SQ: f64 = 1.0 - (1.0 - FLATTENING) * (1.0 - FLATTENING);

pub const LATITUDE_TOLERANCE_RAD: f64 = 1.0e-12;
pub const MAX_ITERATIONS: usize = 100;

// Anything this close to the origin was almost certainly given in kilometers.
const KILOMETER_SUSPECT_M: f64 = 1.0e6;
// Within this distance of the spin axis the latitude is taken as ±90°.
const POLAR_AXIS_M: f64 = 1.0e-6;

/// Geodetic coordinates on the WGS-84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geodetic {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

/// ECEF position (meters) to geodetic coordinates.
///
/// Latitude is solved by fixed-point iteration on the reduced latitude.
/// When the iteration cap is hit the best estimate is returned inside
/// [`GeodeticError::NotConverged`].
pub fn ecef_to_geodetic(ecef: &Vector3<f64>) -> Result<Geodetic, GeodeticError> {
    let (x, y, z) = (ecef.x, ecef.y, ecef.z);
    let s = x.hypot(y);

    if ecef.norm() < KILOMETER_SUSPECT_M {
        if s == 0.0 && z == 0.0 {
            return Err(GeodeticError::AtEarthCenter);
        }
        log::warn!(
            "ECEF position [{:.3}, {:.3}, {:.3}] is inside the Earth; expected meters, got kilometers?",
            x,
            y,
            z
        );
    }

    let longitude = y.atan2(x);

    if s < POLAR_AXIS_M {
        return Ok(Geodetic {
            latitude_deg: 90.0_f64.copysign(z),
            longitude_deg: longitude.to_degrees(),
            altitude_m: z.abs() - POLAR_RADIUS_M,
        });
    }

    let one_minus_f = 1.0 - FLATTENING;
    // e'² · b = e² · a / (1 - f)
    let numerator_scale = ECCENTRICITY_SQ * EQUATORIAL_RADIUS_M / one_minus_f;
    let denominator_scale = ECCENTRICITY_SQ * EQUATORIAL_RADIUS_M;

    let mut beta = (z / (one_minus_f * s)).atan();
    let mut previous: Option<f64> = None;
    let mut latitude = beta;

    for iteration in 1..=MAX_ITERATIONS {
        latitude = ((z + numerator_scale * beta.sin().powi(3))
            / (s - denominator_scale * beta.cos().powi(3)))
        .atan();
        if previous.is_some_and(|p| (latitude - p).abs() < LATITUDE_TOLERANCE_RAD) {
            log::trace!("Latitude converged after {} iterations", iteration);
            return Ok(finish(s, z, latitude, longitude));
        }
        previous = Some(latitude);
        beta = (one_minus_f * latitude.tan()).atan();
    }

    let best = finish(s, z, latitude, longitude);
    log::warn!(
        "Latitude iteration hit the cap of {} at [{:.3}, {:.3}, {:.3}]",
        MAX_ITERATIONS,
        x,
        y,
        z
    );
    Err(GeodeticError::NotConverged {
        best,
        iterations: MAX_ITERATIONS,
    })
}

fn finish(s: f64, z: f64, latitude: f64, longitude: f64) -> Geodetic {
    let sin_lat = latitude.sin();
    let n = EQUATORIAL_RADIUS_M / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
    let altitude = s * latitude.cos() + (z + ECCENTRICITY_SQ * n * sin_lat) * sin_lat - n;
    Geodetic {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: longitude.to_degrees(),
        altitude_m: altitude,
    }
}

/// Geodetic coordinates to ECEF position in meters.
pub fn geodetic_to_ecef(geodetic: &Geodetic) -> Vector3<f64> {
    let lat = geodetic.latitude_deg.to_radians();
    let lon = geodetic.longitude_deg.to_radians();
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let n = EQUATORIAL_RADIUS_M / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
    let alt = geodetic.altitude_m;
    Vector3::new(
        (n + alt) * cos_lat * lon.cos(),
        (n + alt) * cos_lat * lon.sin(),
        (n * (1.0 - ECCENTRICITY_SQ) + alt) * sin_lat,
    )
}
