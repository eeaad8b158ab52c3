mod ellipsoid;
mod error;
mod ground_track;
mod interpolate;
mod intersect;

pub use ellipsoid::{
    ecef_to_geodetic, geodetic_to_ecef, Geodetic, ECCENTRICITY_SQ, EQUATORIAL_RADIUS_M, FLATTENING,
    POLAR_RADIUS_M,
};
pub use error::GeodeticError;
pub use ground_track::{project_ground_track, AttitudeTrack, Boresight, GroundPoint, GroundTrackEntry};
pub use interpolate::{interpolate_attitudes, interpolate_positions, interpolate_timestamps, steps_per_interval};
pub use intersect::{ray_earth_intersection, IntersectionStrategy};
