mod error;
mod parsing;
mod pass;
mod sample;

pub use error::{EphemerisError, PassError};
pub use parsing::{load_orbit_path, parse_report, window_passes, TrackingPeriod};
pub use pass::{ImagingPass, OrbitPath};
pub use sample::{AnnotatedSample, EvaluatedSample, ExclusionAngles, RawSample, Timestamped};

#[cfg(test)]
pub(crate) mod testing;
