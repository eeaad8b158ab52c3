pub mod quaternion;
pub mod vector;

pub use quaternion::{heading_deg, mrp_to_quaternion, rotate, slerp, slerp_at};
pub use vector::{angle_deg, lerp, unit, DEGENERATE_ANGLE_DEG};
