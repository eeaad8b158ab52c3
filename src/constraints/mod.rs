mod evaluator;
mod types;

pub use evaluator::{exclusion_angles, ConstraintEvaluator, ConstraintParams};
pub use types::{Constraint, ConstraintKind, EarthLimb, Validity};
