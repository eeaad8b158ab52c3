mod longest;
mod runs;
mod slew;

pub use longest::{count_fully_valid_passes, count_partially_valid_passes, longest_run, LongestRun};
pub use runs::{fragment_to_valid_runs, runs_from_indices, valid_indices, valid_runs, ValidRun};
pub use slew::{max_valid_slew_rate, slew_rates};
