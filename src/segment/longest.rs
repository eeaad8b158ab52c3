use rayon::prelude::*;

use crate::ephemeris::{EvaluatedSample, ImagingPass, OrbitPath};
use crate::segment::runs::{fragment_to_valid_runs, valid_indices, ValidRun};

/// The longest valid run found across an orbit path.
#[derive(Debug, Clone)]
pub struct LongestRun {
    /// Position of the owning pass within the path.
    pub pass_index: usize,
    /// The whole pass the run was found in.
    pub pass: ImagingPass<EvaluatedSample>,
    /// Indices relative to `pass`.
    pub run: ValidRun,
}

impl LongestRun {
    /// Just the samples of the run.
    pub fn fragment(&self) -> ImagingPass<EvaluatedSample> {
        self.pass
            .slice(self.run.start, self.run.end)
            .unwrap_or_else(|| self.pass.clone())
    }
}

/// Longest run of valid samples over every pass.
///
/// Ties go to the earliest pass, then the earliest start. `None` when no
/// sample in the path is valid.
pub fn longest_run(path: &OrbitPath<EvaluatedSample>) -> Option<LongestRun> {
    let per_pass = path
        .passes()
        .par_iter()
        .map(|pass| fragment_to_valid_runs(pass).1)
        .collect::<Vec<_>>();

    let mut best: Option<(usize, ValidRun)> = None;
    for (pass_index, runs) in per_pass.into_iter().enumerate() {
        for run in runs {
            if best.map_or(true, |(_, b)| run.len() > b.len()) {
                best = Some((pass_index, run));
            }
        }
    }

    best.map(|(pass_index, run)| LongestRun {
        pass_index,
        pass: path.passes()[pass_index].clone(),
        run,
    })
}

/// Passes with at least one valid sample.
pub fn count_partially_valid_passes(path: &OrbitPath<EvaluatedSample>) -> usize {
    path.passes()
        .iter()
        .filter(|p| p.samples().iter().any(|s| s.is_valid()))
        .count()
}

/// Passes where every sample is valid.
pub fn count_fully_valid_passes(path: &OrbitPath<EvaluatedSample>) -> usize {
    path.passes()
        .iter()
        .filter(|p| valid_indices(p).len() == p.len())
        .count()
}
