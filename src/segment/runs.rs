use serde::Serialize;

use crate::ephemeris::{EvaluatedSample, ImagingPass, OrbitPath};

/// A maximal stretch `[start, end]` (inclusive) of valid samples in a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ValidRun {
    pub start: usize,
    pub end: usize,
}

impl ValidRun {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// A run always holds at least one sample.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

/// Indices of valid samples, in pass order.
pub fn valid_indices(pass: &ImagingPass<EvaluatedSample>) -> Vec<usize> {
    pass.samples()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_valid())
        .map(|(i, _)| i)
        .collect()
}

/// Group ascending indices into runs of consecutive integers.
pub fn runs_from_indices(indices: &[usize]) -> Vec<ValidRun> {
    let mut runs: Vec<ValidRun> = Vec::new();
    for &index in indices {
        match runs.last_mut() {
            Some(run) if run.end + 1 == index => run.end = index,
            _ => runs.push(ValidRun {
                start: index,
                end: index,
            }),
        }
    }
    runs
}

/// Runs of `true` in a flag sequence.
pub fn valid_runs(flags: &[bool]) -> Vec<ValidRun> {
    let indices = flags
        .iter()
        .enumerate()
        .filter(|&(_, &valid)| valid)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    runs_from_indices(&indices)
}

/// Split a pass into sub-passes, one per valid run.
///
/// Returns the sub-passes and, in parallel, each run's indices relative to
/// `pass`. Both are empty when nothing is valid.
pub fn fragment_to_valid_runs(
    pass: &ImagingPass<EvaluatedSample>,
) -> (Vec<ImagingPass<EvaluatedSample>>, Vec<ValidRun>) {
    let runs = runs_from_indices(&valid_indices(pass));
    let fragments = runs
        .iter()
        .filter_map(|run| pass.slice(run.start, run.end))
        .collect::<Vec<_>>();
    debug_assert_eq!(fragments.len(), runs.len());
    (fragments, runs)
}

impl OrbitPath<EvaluatedSample> {
    /// New path made of the fully valid fragments of every pass.
    pub fn fragment(&self) -> OrbitPath<EvaluatedSample> {
        let passes = self
            .passes()
            .iter()
            .flat_map(|p| fragment_to_valid_runs(p).0)
            .collect();
        OrbitPath::new(passes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::testing::evaluated_pass;
    use rstest::rstest;
    use std::collections::BTreeSet;

    #[rstest]
    #[case(&[], &[])]
    #[case(&[true], &[(0, 0)])]
    #[case(&[false, false], &[])]
    #[case(&[true, true, false, true], &[(0, 1), (3, 3)])]
    #[case(&[false, true, true, true, false, false, true, true], &[(1, 3), (6, 7)])]
    fn groups_flags(#[case] flags: &[bool], #[case] expected: &[(usize, usize)]) {
        let runs: Vec<_> = valid_runs(flags).iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(runs, expected);
    }

    #[test]
    fn runs_partition_valid_indices() {
        // Deterministic pseudo-random flags.
        let mut state = 0x2545_f491_u64;
        for _ in 0..50 {
            let flags: Vec<bool> = (0..64)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    state % 3 != 0
                })
                .collect();
            let runs = valid_runs(&flags);

            let covered: BTreeSet<usize> = runs.iter().flat_map(|r| r.start..=r.end).collect();
            let expected: BTreeSet<usize> = (0..flags.len()).filter(|&i| flags[i]).collect();
            assert_eq!(covered, expected);
            for pair in runs.windows(2) {
                assert!(pair[1].start > pair[0].end + 1, "runs {:?} touch", pair);
            }
        }
    }

    #[test]
    fn all_valid_pass_is_one_run() {
        let pass = evaluated_pass(&[true; 6]);
        let (fragments, runs) = fragment_to_valid_runs(&pass);
        assert_eq!(runs, vec![ValidRun { start: 0, end: 5 }]);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].len(), 6);
    }

    #[test]
    fn all_invalid_pass_is_empty() {
        let pass = evaluated_pass(&[false; 4]);
        let (fragments, runs) = fragment_to_valid_runs(&pass);
        assert!(fragments.is_empty());
        assert!(runs.is_empty());
    }

    #[test]
    fn fragments_are_inclusive_slices() {
        let pass = evaluated_pass(&[false, true, true, true, false, true]);
        let (fragments, runs) = fragment_to_valid_runs(&pass);
        assert_eq!(runs, vec![ValidRun { start: 1, end: 3 }, ValidRun { start: 5, end: 5 }]);
        assert_eq!(fragments[0].samples(), &pass.samples()[1..=3]);
        assert_eq!(fragments[1].samples(), &pass.samples()[5..=5]);
        assert!(fragments.iter().all(|f| f.shares_storage_with(&pass)));
        assert!(fragments.iter().all(|f| f.samples().iter().all(|s| s.is_valid())));
    }

    #[test]
    fn fragmenting_a_path_builds_a_new_one() {
        let path = crate::ephemeris::testing::evaluated_path(&[
            &[true, false, true][..],
            &[false, false][..],
            &[true, true][..],
        ]);
        let fragmented = path.fragment();
        let lens: Vec<_> = fragmented.passes().iter().map(|p| p.len()).collect();
        assert_eq!(lens, vec![1, 1, 2]);
        assert_eq!(path.len(), 3);
    }
}
