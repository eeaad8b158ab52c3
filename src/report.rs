use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::Serialize;

use crate::constraints::{ConstraintEvaluator, ConstraintKind};
use crate::ephemeris::{EvaluatedSample, ImagingPass, OrbitPath, RawSample, Timestamped};
use crate::segment::{
    count_fully_valid_passes, count_partially_valid_passes, fragment_to_valid_runs, longest_run,
    max_valid_slew_rate, valid_indices, ValidRun,
};

/// Everything learned about an orbit path for one boresight.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub boresight: [f64; 3],
    pub passes: Vec<PassReport>,
    pub partially_valid_passes: usize,
    pub fully_valid_passes: usize,
    pub longest: Option<LongestRunReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub slew_rates: Vec<f64>,
    pub sun_angles: Vec<f64>,
    pub moon_angles: Vec<f64>,
    pub earth_angles: Vec<f64>,
    pub eclipsed: Vec<bool>,
    pub valid_indices: Vec<usize>,
    /// First failed constraint per sample, `null` when valid.
    pub failures: Vec<Option<ConstraintKind>>,
    pub valid_runs: Vec<RunReport>,
    pub max_valid_slew_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub start_index: usize,
    pub end_index: usize,
    pub samples: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestRunReport {
    pub pass_index: usize,
    #[serde(flatten)]
    pub run: RunReport,
}

impl RunReport {
    pub fn new(pass: &ImagingPass<EvaluatedSample>, run: ValidRun) -> Self {
        let samples = pass.samples();
        let start = samples[run.start].timestamp();
        let end = samples[run.end].timestamp();
        Self {
            start_index: run.start,
            end_index: run.end,
            samples: run.len(),
            start,
            end,
            duration_seconds: (end - start).num_microseconds().unwrap_or(0) as f64 / 1.0e6,
        }
    }
}

impl PassReport {
    pub fn new(pass: &ImagingPass<EvaluatedSample>) -> Self {
        let samples = pass.samples();
        let (_, runs) = fragment_to_valid_runs(pass);
        Self {
            start: pass.start(),
            end: pass.end(),
            slew_rates: samples.iter().map(|s| s.annotated().slew_rate_deg_s()).collect(),
            sun_angles: samples.iter().map(|s| s.angles().sun_deg).collect(),
            moon_angles: samples.iter().map(|s| s.angles().moon_deg).collect(),
            earth_angles: samples.iter().map(|s| s.angles().earth_deg).collect(),
            eclipsed: samples.iter().map(|s| s.annotated().eclipsed()).collect(),
            valid_indices: valid_indices(pass),
            failures: samples.iter().map(|s| s.validity().failed()).collect(),
            valid_runs: runs.into_iter().map(|run| RunReport::new(pass, run)).collect(),
            max_valid_slew_rate: max_valid_slew_rate(pass),
        }
    }
}

/// Run the full pipeline over `path` and summarize it.
pub fn analyze_path(
    path: &OrbitPath<RawSample>,
    boresight: &Vector3<f64>,
    evaluator: &ConstraintEvaluator,
    terminal_slew_rate: f64,
) -> AnalysisReport {
    let evaluated = path.annotate(boresight, terminal_slew_rate).evaluate(evaluator);
    summarize(&evaluated, boresight)
}

/// Summarize an already evaluated path.
pub fn summarize(evaluated: &OrbitPath<EvaluatedSample>, boresight: &Vector3<f64>) -> AnalysisReport {
    let longest = longest_run(evaluated).map(|l| LongestRunReport {
        pass_index: l.pass_index,
        run: RunReport::new(&l.pass, l.run),
    });
    let report = AnalysisReport {
        boresight: [boresight.x, boresight.y, boresight.z],
        passes: evaluated.passes().iter().map(PassReport::new).collect(),
        partially_valid_passes: count_partially_valid_passes(evaluated),
        fully_valid_passes: count_fully_valid_passes(evaluated),
        longest,
    };
    log::info!(
        "{} passes, {} with valid samples, {} fully valid",
        report.passes.len(),
        report.partially_valid_passes,
        report.fully_valid_passes
    );
    report
}
