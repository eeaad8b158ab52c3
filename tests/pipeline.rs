use approx::assert_abs_diff_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use nalgebra::Vector3;

use startrack::constraints::{ConstraintEvaluator, ConstraintKind, ConstraintParams, Validity};
use startrack::ephemeris::{load_orbit_path, ImagingPass, OrbitPath, RawSample};
use startrack::report::analyze_path;
use startrack::segment::{fragment_to_valid_runs, longest_run, ValidRun};

fn at(second: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(second)
}

fn sample(second: i64, earth: Vector3<f64>) -> RawSample {
    RawSample {
        timestamp: at(second),
        sun: Vector3::new(0.0, 0.0, 1.0),
        sunlight: Vector3::new(0.0, 0.0, 1.0),
        moon: Vector3::new(0.0, 0.0, -1.0),
        earth,
    }
}

fn pass_from_flags(offset: i64, flags: &[bool]) -> ImagingPass<RawSample> {
    let samples = flags
        .iter()
        .enumerate()
        .map(|(i, &valid)| {
            let x = if valid { -6871.0 } else { 6871.0 };
            sample(offset + i as i64, Vector3::new(x, 0.0, 0.0))
        })
        .collect();
    ImagingPass::new(samples).unwrap()
}

fn runs(lengths: &[usize]) -> Vec<bool> {
    let mut flags = vec![false];
    for &len in lengths {
        flags.extend(std::iter::repeat(true).take(len));
        flags.push(false);
    }
    flags
}

#[test]
fn earth_sweeping_past_the_boresight() {
    let pass = ImagingPass::new(vec![
        sample(0, Vector3::new(1.0, 0.0, 0.0)),
        sample(1, Vector3::new(0.0, 1.0, 0.0)),
        sample(2, Vector3::new(-1.0, 0.0, 0.0)),
    ])
    .unwrap();

    let annotated = pass.annotate(&Vector3::new(1.0, 0.0, 0.0), 0.0);
    let first = &annotated.samples()[0];
    assert_abs_diff_eq!(first.angles().sun_deg, 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(first.angles().moon_deg, 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(first.angles().earth_deg, 0.0, epsilon = 1e-9);
    assert!(!first.eclipsed());

    let rates: Vec<f64> = annotated.samples().iter().map(|s| s.slew_rate_deg_s()).collect();
    assert_abs_diff_eq!(rates[0], 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(rates[1], 90.0, epsilon = 1e-9);
    assert_eq!(rates[2], 0.0);

    let evaluated = annotated.evaluate(&ConstraintEvaluator::default());
    let validity: Vec<Validity> = evaluated.samples().iter().map(|s| s.validity()).collect();
    assert_eq!(validity[0], Validity::Invalid(ConstraintKind::EarthExclusion));
    assert_eq!(validity[1], Validity::Invalid(ConstraintKind::EarthExclusion));
    // Earth directly behind the tracker clears the 110° cone.
    assert_eq!(validity[2], Validity::Valid);

    let (fragments, ranges) = fragment_to_valid_runs(&evaluated);
    assert_eq!(ranges, vec![ValidRun { start: 2, end: 2 }]);
    assert_eq!(fragments[0].start(), at(2));
}

#[test]
fn longest_run_across_passes() {
    let path = OrbitPath::new(vec![pass_from_flags(0, &runs(&[3, 7, 2])), pass_from_flags(100, &runs(&[5]))]);
    let evaluated = path
        .annotate(&Vector3::new(1.0, 0.0, 0.0), 0.0)
        .evaluate(&ConstraintEvaluator::default());

    let longest = longest_run(&evaluated).unwrap();
    assert_eq!(longest.pass_index, 0);
    assert_eq!(longest.run.len(), 7);
    assert_eq!(longest.fragment().len(), 7);
    assert!(longest.fragment().samples().iter().all(|s| s.is_valid()));

    let fragmented = evaluated.fragment();
    let lengths: Vec<usize> = fragmented.passes().iter().map(|p| p.len()).collect();
    assert_eq!(lengths, vec![3, 7, 2, 5]);
}

#[test]
fn tighter_earth_limits_shrink_validity() {
    let path = OrbitPath::new(vec![pass_from_flags(0, &[true, true])]);
    let params = ConstraintParams {
        earth_min_angle_deg: 120.0,
        ..ConstraintParams::default()
    };
    let evaluated = path
        .annotate(&Vector3::new(1.0, 0.0, 0.0), 0.0)
        .evaluate(&ConstraintEvaluator::new(&params));
    assert!(longest_run(&evaluated).is_none());
}

const REPORT: &str = "\
Satellite-FINCH:  Access Summary Report

Start Time (UTCG)           Stop Time (UTCG)            Duration (sec)    Type
------------------------    ------------------------    --------------    ------
1 Jan 2024 00:00:00.000    1 Jan 2024 00:00:03.000            3.000    Target
1 Jan 2024 00:00:05.000    1 Jan 2024 00:00:06.000            1.000    Target

Time (UTCG)    Sun x    Sun y    Sun z    Sunlight x    Sunlight y    Sunlight z    Moon x    Moon y    Moon z    Earth x    Earth y    Earth z
------------------------    ------
1 Jan 2024 00:00:00.000    0.0    0.0    149597870.7    0.0    0.0    1.0    0.0    384400.0    0.0    -6871.0    0.0    0.0
1 Jan 2024 00:00:01.000    0.0    0.0    149597870.7    0.0    0.0    1.0    0.0    384400.0    0.0    -6871.0    0.0    0.0
1 Jan 2024 00:00:02.000    0.0    0.0    149597870.7    0.0    0.0    0.0    0.0    384400.0    0.0    -6871.0    0.0    0.0
1 Jan 2024 00:00:03.000    0.0    0.0    149597870.7    0.0    0.0    1.0    0.0    384400.0    0.0    -6871.0    0.0    0.0
1 Jan 2024 00:00:04.000    0.0    0.0    149597870.7    0.0    0.0    1.0    0.0    384400.0    0.0    -6871.0    0.0    0.0
1 Jan 2024 00:00:05.000    0.0    0.0    149597870.7    0.0    0.0    1.0    0.0    384400.0    0.0    -6871.0    0.0    0.0
1 Jan 2024 00:00:06.000    0.0    0.0    149597870.7    0.0    0.0    1.0    0.0    384400.0    0.0    -6871.0    0.0    0.0
";

#[test]
fn analyzes_a_report_file() {
    let file = std::env::temp_dir().join(format!("startrack-report-{}.txt", std::process::id()));
    std::fs::write(&file, REPORT).unwrap();
    let path = load_orbit_path(&file);
    std::fs::remove_file(&file).ok();
    let path = path.unwrap();

    let report = analyze_path(&path, &Vector3::new(1.0, 0.0, 0.0), &ConstraintEvaluator::default(), 0.0);
    assert_eq!(report.passes.len(), 2);
    assert_eq!(report.partially_valid_passes, 2);
    assert_eq!(report.fully_valid_passes, 1);

    let first = &report.passes[0];
    assert_eq!(first.eclipsed, vec![false, false, true, false]);
    assert_eq!(first.valid_indices, vec![0, 1, 3]);
    assert_eq!(first.failures[2], Some(ConstraintKind::Eclipse));
    assert_eq!(first.valid_runs.len(), 2);

    let longest = report.longest.clone().unwrap();
    assert_eq!(longest.pass_index, 0);
    assert_eq!(longest.run.start_index, 0);
    assert_eq!(longest.run.duration_seconds, 1.0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["passes"][0]["failures"][2], "eclipse");
    assert!(json["passes"][0]["failures"][0].is_null());
    assert_eq!(json["longest"]["samples"], 2);
}
