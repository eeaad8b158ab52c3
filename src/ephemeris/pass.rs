use std::ops::Range;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::constraints::{exclusion_angles, ConstraintEvaluator};
use crate::ephemeris::error::PassError;
use crate::ephemeris::sample::{AnnotatedSample, EvaluatedSample, RawSample, Timestamped};
use crate::segment::slew_rates;

/// A non-empty, ordered window of samples from one tracking period.
///
/// Sub-passes produced by fragmentation share the parent's storage.
#[derive(Debug)]
pub struct ImagingPass<S> {
    samples: Arc<[S]>,
    range: Range<usize>,
}

impl<S> Clone for ImagingPass<S> {
    fn clone(&self) -> Self {
        Self {
            samples: Arc::clone(&self.samples),
            range: self.range.clone(),
        }
    }
}

impl<S> ImagingPass<S> {
    pub fn new(samples: Vec<S>) -> Result<Self, PassError> {
        if samples.is_empty() {
            return Err(PassError::Empty);
        }
        let len = samples.len();
        Ok(Self {
            samples: samples.into(),
            range: 0..len,
        })
    }

    pub fn samples(&self) -> &[S] {
        &self.samples[self.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn first(&self) -> &S {
        &self.samples[self.range.start]
    }

    pub fn last(&self) -> &S {
        &self.samples[self.range.end - 1]
    }

    /// Sub-pass covering `start..=end` of this pass, sharing its samples.
    pub fn slice(&self, start: usize, end: usize) -> Option<Self> {
        if start > end || end >= self.len() {
            return None;
        }
        Some(Self {
            samples: Arc::clone(&self.samples),
            range: self.range.start + start..self.range.start + end + 1,
        })
    }

    /// Whether both passes view the same underlying sample storage.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }
}

impl<S: Timestamped> ImagingPass<S> {
    pub fn start(&self) -> DateTime<Utc> {
        self.first().timestamp()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.last().timestamp()
    }

    pub fn time_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start(), self.end())
    }
}

impl ImagingPass<RawSample> {
    /// Compute boresight angles and slew rates for every sample.
    ///
    /// The final sample has no successor and gets `terminal_slew_rate`.
    pub fn annotate(&self, boresight: &Vector3<f64>, terminal_slew_rate: f64) -> ImagingPass<AnnotatedSample> {
        let samples = self.samples();
        let rates = slew_rates(samples, terminal_slew_rate);
        let annotated = samples
            .iter()
            .zip(rates)
            .map(|(raw, rate)| AnnotatedSample::new(raw.clone(), exclusion_angles(raw, boresight), rate))
            .collect::<Vec<_>>();
        ImagingPass::from_nonempty(annotated)
    }
}

impl ImagingPass<AnnotatedSample> {
    pub fn evaluate(&self, evaluator: &ConstraintEvaluator) -> ImagingPass<EvaluatedSample> {
        let evaluated = self
            .samples()
            .iter()
            .map(|s| EvaluatedSample::new(s.clone(), evaluator.evaluate_sample(s)))
            .collect::<Vec<_>>();
        ImagingPass::from_nonempty(evaluated)
    }
}

impl<S> ImagingPass<S> {
    // Stage transforms map a non-empty pass one-to-one.
    fn from_nonempty(samples: Vec<S>) -> Self {
        debug_assert!(!samples.is_empty());
        let len = samples.len();
        Self {
            samples: samples.into(),
            range: 0..len,
        }
    }
}

/// All imaging passes of a mission timeline, in order.
#[derive(Debug)]
pub struct OrbitPath<S> {
    passes: Vec<ImagingPass<S>>,
}

impl<S> Clone for OrbitPath<S> {
    fn clone(&self) -> Self {
        Self {
            passes: self.passes.clone(),
        }
    }
}

impl<S> OrbitPath<S> {
    pub fn new(passes: Vec<ImagingPass<S>>) -> Self {
        Self { passes }
    }

    pub fn passes(&self) -> &[ImagingPass<S>] {
        &self.passes
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Every sample of every pass, in timeline order.
    pub fn samples(&self) -> impl Iterator<Item = &S> {
        self.passes.iter().flat_map(|p| p.samples().iter())
    }
}

impl OrbitPath<RawSample> {
    pub fn annotate(&self, boresight: &Vector3<f64>, terminal_slew_rate: f64) -> OrbitPath<AnnotatedSample> {
        log::debug!(
            "Annotating {} passes for boresight [{:.3}, {:.3}, {:.3}]",
            self.passes.len(),
            boresight.x,
            boresight.y,
            boresight.z
        );
        let passes = self
            .passes
            .par_iter()
            .map(|p| p.annotate(boresight, terminal_slew_rate))
            .collect();
        OrbitPath { passes }
    }
}

impl OrbitPath<AnnotatedSample> {
    pub fn evaluate(&self, evaluator: &ConstraintEvaluator) -> OrbitPath<EvaluatedSample> {
        let passes = self
            .passes
            .par_iter()
            .map(|p| p.evaluate(evaluator))
            .collect();
        OrbitPath { passes }
    }
}
