use super::FilterInstance;
use crate::processing::Sample;

// LOW PASS FILTER -------------------------------------------------------------

/// First order exponential smoother:
/// `y[n] = alpha * x[n] + (1 - alpha) * y[n-1]`, with `y[0] = x[0]`.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    alpha: f64,
    prev: Option<f64>,
}

impl LowPassFilter {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, prev: None }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl FilterInstance for LowPassFilter {
    fn filter_sample(&mut self, sample: f64) -> f64 {
        let output = match self.prev {
            // Cold start passes the first sample straight through
            None => sample,
            Some(prev) => self.alpha * sample + (1.0 - self.alpha) * prev,
        };
        self.prev = Some(output);
        output
    }

    fn last_output(&self) -> Option<f64> {
        self.prev
    }

    fn reset(&mut self) {
        self.prev = None;
    }
}

// VECTOR SMOOTHER -------------------------------------------------------------

/// Smoothed field after a tick. The magnitude is derived from the smoothed
/// axes and then smoothed itself, so it is not `vector.magnitude()` in general.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedState {
    pub vector: Sample,
    pub magnitude: f64,
}

pub struct VectorSmoother {
    x: LowPassFilter,
    y: LowPassFilter,
    z: LowPassFilter,
    magnitude: LowPassFilter,
}

impl VectorSmoother {
    pub fn new(alpha: f64) -> Self {
        Self {
            x: LowPassFilter::new(alpha),
            y: LowPassFilter::new(alpha),
            z: LowPassFilter::new(alpha),
            magnitude: LowPassFilter::new(alpha),
        }
    }

    pub fn filter_sample(&mut self, raw: Sample) -> SmoothedState {
        let vector = Sample::new(
            self.x.filter_sample(raw.x),
            self.y.filter_sample(raw.y),
            self.z.filter_sample(raw.z),
        );
        let magnitude = self.magnitude.filter_sample(vector.magnitude());

        SmoothedState { vector, magnitude }
    }

    /// Latest smoothed state, `None` before the first sample.
    pub fn state(&self) -> Option<SmoothedState> {
        let vector = Sample::new(
            self.x.last_output()?,
            self.y.last_output()?,
            self.z.last_output()?,
        );
        Some(SmoothedState {
            vector,
            magnitude: self.magnitude.last_output()?,
        })
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
        self.z.reset();
        self.magnitude.reset();
    }
}
