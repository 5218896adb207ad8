use super::{DetectionMode, DetectionResult};
use crate::processing::filters::low_pass::SmoothedState;
use crate::processing::Sample;

#[derive(Debug, Clone, PartialEq)]
pub struct SpikeDetectorConfig {
    pub vector_jump_threshold: f64,
    pub mag_jump_threshold: f64,
    pub mode: DetectionMode,
}

/// Compares each smoothed sample against the previous smoothed vector.
pub struct SpikeDetector {
    config: SpikeDetectorConfig,
    last_vector: Sample,
}

impl SpikeDetector {
    pub fn new(config: SpikeDetectorConfig) -> Self {
        Self {
            config,
            // The first comparison is made against the origin
            last_vector: Sample::default(),
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: DetectionMode) {
        self.config.mode = mode;
    }

    pub fn last_vector(&self) -> Sample {
        self.last_vector
    }

    pub fn process_sample(&mut self, smoothed: &SmoothedState) -> DetectionResult {
        // |B| of the previous vector is recomputed from its axes rather than
        // taken from the smoothed magnitude series.
        let mag_delta = (smoothed.magnitude - self.last_vector.magnitude()).abs();

        let result = match self.config.mode {
            DetectionMode::MagnitudeOnly => DetectionResult {
                axis_delta: None,
                mag_delta,
                triggered: mag_delta >= self.config.mag_jump_threshold,
            },
            DetectionMode::Vector => {
                let delta = smoothed.vector.max_axis_delta(&self.last_vector);
                DetectionResult {
                    axis_delta: Some(delta),
                    mag_delta,
                    triggered: delta >= self.config.vector_jump_threshold
                        || mag_delta >= self.config.mag_jump_threshold,
                }
            }
        };

        self.last_vector = smoothed.vector;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_detector(mode: DetectionMode) -> SpikeDetector {
        SpikeDetector::new(SpikeDetectorConfig {
            vector_jump_threshold: 25.0,
            mag_jump_threshold: 10.0,
            mode,
        })
    }

    fn state(x: f64, y: f64, z: f64) -> SmoothedState {
        let vector = Sample::new(x, y, z);
        SmoothedState {
            vector,
            magnitude: vector.magnitude(),
        }
    }

    #[test]
    fn axis_jump_triggers_in_vector_mode() {
        let mut detector = new_detector(DetectionMode::Vector);
        detector.process_sample(&state(10.0, 0.0, 0.0));

        let result = detector.process_sample(&state(10.0, 0.0, 35.0));
        assert_eq!(result.axis_delta, Some(35.0));
        assert!(result.triggered);
    }

    #[test]
    fn norm_preserving_swap_only_triggers_in_vector_mode() {
        let mut magnitude_only = new_detector(DetectionMode::MagnitudeOnly);
        let mut vector = new_detector(DetectionMode::Vector);

        for d in [&mut magnitude_only, &mut vector] {
            d.process_sample(&state(40.0, 0.0, 0.0));
        }

        let swapped = state(0.0, 40.0, 0.0);
        let result = magnitude_only.process_sample(&swapped);
        assert!(!result.triggered);
        assert_eq!(result.axis_delta, None);
        assert!(result.mag_delta < 1e-12);

        let result = vector.process_sample(&swapped);
        assert!(result.triggered);
        assert_eq!(result.axis_delta, Some(40.0));
    }

    #[test]
    fn magnitude_jump_triggers_in_both_modes() {
        for mode in [DetectionMode::Vector, DetectionMode::MagnitudeOnly] {
            let mut detector = new_detector(mode);
            detector.process_sample(&state(30.0, 0.0, 0.0));
            // Per-axis change stays under 25 while |B| grows by 12
            let result = detector.process_sample(&state(42.0, 0.0, 0.0));
            assert!(result.triggered, "mode {:?}", mode);
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut detector = new_detector(DetectionMode::MagnitudeOnly);
        detector.process_sample(&state(0.0, 0.0, 20.0));
        assert!(detector.process_sample(&state(0.0, 0.0, 30.0)).triggered);
    }

    #[test]
    fn first_sample_compares_against_origin() {
        let mut detector = new_detector(DetectionMode::Vector);
        assert!(detector.process_sample(&state(20.0, -5.0, 42.0)).triggered);

        let mut detector = new_detector(DetectionMode::Vector);
        assert!(!detector.process_sample(&state(1.0, 1.0, 1.0)).triggered);
    }

    #[test]
    fn mag_delta_uses_recomputed_previous_magnitude() {
        let mut detector = new_detector(DetectionMode::MagnitudeOnly);
        detector.process_sample(&state(0.0, 0.0, 50.0));

        // Smoothed magnitude lags behind the axes; the reference is |last_vector| = 50
        let current = SmoothedState {
            vector: Sample::new(0.0, 0.0, 60.0),
            magnitude: 55.0,
        };
        let result = detector.process_sample(&current);
        assert!((result.mag_delta - 5.0).abs() < 1e-12);
        assert!(!result.triggered);
        assert_eq!(detector.last_vector(), Sample::new(0.0, 0.0, 60.0));
    }
}
