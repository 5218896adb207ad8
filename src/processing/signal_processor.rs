use std::time::{Duration, Instant};

use super::detectors::spike::{SpikeDetector, SpikeDetectorConfig};
use super::detectors::{DetectionMode, DetectionResult};
use super::filters::low_pass::{SmoothedState, VectorSmoother};
use super::history::History;
use super::triggers::hold::{SpikeHold, SpikeHoldConfig, SpikeState};
use super::triggers::OutputAction;
use super::Sample;
use crate::config::Config;
use crate::display::DisplayPayload;

// -----------------------------------------------------------------------------
// RUST CORE LOGIC
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SignalProcessorConfig {
    pub alpha: f64,
    pub vector_jump_threshold: f64,
    pub mag_jump_threshold: f64,
    pub hold_duration_seconds: f64,
    pub mode: DetectionMode,
    pub history_length: usize,
}

impl Default for SignalProcessorConfig {
    fn default() -> Self {
        SignalProcessorConfig::from(&Config::default())
    }
}

impl From<&Config> for SignalProcessorConfig {
    fn from(config: &Config) -> Self {
        Self {
            alpha: config.processor.alpha,
            vector_jump_threshold: config.processor.vector_jump_threshold,
            mag_jump_threshold: config.processor.mag_jump_threshold,
            hold_duration_seconds: config.trigger.hold_duration_seconds,
            mode: config.processor.mode,
            history_length: config.visualization.history_length,
        }
    }
}

/// Hold length in seconds as a `Duration`. Values too large to represent
/// hold forever; negative or NaN values release on the next tick.
fn hold_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickResult {
    pub smoothed: SmoothedState,
    pub detection: DetectionResult,
    pub spike: SpikeState,
    pub action: OutputAction,
    pub payload: DisplayPayload,
}

// SIGNAL PROCESSOR COMPONENT --------------------------------------------------

/// Smooths raw readings and decides when the output line is high.
///
/// Owns all per-run state, so a single caller drives it one tick at a time.
pub struct SignalProcessor {
    pub index: usize,
    smoother: VectorSmoother,
    detector: SpikeDetector,
    hold: SpikeHold,
    history: History,
}

impl SignalProcessor {
    pub fn new(config: SignalProcessorConfig) -> Self {
        SignalProcessor {
            index: 0,
            smoother: VectorSmoother::new(config.alpha),
            detector: SpikeDetector::new(SpikeDetectorConfig {
                vector_jump_threshold: config.vector_jump_threshold,
                mag_jump_threshold: config.mag_jump_threshold,
                mode: config.mode,
            }),
            hold: SpikeHold::new(SpikeHoldConfig {
                hold_duration: hold_duration(config.hold_duration_seconds),
            }),
            history: History::new(config.history_length),
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.detector.mode()
    }

    pub fn set_mode(&mut self, mode: DetectionMode) {
        if mode != self.detector.mode() {
            tracing::info!(%mode, "Detection mode changed");
            self.detector.set_mode(mode);
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn smoothed_state(&self) -> Option<SmoothedState> {
        self.smoother.state()
    }

    pub fn spike_state(&self) -> SpikeState {
        self.hold.state()
    }

    pub fn process_sample(&mut self, sample: Sample, now: Instant) -> TickResult {
        let smoothed = self.smoother.filter_sample(sample);
        self.history.push(&smoothed);

        let detection = self.detector.process_sample(&smoothed);
        let action = self.hold.evaluate(detection.triggered, now);
        let spike = self.hold.state();

        match action {
            OutputAction::Assert => tracing::info!(
                count = spike.count,
                axis_delta = ?detection.axis_delta,
                mag_delta = detection.mag_delta,
                "Spike detected, output asserted"
            ),
            OutputAction::Deassert => tracing::info!(count = spike.count, "Spike hold elapsed"),
            OutputAction::Hold if detection.triggered => tracing::info!(
                count = spike.count,
                axis_delta = ?detection.axis_delta,
                mag_delta = detection.mag_delta,
                "Spike re-triggered during hold"
            ),
            OutputAction::Hold => {}
        }

        tracing::trace!(
            index = self.index,
            x = smoothed.vector.x,
            y = smoothed.vector.y,
            z = smoothed.vector.z,
            magnitude = smoothed.magnitude,
            "Processed sample"
        );

        let payload = DisplayPayload {
            x: smoothed.vector.x,
            y: smoothed.vector.y,
            z: smoothed.vector.z,
            magnitude: smoothed.magnitude,
            spike_count: spike.count,
            triggered: detection.triggered,
            spike_active: spike.active,
            mode: self.detector.mode(),
        };

        self.index += 1;

        TickResult {
            smoothed,
            detection,
            spike,
            action,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(alpha: f64, mode: DetectionMode) -> SignalProcessorConfig {
        SignalProcessorConfig {
            alpha,
            mode,
            ..SignalProcessorConfig::default()
        }
    }

    fn at(t0: Instant, tick: u32) -> Instant {
        t0 + Duration::from_millis(100) * tick
    }

    #[test]
    fn cold_start_reports_raw_values() {
        let mut processor = SignalProcessor::new(config(0.3, DetectionMode::Vector));
        let result = processor.process_sample(Sample::new(3.0, 4.0, 12.0), Instant::now());

        assert_eq!(result.smoothed.vector, Sample::new(3.0, 4.0, 12.0));
        assert_eq!(result.payload.magnitude, 13.0);
        assert_eq!(processor.history().len(), 1);
        assert_eq!(processor.index, 1);
    }

    #[test]
    fn reference_example_triggers_in_vector_mode() {
        let mut processor = SignalProcessor::new(config(1.0, DetectionMode::Vector));
        let t0 = Instant::now();

        // Field stays under the |B| threshold from the origin
        processor.process_sample(Sample::new(5.0, 0.0, 0.0), t0);
        processor.process_sample(Sample::new(10.0, 0.0, 0.0), at(t0, 1));
        let result = processor.process_sample(Sample::new(10.0, 0.0, 35.0), at(t0, 2));

        assert!(result.payload.triggered);
        assert_eq!(result.detection.axis_delta, Some(35.0));
        assert_eq!(result.action, OutputAction::Assert);
        assert_eq!(result.payload.spike_count, 1);
    }

    #[test]
    fn isolated_step_counts_once_until_recrossed() {
        let mut processor = SignalProcessor::new(SignalProcessorConfig {
            alpha: 1.0,
            hold_duration_seconds: 0.5,
            ..SignalProcessorConfig::default()
        });
        let t0 = Instant::now();
        let quiet = Sample::new(2.0, 1.0, 3.0);
        let loud = Sample::new(2.0, 1.0, 60.0);

        processor.process_sample(quiet, t0);
        let mut tick = 1;
        for _ in 0..5 {
            processor.process_sample(quiet, at(t0, tick));
            tick += 1;
        }
        assert_eq!(processor.spike_state().count, 0);

        assert!(processor.process_sample(loud, at(t0, tick)).payload.triggered);
        tick += 1;
        for _ in 0..10 {
            assert!(!processor.process_sample(loud, at(t0, tick)).payload.triggered);
            tick += 1;
        }
        assert_eq!(processor.spike_state().count, 1);

        // Dropping back is itself a jump
        assert!(processor.process_sample(quiet, at(t0, tick)).payload.triggered);
        assert_eq!(processor.spike_state().count, 2);
    }

    #[test]
    fn hold_releases_autonomously() {
        let mut processor = SignalProcessor::new(config(1.0, DetectionMode::Vector));
        let t0 = Instant::now();
        let base = Sample::new(1.0, 1.0, 1.0);

        processor.process_sample(base, t0);
        let result = processor.process_sample(Sample::new(1.0, 1.0, 40.0), at(t0, 1));
        assert_eq!(result.action, OutputAction::Assert);

        let mut released_at = None;
        for tick in 2..=80 {
            let result = processor.process_sample(Sample::new(1.0, 1.0, 40.0), at(t0, tick));
            if result.action == OutputAction::Deassert {
                released_at = Some(tick);
                break;
            }
            assert!(result.spike.active);
        }
        // Triggered at tick 1, 5 s hold => first tick with elapsed >= 5 s is 51
        assert_eq!(released_at, Some(51));
        assert!(!processor.spike_state().active);
    }

    #[test]
    fn mode_switch_changes_detection() {
        let mut processor = SignalProcessor::new(config(1.0, DetectionMode::MagnitudeOnly));
        let t0 = Instant::now();

        processor.process_sample(Sample::new(40.0, 0.0, 0.0), t0);
        let result = processor.process_sample(Sample::new(0.0, 40.0, 0.0), at(t0, 1));
        assert!(!result.payload.triggered);
        assert_eq!(result.payload.mode, DetectionMode::MagnitudeOnly);

        processor.set_mode(DetectionMode::Vector);
        let result = processor.process_sample(Sample::new(40.0, 0.0, 0.0), at(t0, 2));
        assert!(result.payload.triggered);
        assert_eq!(result.payload.mode, DetectionMode::Vector);
    }

    #[test]
    fn last_vector_is_the_smoothed_sample() {
        let mut processor = SignalProcessor::new(config(0.5, DetectionMode::Vector));
        let t0 = Instant::now();

        processor.process_sample(Sample::new(0.0, 0.0, 0.0), t0);
        // Raw jump of 40 is halved by smoothing, so the axis delta is 20 < 25
        let result = processor.process_sample(Sample::new(0.0, 0.0, 40.0), at(t0, 1));
        assert_eq!(result.detection.axis_delta, Some(20.0));

        // Next delta is measured from the smoothed 20, not the raw 40
        let result = processor.process_sample(Sample::new(0.0, 0.0, 40.0), at(t0, 2));
        assert_eq!(result.detection.axis_delta, Some(10.0));
    }

    #[test]
    fn history_is_capped_at_configured_length() {
        let mut processor = SignalProcessor::new(SignalProcessorConfig {
            alpha: 1.0,
            history_length: 3,
            ..SignalProcessorConfig::default()
        });
        let t0 = Instant::now();
        for tick in 0..5 {
            processor.process_sample(Sample::new(0.0, 0.0, tick as f64), at(t0, tick));
        }

        assert_eq!(processor.history().len(), 3);
        assert_eq!(processor.history().magnitude.to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(processor.history().z.to_vec(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn oversized_hold_never_releases() {
        let mut processor = SignalProcessor::new(SignalProcessorConfig {
            alpha: 1.0,
            hold_duration_seconds: 1e20,
            ..SignalProcessorConfig::default()
        });
        let t0 = Instant::now();
        processor.process_sample(Sample::new(0.0, 0.0, 60.0), t0);

        let result = processor.process_sample(Sample::new(0.0, 0.0, 60.0), at(t0, 600));
        assert_eq!(result.action, OutputAction::Hold);
        assert!(processor.spike_state().active);
    }

    #[test]
    fn hold_duration_saturates() {
        assert_eq!(hold_duration(1e20), Duration::MAX);
        assert_eq!(hold_duration(-1.0), Duration::ZERO);
        assert_eq!(hold_duration(f64::NAN), Duration::ZERO);
        assert_eq!(hold_duration(2.5), Duration::from_millis(2500));
    }
}
