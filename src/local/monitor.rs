use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::display::DisplaySink;
use crate::outputs::OutputSink;
use crate::processing::signal_processor::{SignalProcessor, TickResult};
use crate::scheduler::Ticker;
use crate::sensors::{SensorError, SensorSource};

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Processed(TickResult),
    /// Read failed; nothing was updated this tick
    SensorError(String),
    /// Sensor has no more data
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub sensor_errors: u64,
    pub spike_count: u64,
}

/// Wires the sensor, the signal processor and the two sinks for one tick
/// at a time.
pub struct Monitor {
    processor: SignalProcessor,
    sensor: Box<dyn SensorSource>,
    output: Box<dyn OutputSink>,
    display: Box<dyn DisplaySink>,
    sensor_errors: u64,
}

impl Monitor {
    pub fn new(
        processor: SignalProcessor,
        sensor: Box<dyn SensorSource>,
        output: Box<dyn OutputSink>,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        Self {
            processor,
            sensor,
            output,
            display,
            sensor_errors: 0,
        }
    }

    pub fn processor(&self) -> &SignalProcessor {
        &self.processor
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let sample = match self.sensor.read() {
            Ok(sample) => sample,
            Err(SensorError::Exhausted) => {
                tracing::info!(sensor = self.sensor.name(), "Sensor exhausted");
                return TickOutcome::Exhausted;
            }
            Err(e) => {
                // State stays as it was; the next tick carries on from it
                self.sensor_errors += 1;
                let message = e.to_string();
                tracing::warn!(sensor = self.sensor.name(), error = %message, "Sensor read failed");
                self.display.show_error(&message);
                return TickOutcome::SensorError(message);
            }
        };

        self.processor.set_mode(self.display.mode());
        let result = self.processor.process_sample(sample, now);

        if let Err(e) = self.output.apply(result.action) {
            tracing::error!(error = %e, action = ?result.action, "Output update failed");
        }

        self.display.render(&result.payload, self.processor.history());
        TickOutcome::Processed(result)
    }

    pub fn run(&mut self, ticker: &Ticker, running: &Arc<AtomicBool>) -> RunSummary {
        tracing::info!(
            sensor = self.sensor.name(),
            period_ms = ticker.period().as_millis() as u64,
            mode = %self.processor.mode(),
            "Monitor started"
        );

        let ticks = ticker.run(running, |now| match self.tick(now) {
            TickOutcome::Exhausted => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        });

        self.shutdown();

        let summary = RunSummary {
            ticks,
            sensor_errors: self.sensor_errors,
            spike_count: self.processor.spike_state().count,
        };
        tracing::info!(
            ticks = summary.ticks,
            sensor_errors = summary.sensor_errors,
            spikes = summary.spike_count,
            "Monitor stopped"
        );
        summary
    }

    /// Leaves the output line low.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.output.deassert() {
            tracing::error!(error = %e, "Failed to release output line on shutdown");
        }
    }
}
