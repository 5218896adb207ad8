use std::time::{Duration, Instant};

use super::OutputAction;

pub struct SpikeHoldConfig {
    pub hold_duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpikeState {
    pub active: bool,
    pub started_at: Option<Instant>,
    pub count: u64,
}

/// Keeps the output line high for `hold_duration` after the most recent spike.
pub struct SpikeHold {
    config: SpikeHoldConfig,
    state: SpikeState,
}

impl SpikeHold {
    pub fn new(config: SpikeHoldConfig) -> Self {
        Self {
            config,
            state: SpikeState::default(),
        }
    }

    pub fn state(&self) -> SpikeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn count(&self) -> u64 {
        self.state.count
    }

    /// Runs once per tick: release first, then the trigger.
    pub fn evaluate(&mut self, triggered: bool, now: Instant) -> OutputAction {
        let was_active = self.state.active;

        // Release check runs every tick so the line drops without a new trigger
        if let Some(started_at) = self.state.started_at {
            if self.state.active
                && now.saturating_duration_since(started_at) >= self.config.hold_duration
            {
                self.state.active = false;
            }
        }

        if triggered {
            self.state.count += 1;
            self.state.started_at = Some(now);
            self.state.active = true;
        }

        match (was_active, self.state.active) {
            (false, true) => OutputAction::Assert,
            (true, false) => OutputAction::Deassert,
            _ => OutputAction::Hold,
        }
    }
}
