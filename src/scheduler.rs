use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Longest tick period accepted; longer periods are clamped to it.
pub const MAX_TICK_PERIOD: Duration = Duration::from_secs(3600);

/// Fixed-period tick source. Ticks never overlap; a tick that starts late
/// pushes the schedule forward instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.min(MAX_TICK_PERIOD),
        }
    }

    pub fn from_millis(period_ms: u64) -> Self {
        Self::new(Duration::from_millis(period_ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Deadline following `deadline`, moved up to `now` once already missed.
    fn next_deadline(&self, deadline: Instant, now: Instant) -> Instant {
        match deadline.checked_add(self.period) {
            Some(next) if next > now => next,
            _ => now,
        }
    }

    /// Calls `tick` once per period until `running` is cleared or the
    /// callback breaks. Returns the number of ticks run.
    pub fn run<F>(&self, running: &Arc<AtomicBool>, mut tick: F) -> u64
    where
        F: FnMut(Instant) -> ControlFlow<()>,
    {
        let mut ticks = 0;
        let mut deadline = Instant::now();

        while running.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now < deadline {
                thread::sleep(deadline - now);
                continue;
            }

            ticks += 1;
            if tick(now).is_break() {
                break;
            }

            let after = Instant::now();
            if after.duration_since(now) > self.period {
                tracing::debug!(
                    elapsed_ms = after.duration_since(now).as_millis() as u64,
                    "Tick overran its period"
                );
            }
            deadline = self.next_deadline(deadline, after);
        }

        ticks
    }
}
