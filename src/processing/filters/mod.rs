pub mod low_pass;

/// Single-channel streaming filter fed one sample per tick.
pub trait FilterInstance: Send {
    fn filter_sample(&mut self, sample: f64) -> f64;

    /// Most recent output, `None` until the first sample arrives.
    fn last_output(&self) -> Option<f64>;

    fn reset(&mut self);
}
