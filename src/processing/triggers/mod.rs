pub mod hold;

/// What the output line should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    /// Line goes high (Idle -> Active)
    Assert,
    /// Line goes low (hold elapsed without re-trigger)
    Deassert,
    /// Line keeps its current level
    Hold,
}
