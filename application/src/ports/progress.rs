//! Turn progress port
//!
//! Reports turn activity while the engine waits on the provider.

/// Callback for progress updates during turn execution
///
/// Implementations live in the presentation layer (spinner, status line).
pub trait TurnObserver: Send + Sync {
    /// Called right before the provider is asked for a contribution.
    fn on_turn_start(&self, speaker: &str, turn: u64);

    /// Called when the turn finished, successfully or not.
    fn on_turn_complete(&self, speaker: &str, turn: u64, success: bool);

    /// Called before auxiliary provider calls (selection, compliance, summary).
    fn on_auxiliary_call(&self, _purpose: &str) {}

    /// Called when an auxiliary call returns.
    fn on_auxiliary_complete(&self, _purpose: &str) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoTurnObserver;

impl TurnObserver for NoTurnObserver {
    fn on_turn_start(&self, _speaker: &str, _turn: u64) {}
    fn on_turn_complete(&self, _speaker: &str, _turn: u64, _success: bool) {}
}
