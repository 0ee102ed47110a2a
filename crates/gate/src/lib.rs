//! Wake-word turn gating
//!
//! Decides which user utterances open a turn for the assistant. Utterances
//! that only carry the wake word, or arrive while the gate is closed, are
//! suppressed and any reply work already in flight is unwound.

mod gate;

pub use gate::{GateConfig, HookOutcome, ListeningState, WakeWordGate, WAKE_ACK_TEXT};

use samvad_player::PlayerError;
use thiserror::Error;

/// Errors surfaced by the turn gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// The wake acknowledgement sound failed to play
    #[error("notification playback failed: {0}")]
    Notification(#[from] PlayerError),
}
