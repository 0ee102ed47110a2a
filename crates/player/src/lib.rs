//! Notification WAV playback
//!
//! Plays short WAV notification sounds into a realtime room by publishing
//! a dedicated audio track and pushing fixed-size PCM frames at the
//! playout cadence. Decoded files are cached for the player's lifetime.

mod cache;
mod playback;

pub use playback::{
    WavPlayer, CHUNK_SAMPLES, DEFAULT_VOLUME, PACING_FACTOR, SAMPLE_RATE, TRACK_NAME,
    TRACK_SETTLE_DELAY,
};

use samvad_core::TransportError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by notification playback.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The notification file does not exist
    #[error("WAV file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file exists but could not be decoded as WAV
    #[error("failed to decode WAV: {0}")]
    Decode(String),

    /// The transport rejected a publish, capture, or unpublish
    #[error("transport error during playback: {0}")]
    Transport(#[from] TransportError),
}
