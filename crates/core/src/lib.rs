//! Core traits and types for the turn gating system
//!
//! This crate provides foundational types used by the player and gate crates:
//! - Audio frame types for PCM pushed into the room
//! - Conversation record types
//! - Capability traits for the realtime transport (room, session, speech)
//! - Transport error type

pub mod audio;
pub mod conversation;
pub mod traits;

// Re-exports from modules
pub use audio::{AudioFrame, Channels, PCM16_FULL_SCALE};
pub use conversation::{ChatLog, Turn, TurnRole};

// Trait re-exports
pub use traits::{
    AssistantSession, AudioRoom, AudioSource, PublishedTrack, SpeechHandle, TrackPublishOptions,
    TrackSource,
};

use thiserror::Error;

/// Errors surfaced by the realtime transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Track publication was rejected or timed out
    #[error("track publish failed: {0}")]
    Publish(String),

    /// Track removal was rejected or the track was unknown
    #[error("track unpublish failed: {0}")]
    Unpublish(String),

    /// A PCM frame could not be pushed into the track
    #[error("audio frame submission failed: {0}")]
    Capture(String),
}
