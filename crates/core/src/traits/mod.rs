//! Core traits for the turn gating system
//!
//! All transport-facing components are reached through these traits to enable:
//! - Pluggable backends (swap the realtime SDK without code changes)
//! - Testing with mocks
//!
//! # Trait Hierarchy
//!
//! ```text
//! Room:
//!   - AudioRoom: publish and unpublish audio tracks
//!   - AudioSource: push PCM frames into a published track
//!   - PublishedTrack: handle to a live track
//!
//! Session:
//!   - AssistantSession: room access plus in-flight speech handles
//!   - SpeechHandle: drive one speech turn to a terminal state
//! ```

mod room;
mod session;
mod speech;

pub use room::{AudioRoom, AudioSource, PublishedTrack, TrackPublishOptions, TrackSource};
pub use session::AssistantSession;
pub use speech::SpeechHandle;
