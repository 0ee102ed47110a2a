//! Room audio publishing traits
//!
//! Abstracts the realtime transport just enough for the notification
//! player: publish a named audio track, push PCM frames into it, take
//! it down again. Adapters map these onto the concrete SDK.

use crate::audio::{AudioFrame, Channels};
use crate::TransportError;
use async_trait::async_trait;
use std::sync::Arc;

/// Which capture device a published track claims to represent.
///
/// Mirrors the transport SDK's track source enum. Audio publishers use
/// `Microphone` so their frames mix into the room like participant speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackSource {
    /// Microphone capture
    #[default]
    Microphone,
    /// Camera video
    Camera,
    /// Screen share
    ScreenShare,
}

/// Options for publishing an audio track into a room.
#[derive(Debug, Clone)]
pub struct TrackPublishOptions {
    /// Track name shown to other participants
    pub track_name: String,
    /// Stream grouping label
    pub stream: String,
    /// Source the track claims to represent
    pub source: TrackSource,
    /// Sample rate of the frames that will be captured, in Hz
    pub sample_rate: u32,
    /// Channel layout of the frames that will be captured
    pub channels: Channels,
}

/// Handle to a track that has been published into a room.
pub trait PublishedTrack: Send + Sync {
    /// Server-assigned track sid, used to unpublish
    fn sid(&self) -> String;

    /// Track name as published
    fn name(&self) -> String;
}

/// Sink for PCM frames backing a published audio track.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Push one frame of PCM into the track
    ///
    /// # Arguments
    /// * `frame` - Frame matching the sample rate and channel layout the
    ///   track was published with
    async fn capture_frame(&self, frame: &AudioFrame) -> Result<(), TransportError>;
}

/// A realtime room the assistant can publish audio into.
///
/// Implementations:
/// - Transport adapters wrap the realtime SDK room object
/// - Tests use in-memory mocks that record captured frames
///
/// # Example
///
/// ```ignore
/// let options = TrackPublishOptions {
///     track_name: "wav_audio".to_string(),
///     stream: "wav_audio".to_string(),
///     source: TrackSource::Microphone,
///     sample_rate: 48_000,
///     channels: Channels::Mono,
/// };
/// let (track, source) = room.publish_track(options).await?;
/// source.capture_frame(&frame).await?;
/// room.unpublish_track(&track.sid()).await?;
/// ```
#[async_trait]
pub trait AudioRoom: Send + Sync {
    /// Publish an audio track and return its handle plus the frame sink
    ///
    /// # Arguments
    /// * `options` - Track name, stream label, source, and audio format
    ///
    /// # Returns
    /// The published track handle and the source to capture frames into
    async fn publish_track(
        &self,
        options: TrackPublishOptions,
    ) -> Result<(Arc<dyn PublishedTrack>, Arc<dyn AudioSource>), TransportError>;

    /// Remove a previously published track
    ///
    /// # Arguments
    /// * `sid` - Server-assigned sid of the track to remove
    async fn unpublish_track(&self, sid: &str) -> Result<(), TransportError>;
}
