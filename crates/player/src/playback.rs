//! WAV playback onto a published room track

use crate::cache::SampleCache;
use crate::PlayerError;
use parking_lot::Mutex;
use samvad_core::{
    AudioFrame, AudioRoom, AudioSource, Channels, PublishedTrack, TrackPublishOptions, TrackSource,
    TransportError, PCM16_FULL_SCALE,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Default samples per captured frame (200 ms at 48 kHz)
pub const CHUNK_SAMPLES: usize = 9600;

/// Sample rate the track is published at, in Hz
pub const SAMPLE_RATE: u32 = 48_000;

/// Name and stream label of the published track
pub const TRACK_NAME: &str = "wav_audio";

/// Playback gain applied when the caller does not choose one
pub const DEFAULT_VOLUME: f32 = 0.3;

/// Wait after publishing so subscribers can attach before audio starts
pub const TRACK_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Fraction of each frame's real duration slept between frames. Submitting
/// slightly ahead of real time keeps the transport's buffer from draining.
pub const PACING_FACTOR: f32 = 0.98;

/// Plays WAV notification sounds into a room on a dedicated audio track.
///
/// The track is published lazily on the first playback and stays up until
/// [`cleanup`](WavPlayer::cleanup). Decoded files are cached, so repeated
/// notifications skip the disk and the decode. Callers run one playback
/// at a time.
pub struct WavPlayer {
    chunk_samples: usize,
    track: Mutex<Option<Arc<dyn PublishedTrack>>>,
    source: Mutex<Option<Arc<dyn AudioSource>>>,
    cache: SampleCache,
}

impl WavPlayer {
    /// Create a player with the default frame length and nothing published.
    pub fn new() -> Self {
        Self::with_chunk_samples(CHUNK_SAMPLES)
    }

    /// Create a player that submits frames of `chunk_samples` samples.
    ///
    /// The frame length is fixed for the player's lifetime.
    pub fn with_chunk_samples(chunk_samples: usize) -> Self {
        Self {
            chunk_samples,
            track: Mutex::new(None),
            source: Mutex::new(None),
            cache: SampleCache::default(),
        }
    }

    /// Play one WAV file into the room.
    ///
    /// Publishes the track on first use, then pushes fixed-size PCM frames
    /// at the playout cadence. When playback fails after the file check,
    /// the track is torn down before the error propagates, so the next
    /// call starts from a fresh publish.
    ///
    /// # Arguments
    /// * `path` - WAV file to play
    /// * `room` - Room to publish into
    /// * `volume` - Linear gain, typically [`DEFAULT_VOLUME`]
    pub async fn play_once(
        &self,
        path: &Path,
        room: &dyn AudioRoom,
        volume: f32,
    ) -> Result<(), PlayerError> {
        let resolved = path
            .canonicalize()
            .map_err(|_| PlayerError::FileNotFound(path.to_path_buf()))?;

        match self.stream_file(&resolved, room, volume).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if let Err(cleanup_err) = self.cleanup(room).await {
                    tracing::warn!("Cleanup after failed playback also failed: {}", cleanup_err);
                }
                Err(e)
            }
        }
    }

    /// Tear down the published track and drop the audio source.
    ///
    /// Safe to call when nothing is published. The player stays usable;
    /// the next playback publishes a fresh track.
    pub async fn cleanup(&self, room: &dyn AudioRoom) -> Result<(), PlayerError> {
        let track = self.track.lock().take();
        self.source.lock().take();

        if let Some(track) = track {
            let sid = track.sid();
            room.unpublish_track(&sid).await?;
            tracing::info!("Unpublished notification track {}", sid);
        }

        Ok(())
    }

    /// Publish the audio track if it is not already up.
    async fn initialize(&self, room: &dyn AudioRoom) -> Result<(), PlayerError> {
        if self.track.lock().is_some() {
            return Ok(());
        }

        let options = TrackPublishOptions {
            track_name: TRACK_NAME.to_string(),
            stream: TRACK_NAME.to_string(),
            source: TrackSource::Microphone,
            sample_rate: SAMPLE_RATE,
            channels: Channels::Mono,
        };
        let (track, source) = room.publish_track(options).await?;
        tracing::info!("Published notification track {}", track.sid());

        *self.track.lock() = Some(track);
        *self.source.lock() = Some(source);

        sleep(TRACK_SETTLE_DELAY).await;
        Ok(())
    }

    async fn stream_file(
        &self,
        path: &Path,
        room: &dyn AudioRoom,
        volume: f32,
    ) -> Result<(), PlayerError> {
        self.initialize(room).await?;

        let samples = self.cache.get_or_decode(path)?;
        let source = self
            .source
            .lock()
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| TransportError::Capture("audio source not initialized".to_string()))?;

        tracing::info!(
            "Playing notification {} ({} samples)",
            path.display(),
            samples.len()
        );

        let pacing = self.frame_pacing();
        for chunk in samples.chunks(self.chunk_samples) {
            // Final chunk is zero-padded to a full frame
            let mut pcm = vec![0i16; self.chunk_samples];
            for (out, sample) in pcm.iter_mut().zip(chunk) {
                // tanh soft-clips peaks before the gain stage
                *out = (sample.tanh() * PCM16_FULL_SCALE * volume).round() as i16;
            }

            let frame = AudioFrame::new(pcm, SAMPLE_RATE, Channels::Mono);
            source.capture_frame(&frame).await?;
            sleep(pacing).await;
        }

        Ok(())
    }

    fn frame_pacing(&self) -> Duration {
        let frame_secs = self.chunk_samples as f32 / SAMPLE_RATE as f32;
        Duration::from_secs_f32(frame_secs * PACING_FACTOR)
    }
}

impl Default for WavPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[derive(Default)]
    struct MockSource {
        frames: Mutex<Vec<Vec<i16>>>,
        fail: AtomicBool,
    }

    #[async_trait]
    impl AudioSource for MockSource {
        async fn capture_frame(&self, frame: &AudioFrame) -> Result<(), TransportError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(TransportError::Capture("mock capture failure".to_string()));
            }
            self.frames.lock().push(frame.samples.to_vec());
            Ok(())
        }
    }

    struct MockTrack;

    impl PublishedTrack for MockTrack {
        fn sid(&self) -> String {
            "TR_mock".to_string()
        }

        fn name(&self) -> String {
            TRACK_NAME.to_string()
        }
    }

    #[derive(Default)]
    struct MockRoom {
        source: Arc<MockSource>,
        publishes: AtomicUsize,
        unpublishes: AtomicUsize,
    }

    #[async_trait]
    impl AudioRoom for MockRoom {
        async fn publish_track(
            &self,
            options: TrackPublishOptions,
        ) -> Result<(Arc<dyn PublishedTrack>, Arc<dyn AudioSource>), TransportError> {
            assert_eq!(options.track_name, TRACK_NAME);
            assert_eq!(options.sample_rate, SAMPLE_RATE);
            assert_eq!(options.channels, Channels::Mono);
            self.publishes.fetch_add(1, Ordering::SeqCst);
            let source: Arc<dyn AudioSource> = self.source.clone();
            Ok((Arc::new(MockTrack), source))
        }

        async fn unpublish_track(&self, _sid: &str) -> Result<(), TransportError> {
            self.unpublishes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn write_constant_wav(path: &Path, channels: u16, frames: usize, value: i16) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..frames {
            for _ in 0..channels {
                writer.write_sample(value).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    fn expected_pcm(sample: i16, volume: f32) -> i16 {
        let normalized = sample as f32 / 32768.0;
        (normalized.tanh() * PCM16_FULL_SCALE * volume).round() as i16
    }

    #[test]
    fn test_playback_constants() {
        assert_eq!(CHUNK_SAMPLES, 9600);
        assert_eq!(SAMPLE_RATE, 48_000);
        assert_eq!(DEFAULT_VOLUME, 0.3);
        assert_eq!(TRACK_SETTLE_DELAY, Duration::from_millis(500));
        assert_eq!(PACING_FACTOR, 0.98);
    }

    #[tokio::test]
    async fn test_missing_file_skips_publish() {
        let room = MockRoom::default();
        let player = WavPlayer::new();

        let err = player
            .play_once(Path::new("/no/such/notification.wav"), &room, DEFAULT_VOLUME)
            .await
            .unwrap_err();

        assert!(matches!(err, PlayerError::FileNotFound(_)));
        assert!(err.to_string().contains("WAV file not found"));
        assert_eq!(room.publishes.load(Ordering::SeqCst), 0);
        assert_eq!(room.unpublishes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_playback_chunks_and_pads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ding.wav");
        write_constant_wav(&path, 1, 12_000, 8192);

        let room = MockRoom::default();
        let player = WavPlayer::new();
        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();

        let frames = room.source.frames.lock();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), CHUNK_SAMPLES);
        assert_eq!(frames[1].len(), CHUNK_SAMPLES);

        let expected = expected_pcm(8192, DEFAULT_VOLUME);
        assert_eq!(frames[0][0], expected);
        assert_eq!(frames[1][2399], expected);
        assert!(frames[1][2400..].iter().all(|&s| s == 0));
    }

    #[tokio::test]
    async fn test_stereo_source_downmixes_before_chunking() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_constant_wav(&path, 2, 10_000, 2000);

        let room = MockRoom::default();
        let player = WavPlayer::new();
        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();

        // 10000 stereo frames downmix to 10000 mono samples, two chunks
        let frames = room.source.frames.lock();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0][0], expected_pcm(2000, DEFAULT_VOLUME));
        assert!(frames[1][400..].iter().all(|&s| s == 0));
    }

    #[tokio::test]
    async fn test_custom_chunk_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ding.wav");
        write_constant_wav(&path, 1, 10_000, 4096);

        let room = MockRoom::default();
        let player = WavPlayer::with_chunk_samples(4800);
        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();

        let frames = room.source.frames.lock();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.len() == 4800));
        assert!(frames[2][400..].iter().all(|&s| s == 0));
    }

    #[tokio::test]
    async fn test_track_published_once_across_playbacks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ding.wav");
        write_constant_wav(&path, 1, 100, 4096);

        let room = MockRoom::default();
        let player = WavPlayer::new();
        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();
        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();

        assert_eq!(room.publishes.load(Ordering::SeqCst), 1);
        assert_eq!(room.source.frames.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent_and_player_reusable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ding.wav");
        write_constant_wav(&path, 1, 100, 4096);

        let room = MockRoom::default();
        let player = WavPlayer::new();
        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();

        player.cleanup(&room).await.unwrap();
        player.cleanup(&room).await.unwrap();
        assert_eq!(room.unpublishes.load(Ordering::SeqCst), 1);

        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();
        assert_eq!(room.publishes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_capture_failure_tears_down_track() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ding.wav");
        write_constant_wav(&path, 1, 100, 4096);

        let room = MockRoom::default();
        room.source.fail.store(true, Ordering::SeqCst);

        let player = WavPlayer::new();
        let err = player
            .play_once(&path, &room, DEFAULT_VOLUME)
            .await
            .unwrap_err();

        assert!(matches!(err, PlayerError::Transport(_)));
        assert_eq!(room.unpublishes.load(Ordering::SeqCst), 1);

        // Failure released the track, so the next playback republishes
        room.source.fail.store(false, Ordering::SeqCst);
        player.play_once(&path, &room, DEFAULT_VOLUME).await.unwrap();
        assert_eq!(room.publishes.load(Ordering::SeqCst), 2);
    }
}
