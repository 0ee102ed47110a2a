//! Audio frame types shared by the playback engine and the transport

use std::sync::Arc;

/// PCM16 full-scale factor.
///
/// Used when normalizing decoded integer WAV samples to [-1.0, 1.0] and when
/// scaling float samples back to the 16-bit range for the transport.
pub const PCM16_FULL_SCALE: f32 = 32768.0;

/// Audio channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channels {
    #[default]
    Mono,
    Stereo,
}

impl Channels {
    pub fn count(&self) -> usize {
        match self {
            Channels::Mono => 1,
            Channels::Stereo => 2,
        }
    }
}

/// One atomic unit of playback submitted to an audio source.
///
/// Carries interleaved 16-bit signed PCM, the fixed wire format of the
/// outbound track (the transport performs no conversion).
#[derive(Clone)]
pub struct AudioFrame {
    /// Interleaved PCM16 samples
    pub samples: Arc<[i16]>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: Channels,
}

impl std::fmt::Debug for AudioFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFrame")
            .field("samples_len", &self.samples.len())
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .finish()
    }
}

impl AudioFrame {
    /// Create a new PCM16 frame
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: Channels) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
            channels,
        }
    }

    /// Samples per channel in this frame
    pub fn samples_per_channel(&self) -> usize {
        self.samples.len() / self.channels.count()
    }
}
