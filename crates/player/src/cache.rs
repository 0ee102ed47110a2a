//! Decoded notification cache
//!
//! WAV files are decoded once to normalized mono f32 and kept for the
//! lifetime of the player, so repeated notifications skip the disk.
//! Entries are keyed by resolved path and never evicted.

use crate::PlayerError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cache of decoded notification sounds.
#[derive(Default)]
pub(crate) struct SampleCache {
    entries: Mutex<HashMap<PathBuf, Arc<[f32]>>>,
}

impl SampleCache {
    /// Fetch the decoded samples for `path`, decoding on first use.
    pub(crate) fn get_or_decode(&self, path: &Path) -> Result<Arc<[f32]>, PlayerError> {
        if let Some(samples) = self.entries.lock().get(path) {
            return Ok(Arc::clone(samples));
        }

        let samples: Arc<[f32]> = decode_wav(path)?.into();
        let mut entries = self.entries.lock();
        let entry = entries.entry(path.to_path_buf()).or_insert(samples);
        Ok(Arc::clone(entry))
    }
}

/// Decode a WAV file to mono f32 samples normalized to [-1.0, 1.0]
fn decode_wav(path: &Path) -> Result<Vec<f32>, PlayerError> {
    use hound::WavReader;

    let reader = WavReader::open(path)
        .map_err(|e| PlayerError::Decode(format!("failed to open {}: {}", path.display(), e)))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .filter_map(Result::ok)
            .collect(),
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .filter_map(Result::ok)
                .map(|s| s as f32 / max_val)
                .collect()
        }
    };

    // If multi-channel, convert to mono by averaging channels
    let channels = spec.channels as usize;
    let samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    } else {
        samples
    };

    tracing::debug!(
        "Decoded notification audio: {} samples at {} Hz",
        samples.len(),
        spec.sample_rate
    );

    Ok(samples)
}
