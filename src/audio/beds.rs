//! Bed loop buffers: decoded from WAV files or pre-rendered with Glicol.

use std::path::Path;

use glicol::Engine;
use tracing::{info, warn};

use crate::error::{LowtideError, Result};
use crate::params::audio_constants::BLOCK_SIZE;
use crate::session::Bed;

/// Slow filtered drone with a breathing amplitude
pub const RIVER_COMPOSITION: &str = r#"
~mod: sin 0.07 >> mul 300 >> add 450
~amp: sin 0.11 >> mul 0.05 >> add 0.15
o: saw 55 >> lpf ~mod 2.0 >> mul ~amp >> plate 0.2
"#;

/// Low swell with a wide filter sweep
pub const OCEAN_COMPOSITION: &str = r#"
~swell: sin 0.09 >> mul 700 >> add 900
~amp: sin 0.05 >> mul 0.06 >> add 0.1
o: saw 41.2 >> lpf ~swell 1.0 >> mul ~amp >> plate 0.3
"#;

/// Default composition for a bed
pub fn composition(bed: Bed) -> &'static str {
    match bed {
        Bed::River => RIVER_COMPOSITION,
        Bed::Ocean => OCEAN_COMPOSITION,
    }
}

/// Mono loop at a known sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct BedBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl BedBuffer {
    /// Decode a WAV file, mixing all channels down to mono
    pub fn load_wav(path: &Path) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1_i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect::<Vec<_>>();

        info!(
            "Loaded {} ({} Hz, {} ch, {:.1}s)",
            path.display(),
            spec.sample_rate,
            channels,
            samples.len() as f32 / spec.sample_rate.max(1) as f32
        );

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// Pre-render `secs` seconds of a Glicol composition
    pub fn synthesize(code: &str, sample_rate: u32, secs: f32) -> Result<Self> {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate as usize);
        engine.update_with_code(code);
        engine
            .update()
            .map_err(|e| LowtideError::Audio(format!("Glicol engine init failed: {:?}", e)))?;

        let total = (secs.max(0.0) * sample_rate as f32) as usize;
        let mut samples = Vec::with_capacity(total + BLOCK_SIZE);
        while samples.len() < total {
            let (buffers, _) = engine.next_block(vec![]);
            for i in 0..BLOCK_SIZE {
                samples.push(buffers[0][i]);
            }
        }
        samples.truncate(total);

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Linear resample to `target` Hz
    pub fn resampled(self, target: u32) -> Self {
        if self.sample_rate == target || self.sample_rate == 0 || self.samples.is_empty() {
            return Self {
                sample_rate: target,
                ..self
            };
        }
        warn!("Resampling bed from {} Hz to {} Hz", self.sample_rate, target);

        let ratio = self.sample_rate as f64 / target as f64;
        let len = ((self.samples.len() as f64) / ratio).floor() as usize;
        let last = self.samples.len() - 1;
        let samples = (0..len)
            .map(|i| {
                let pos = i as f64 * ratio;
                let idx = (pos.floor() as usize).min(last);
                let next = (idx + 1).min(last);
                let frac = (pos - idx as f64) as f32;
                self.samples[idx] + (self.samples[next] - self.samples[idx]) * frac
            })
            .collect();

        Self {
            samples,
            sample_rate: target,
        }
    }
}

/// Load a bed from `path` if given, otherwise synthesize it
///
/// Synthesis failures degrade to a silent loop.
pub fn prepare_bed(
    bed: Bed,
    path: Option<&Path>,
    sample_rate: u32,
    secs: f32,
) -> Result<BedBuffer> {
    match path {
        Some(path) => Ok(BedBuffer::load_wav(path)?.resampled(sample_rate)),
        None => match BedBuffer::synthesize(composition(bed), sample_rate, secs) {
            Ok(buffer) => {
                info!("Synthesized {:?} bed ({:.0}s)", bed, secs);
                Ok(buffer)
            }
            Err(e) => {
                warn!("{:?} bed synthesis failed, using silence: {}", bed, e);
                Ok(BedBuffer {
                    samples: vec![0.0; sample_rate as usize],
                    sample_rate,
                })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_wav(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lowtide_{}_{}.wav", name, std::process::id()))
    }

    #[test]
    fn test_load_wav_mixes_to_mono() {
        let path = temp_wav("stereo");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            writer.write_sample(16384_i16).unwrap();
            writer.write_sample(0_i16).unwrap();
        }
        writer.finalize().unwrap();

        let bed = BedBuffer::load_wav(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(bed.sample_rate, 22050);
        assert_eq!(bed.samples.len(), 100);
        assert!((bed.samples[0] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_missing_wav_is_an_error() {
        let result = BedBuffer::load_wav(Path::new("/nonexistent/river.wav"));
        assert!(result.is_err());
    }

    #[test]
    fn test_resample_halves_length() {
        let bed = BedBuffer {
            samples: (0..100).map(|i| i as f32).collect(),
            sample_rate: 48000,
        };
        let out = bed.resampled(24000);
        assert_eq!(out.sample_rate, 24000);
        assert_eq!(out.samples.len(), 50);
        assert_eq!(out.samples[10], 20.0);
    }
}
