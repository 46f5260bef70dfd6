//! Real-time output through the default cpal device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use super::mixer::SharedMixer;
use crate::error::{LowtideError, Result};

/// Default output device and its preferred stream config
pub struct OutputDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    pub fn open_default() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| LowtideError::Audio("No audio output device found".to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| LowtideError::Audio(format!("Failed to get audio config: {}", e)))?;

        info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0,
            config.channels()
        );

        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    /// Start streaming the mixer; mono output is copied to every channel
    pub fn start(self, mixer: SharedMixer) -> Result<AudioOutput> {
        let channels = self.config.channels().max(1) as usize;
        let config = self.config.config();
        let mut mono = Vec::<f32>::new();

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels;
                    mono.resize(frames, 0.0);
                    mixer.lock().render(&mut mono);

                    for (frame, &sample) in data.chunks_mut(channels).zip(&mono) {
                        frame.fill(sample);
                    }
                },
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| LowtideError::Audio(format!("Failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| LowtideError::Audio(format!("Failed to start audio stream: {}", e)))?;

        Ok(AudioOutput { _stream: stream })
    }
}

/// Running output stream (kept alive while held)
pub struct AudioOutput {
    _stream: cpal::Stream,
}
