//! Speech collaborator.

use tracing::info;

use crate::error::Result;
use crate::params::VoiceSettings;

/// Fire-and-forget speech output
///
/// `Ok` means the utterance started; callers treat it as the start signal
/// for side effects. An `Err` means the voice is unavailable and the effect
/// is skipped.
pub trait Voice {
    fn speak(&mut self, text: &str, settings: &VoiceSettings) -> Result<()>;
}

/// Voice that records utterances in the log instead of synthesizing audio
#[derive(Debug, Default)]
pub struct LogVoice {
    spoken: usize,
}

impl LogVoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utterances so far
    pub fn spoken(&self) -> usize {
        self.spoken
    }
}

impl Voice for LogVoice {
    fn speak(&mut self, text: &str, settings: &VoiceSettings) -> Result<()> {
        self.spoken += 1;
        info!(
            rate = settings.rate,
            pitch = settings.pitch,
            volume = settings.volume,
            "whisper: {}",
            text
        );
        Ok(())
    }
}
