//! Rendering and recording configuration.

use serde::Deserialize;

/// Rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Window title shown when no overlay line is alive
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            title: "Low Tide".to_string(),
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Milliseconds covered by one frame
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.fps as f64
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Path of a single numbered frame
    pub fn frame_path(&self, frame: usize) -> String {
        format!("{}/frame_{:05}.png", self.frames_dir(), frame)
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_count() {
        let config = RecordingConfig::new(1.01);
        assert_eq!(config.total_frames(), 61);
        assert_eq!(config.frame_path(7), "recording/frames/frame_00007.png");
    }
}
