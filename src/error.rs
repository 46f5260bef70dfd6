//! Crate-wide error type.
//!
//! Only setup paths return errors. Per-frame work degrades instead of failing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LowtideError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("audio error: {0}")]
    Audio(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("voice unavailable: {0}")]
    Voice(String),
}

pub type Result<T> = std::result::Result<T, LowtideError>;
