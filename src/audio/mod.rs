//! Concrete audio collaborators.
//!
//! Beds are decoded from WAV or pre-rendered with Glicol, mixed by the
//! `Mixer` (which is also the playback transport), streamed through cpal,
//! and analyzed with a windowed FFT for the visuals.

mod analyzer;
mod beds;
mod mixer;
mod output;

// Re-export public types
pub use analyzer::{hann_window, Analyzer, FftAnalyzer};
pub use beds::{composition, prepare_bed, BedBuffer, OCEAN_COMPOSITION, RIVER_COMPOSITION};
pub use mixer::{Mixer, SharedMixer};
pub use output::{AudioOutput, OutputDevice};
