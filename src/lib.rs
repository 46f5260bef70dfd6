//! Low Tide library - audio-reactive tide simulation
//!
//! The core (`signal`, `flow`, `tide`, `overlay`, `session`, `scene`) is
//! headless and draws through the `canvas::Canvas` trait. `audio` and
//! `rendering` provide the concrete sound and window collaborators.

pub mod audio;
pub mod canvas;
pub mod cli;
pub mod color;
pub mod error;
pub mod flow;
pub mod logging;
pub mod noise;
pub mod overlay;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod session;
pub mod signal;
pub mod tide;

pub use error::{LowtideError, Result};
pub use scene::{FrameInput, Scene};
