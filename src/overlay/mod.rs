//! Text/speech overlay.
//!
//! A scheduler decides when a line is due, a `LineGenerator` decides what it
//! says, and each `OverlayLine` runs its own fade lifecycle. Once the session
//! has started, spawning a line also asks the `Voice` to speak it, and a
//! successful start spawns a ripple.

mod controller;
mod line;
mod markov;
mod ripple;
mod scheduler;
mod text;
mod voice;

pub use controller::OverlayController;
pub use line::{LineState, OverlayLine};
pub use markov::{detokenize, tokenize, MarkovLimits, MarkovModel};
pub use ripple::Ripple;
pub use scheduler::TriggerScheduler;
pub use text::{
    build_generator, CorpusSampler, FallbackList, LineGenerator, MarkovGenerator, FALLBACK_LINES,
};
pub use voice::{LogVoice, Voice};
