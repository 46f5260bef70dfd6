//! Interchangeable line generators.

use rand::{rngs::StdRng, Rng};
use tracing::warn;

use super::markov::{detokenize, MarkovLimits, MarkovModel};
use crate::params::{OverlayParams, TextStrategy};

/// Lines used when no corpus is available
pub const FALLBACK_LINES: [&str; 6] = [
    "The water keeps what the shore forgets.",
    "Silt settles where the current slows.",
    "Every ebb leaves a line in the sand.",
    "Somewhere upstream the rain is still falling.",
    "The tide returns, a little different each time.",
    "Reeds lean toward the sea and wait.",
];

/// Source of overlay text
pub trait LineGenerator {
    /// Next line, or `None` when nothing usable was produced this time
    fn next_line(&mut self, rng: &mut StdRng) -> Option<String>;

    fn name(&self) -> &'static str;
}

/// Uniform draw from the loaded corpus
pub struct CorpusSampler {
    lines: Vec<String>,
}

impl CorpusSampler {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

impl LineGenerator for CorpusSampler {
    fn next_line(&mut self, rng: &mut StdRng) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        Some(self.lines[rng.random_range(0..self.lines.len())].clone())
    }

    fn name(&self) -> &'static str {
        "corpus"
    }
}

/// Sentences sampled from an n-gram model of the corpus
pub struct MarkovGenerator {
    model: MarkovModel,
}

impl MarkovGenerator {
    pub fn new(model: MarkovModel) -> Self {
        Self { model }
    }
}

impl LineGenerator for MarkovGenerator {
    fn next_line(&mut self, rng: &mut StdRng) -> Option<String> {
        self.model
            .generate(rng)
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| detokenize(&tokens))
    }

    fn name(&self) -> &'static str {
        "markov"
    }
}

/// Built-in lines, drawn uniformly
pub struct FallbackList;

impl LineGenerator for FallbackList {
    fn next_line(&mut self, rng: &mut StdRng) -> Option<String> {
        Some(FALLBACK_LINES[rng.random_range(0..FALLBACK_LINES.len())].to_string())
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}

/// Build the configured generator, degrading to the fallback list when the
/// corpus cannot support it
pub fn build_generator(
    strategy: TextStrategy,
    corpus: &[String],
    params: &OverlayParams,
) -> Box<dyn LineGenerator> {
    let lines: Vec<String> = corpus
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.is_empty() && strategy != TextStrategy::Fallback {
        warn!("Corpus is empty, using built-in lines instead of {:?}", strategy);
        return Box::new(FallbackList);
    }

    match strategy {
        TextStrategy::Corpus => Box::new(CorpusSampler::new(lines)),
        TextStrategy::Markov => {
            let limits = MarkovLimits {
                min_tokens: params.markov_min_tokens,
                max_tokens: params.markov_max_tokens,
                attempts: params.markov_attempts,
            };
            let model = MarkovModel::train(&lines, params.markov_order, limits);
            if model.is_empty() {
                warn!(
                    "Corpus too short for an order-{} model, using built-in lines",
                    params.markov_order
                );
                Box::new(FallbackList)
            } else {
                Box::new(MarkovGenerator::new(model))
            }
        }
        TextStrategy::Fallback => Box::new(FallbackList),
    }
}
