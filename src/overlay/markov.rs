//! Word-level n-gram sentence model.
//!
//! The corpus is tokenized into words and punctuation, split into sentences
//! at terminal punctuation, and every window of `order - 1` tokens records
//! which token followed it (or that the sentence ended). Generation walks
//! the table from a random sentence opening until it reaches an end marker.
//! Cost is bounded: at most `attempts` walks of at most `max_tokens` steps.

use std::collections::HashMap;
use std::sync::LazyLock;

use rand::{rngs::StdRng, Rng};
use regex::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w']+|[.!?,;:]").expect("token pattern is valid"));

/// Split text into word and punctuation tokens
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Join tokens with spaces, attaching punctuation to the preceding word
pub fn detokenize(tokens: &[String]) -> String {
    let mut out = String::new();
    for token in tokens {
        if !out.is_empty() && !is_punctuation(token) {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

fn is_punctuation(token: &str) -> bool {
    matches!(token, "." | "!" | "?" | "," | ";" | ":")
}

fn is_terminal(token: &str) -> bool {
    matches!(token, "." | "!" | "?")
}

/// Generation limits
#[derive(Debug, Clone, Copy)]
pub struct MarkovLimits {
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub attempts: usize,
}

/// Trained transition table
#[derive(Debug, Clone)]
pub struct MarkovModel {
    context: usize,
    /// `None` marks a sentence end
    transitions: HashMap<Vec<String>, Vec<Option<String>>>,
    starts: Vec<Vec<String>>,
    limits: MarkovLimits,
}

impl MarkovModel {
    /// Train an order-`order` model on every line of `corpus`
    ///
    /// Lines are joined before tokenizing, so sentences may span lines.
    pub fn train(corpus: &[String], order: usize, limits: MarkovLimits) -> Self {
        let context = order.saturating_sub(1).max(1);
        let tokens = tokenize(&corpus.join(" "));

        let mut model = Self {
            context,
            transitions: HashMap::new(),
            starts: Vec::new(),
            limits,
        };

        for sentence in tokens.split_inclusive(|t| is_terminal(t)) {
            model.add_sentence(sentence);
        }
        model
    }

    fn add_sentence(&mut self, sentence: &[String]) {
        if sentence.len() <= self.context {
            return;
        }
        self.starts.push(sentence[..self.context].to_vec());

        for (i, window) in sentence.windows(self.context).enumerate() {
            let next = sentence.get(i + self.context).cloned();
            self.transitions
                .entry(window.to_vec())
                .or_default()
                .push(next);
        }
    }

    /// True when nothing can be generated
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Sample one sentence, or `None` if every attempt ran too short or too long
    pub fn generate(&self, rng: &mut StdRng) -> Option<Vec<String>> {
        if self.starts.is_empty() {
            return None;
        }

        for _ in 0..self.limits.attempts {
            let start = &self.starts[rng.random_range(0..self.starts.len())];
            if let Some(tokens) = self.walk(start, rng) {
                let words = tokens.iter().filter(|t| !is_punctuation(t)).count();
                if words >= self.limits.min_tokens {
                    return Some(tokens);
                }
            }
        }
        None
    }

    fn walk(&self, start: &[String], rng: &mut StdRng) -> Option<Vec<String>> {
        let mut tokens = start.to_vec();

        while tokens.len() <= self.limits.max_tokens {
            let key = &tokens[tokens.len() - self.context..];
            let choices = self.transitions.get(key)?;
            match &choices[rng.random_range(0..choices.len())] {
                Some(token) => tokens.push(token.clone()),
                None => return Some(tokens),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn limits() -> MarkovLimits {
        MarkovLimits {
            min_tokens: 3,
            max_tokens: 30,
            attempts: 10,
        }
    }

    #[test]
    fn test_tokenize_and_detokenize() {
        let tokens = tokenize("The river's edge, slow; then gone.");
        assert_eq!(
            tokens,
            vec!["The", "river's", "edge", ",", "slow", ";", "then", "gone", "."]
        );
        assert_eq!(detokenize(&tokens), "The river's edge, slow; then gone.");
    }

    #[test]
    fn test_single_sentence_reproduces_itself() {
        let corpus = vec!["the tide pulls silt into the dark.".to_string()];
        let model = MarkovModel::train(&corpus, 3, limits());
        let mut rng = StdRng::seed_from_u64(4);

        let tokens = model.generate(&mut rng).unwrap();
        assert_eq!(detokenize(&tokens), corpus[0]);
    }

    #[test]
    fn test_generated_bigrams_exist_in_corpus() {
        let corpus: Vec<String> = [
            "the water carries the light down to the sea.",
            "the light settles in the reeds at dusk.",
            "the reeds remember the water.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let model = MarkovModel::train(&corpus, 2, limits());
        let source = tokenize(&corpus.join(" "));
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..30 {
            let Some(tokens) = model.generate(&mut rng) else {
                continue;
            };
            assert!(tokens.len() <= limits().max_tokens);
            assert_eq!(tokens.last().map(String::as_str), Some("."));
            for pair in tokens.windows(2) {
                assert!(source.windows(2).any(|w| w == pair), "{pair:?}");
            }
        }
    }

    #[test]
    fn test_empty_or_tiny_corpus_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(MarkovModel::train(&[], 3, limits()).generate(&mut rng).is_none());

        let tiny = vec!["ebb.".to_string()];
        let model = MarkovModel::train(&tiny, 3, limits());
        assert!(model.is_empty());
        assert!(model.generate(&mut rng).is_none());
    }

    #[test]
    fn test_short_sentences_rejected() {
        let corpus = vec!["low tide now.".to_string()];
        let model = MarkovModel::train(
            &corpus,
            2,
            MarkovLimits {
                min_tokens: 5,
                ..limits()
            },
        );
        assert!(model.generate(&mut StdRng::seed_from_u64(7)).is_none());
    }
}
