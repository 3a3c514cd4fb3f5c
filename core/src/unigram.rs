//! Scored phrase candidate.

use serde::{Deserialize, Serialize};

/// A phrase value for some lookup key, with its language-model score.
///
/// Scores are log probabilities in the shipped data; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unigram {
    pub value: String,
    pub score: f64,
}

impl Unigram {
    pub fn new<T: Into<String>>(value: T, score: f64) -> Self {
        Unigram {
            value: value.into(),
            score,
        }
    }
}
