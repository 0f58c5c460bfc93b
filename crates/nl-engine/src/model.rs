//! Multinomial naive-Bayes intent model loaded from a JSON artifact.
//!
//! The artifact is produced offline by a training script and ships the
//! fitted log-priors and per-class log-likelihoods directly, so scoring
//! here is a plain dot product in log space. No model file means the
//! resolver simply runs without this layer.

use std::path::Path;

use ahash::AHashMap;
use serde::Deserialize;

use crate::layers::{Classification, IntentClassifier};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model io: {0}")]
    Io(#[from] std::io::Error),
    #[error("model parse: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model shape: {0}")]
    Shape(String),
}

/// Fitted multinomial naive-Bayes over a bag-of-words vocabulary.
#[derive(Debug, Deserialize)]
pub struct NaiveBayesModel {
    /// Token to feature-column index.
    vocabulary: AHashMap<String, usize>,
    /// Intent ids, one per class row.
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// One row of log P(token | class) per class, vocabulary-ordered.
    feature_log_prob: Vec<Vec<f64>>,
}

impl NaiveBayesModel {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&contents)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.classes.len() != self.class_log_prior.len() {
            return Err(ModelError::Shape(format!(
                "{} classes but {} priors",
                self.classes.len(),
                self.class_log_prior.len()
            )));
        }
        if self.classes.len() != self.feature_log_prob.len() {
            return Err(ModelError::Shape(format!(
                "{} classes but {} likelihood rows",
                self.classes.len(),
                self.feature_log_prob.len()
            )));
        }
        let vocab = self.vocabulary.len();
        if let Some(row) = self.feature_log_prob.iter().find(|r| r.len() != vocab) {
            return Err(ModelError::Shape(format!(
                "likelihood row has {} columns, vocabulary has {vocab}",
                row.len()
            )));
        }
        if let Some((token, &col)) = self.vocabulary.iter().find(|&(_, &c)| c >= vocab) {
            return Err(ModelError::Shape(format!(
                "token {token:?} maps to column {col}, vocabulary has {vocab}"
            )));
        }
        Ok(())
    }

    /// Score an utterance against every class and return the softmax
    /// probability of the winner. Returns `None` when no token of the
    /// utterance appears in the vocabulary, since the priors alone
    /// carry no evidence about the input.
    pub fn predict(&self, utterance: &str) -> Option<Classification> {
        let columns: Vec<usize> = utterance
            .to_lowercase()
            .split_whitespace()
            .filter_map(|token| self.vocabulary.get(token).copied())
            .collect();
        if columns.is_empty() {
            return None;
        }

        let log_scores: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| prior + columns.iter().map(|&c| row[c]).sum::<f64>())
            .collect();

        // Softmax via log-sum-exp for a calibrated winner probability.
        let max = log_scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let denom: f64 = log_scores.iter().map(|s| (s - max).exp()).sum();

        let (best, score) = log_scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))?;

        Some(Classification {
            intent_id: self.classes[best].clone(),
            probability: (score - max).exp() / denom,
        })
    }
}

impl IntentClassifier for NaiveBayesModel {
    fn classify(&self, utterance: &str) -> Option<Classification> {
        self.predict(utterance)
    }

    fn name(&self) -> &str {
        "naive-bayes"
    }
}
