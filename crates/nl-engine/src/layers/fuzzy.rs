//! Typo-tolerant phrase matching over the catalog's known phrasings.
//!
//! Scores the utterance against every known phrasing with the
//! edit-distance similarity in [`crate::similarity`], keeps the best,
//! and floors the reported confidence at the acceptance threshold so a
//! borderline hit never ranks above a later layer's clean one.

use std::sync::Arc;

use nl_protocol::{Bindings, Intent, LayerKind, MatchResult, Platform};

use crate::catalog::CommandCatalog;
use crate::layers::MatchEngine;
use crate::similarity::phrase_similarity;

const FUZZY_FLOOR: f64 = 0.60;

/// One phrasing with its similarity to the utterance.
#[derive(Debug, Clone)]
pub struct ScoredPhrase {
    pub intent_id: String,
    pub phrase: String,
    pub score: f64,
}

/// Source of candidate phrasings. Split out so an indexed search can
/// replace the linear scan without the matcher changing.
pub trait PhraseIndex: Send + Sync {
    fn best_match(&self, utterance: &str, platform: Platform) -> Option<ScoredPhrase>;

    /// Top candidates regardless of score, best first.
    fn top_matches(&self, utterance: &str, platform: Platform, n: usize) -> Vec<ScoredPhrase>;
}

struct IndexedPhrase {
    intent_id: String,
    /// Phrasing with `{placeholder}` tokens removed, lowercased.
    stripped: String,
    platform: nl_protocol::PlatformTag,
}

/// Brute-force scan over catalog phrasings. The catalog is small
/// (dozens of intents), so a linear pass beats any index structure.
///
/// Immutable once built: seeding happens at construction time, and
/// `resolve` only ever reads from it.
pub struct LinearPhraseIndex {
    phrases: Vec<IndexedPhrase>,
}

impl LinearPhraseIndex {
    pub fn new(catalog: &CommandCatalog) -> Self {
        let phrases = catalog
            .iter()
            .flat_map(|intent| {
                intent.phrasings.iter().filter_map(|p| {
                    let stripped = strip_placeholders(p);
                    (!stripped.is_empty()).then(|| IndexedPhrase {
                        intent_id: intent.id.clone(),
                        stripped,
                        platform: intent.platform,
                    })
                })
            })
            .collect();
        Self { phrases }
    }

    /// Add an utterance that resolved to `intent` in a past session,
    /// so the next misspelling of it has a closer anchor. Seeding is
    /// construction-time only; requires exclusive access.
    pub fn seed(&mut self, utterance: &str, intent: &Intent) {
        let stripped = strip_placeholders(utterance);
        if stripped.is_empty() {
            return;
        }
        self.phrases.push(IndexedPhrase {
            intent_id: intent.id.clone(),
            stripped,
            platform: intent.platform,
        });
    }

    fn scan(&self, utterance: &str, platform: Platform) -> Vec<ScoredPhrase> {
        let needle = utterance.to_lowercase();
        let mut scored: Vec<ScoredPhrase> = self
            .phrases
            .iter()
            .filter(|p| p.platform.supports(platform))
            .map(|p| ScoredPhrase {
                intent_id: p.intent_id.clone(),
                phrase: p.stripped.clone(),
                score: phrase_similarity(&needle, &p.stripped),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }
}

impl PhraseIndex for LinearPhraseIndex {
    fn best_match(&self, utterance: &str, platform: Platform) -> Option<ScoredPhrase> {
        self.scan(utterance, platform).into_iter().next()
    }

    fn top_matches(&self, utterance: &str, platform: Platform, n: usize) -> Vec<ScoredPhrase> {
        let mut scored = self.scan(utterance, platform);
        scored.truncate(n);
        scored
    }
}

/// Drop `{...}` tokens and lowercase what remains.
fn strip_placeholders(phrasing: &str) -> String {
    phrasing
        .split_whitespace()
        .filter(|t| !t.starts_with('{'))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct FuzzyMatcher {
    index: Arc<LinearPhraseIndex>,
}

impl FuzzyMatcher {
    pub fn new(index: Arc<LinearPhraseIndex>) -> Self {
        Self { index }
    }
}

impl MatchEngine for FuzzyMatcher {
    fn find(&self, utterance: &str, platform: Platform) -> Option<MatchResult> {
        let best = self.index.best_match(utterance, platform)?;
        if best.score < FUZZY_FLOOR {
            tracing::debug!(phrase = %best.phrase, score = best.score, "below fuzzy floor");
            return None;
        }
        // Slot values are recovered downstream by the extractor; the
        // phrasing itself is too garbled to bind from.
        Some(MatchResult::intent(
            best.intent_id,
            Bindings::new(),
            best.score.clamp(FUZZY_FLOOR, 1.0),
            LayerKind::Fuzzy,
        ))
    }

    fn kind(&self) -> LayerKind {
        LayerKind::Fuzzy
    }
}
