//! Matching layers, tried in priority order by the resolver.

mod classifier;
mod diagnosis;
mod fuzzy;
mod rules;
mod template;

pub use classifier::{Classification, ClassifierLayer, IntentClassifier};
pub use diagnosis::DiagnosisMatcher;
pub use fuzzy::{FuzzyMatcher, LinearPhraseIndex, PhraseIndex, ScoredPhrase};
pub use rules::RuleFallback;
pub use template::TemplateMatcher;

use nl_protocol::{LayerKind, MatchResult, Platform};

/// A single matching strategy. Implementations score an utterance
/// against what they know and return their best candidate, or `None`
/// when they have nothing to offer. Threshold enforcement happens in
/// the resolver, not here.
pub trait MatchEngine: Send + Sync {
    fn find(&self, utterance: &str, platform: Platform) -> Option<MatchResult>;

    fn kind(&self) -> LayerKind;
}
