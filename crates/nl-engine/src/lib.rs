//! Layered intent-resolution engine for natural-language shell commands.
//!
//! Turns a free-form utterance into one or more executable command
//! strings for the target platform. Five matching strategies run in
//! fixed priority order — template, statistical classifier, fuzzy,
//! diagnosis, rule fallback — each with its own acceptance threshold;
//! the resolver splits chained requests, fills parameter slots, and
//! gates every rendered command through the safety deny-list.
//!
//! The whole resolution path is pure synchronous computation over an
//! immutable catalog and policy; concurrent `resolve` calls share
//! nothing mutable.

pub mod catalog;
pub mod chain;
pub mod extract;
pub mod layers;
pub mod model;
pub mod resolver;
pub mod safety;
pub mod similarity;

// Re-export key types for convenience
pub use catalog::CommandCatalog;
pub use layers::{Classification, IntentClassifier, MatchEngine};
pub use model::NaiveBayesModel;
pub use resolver::{FeedbackSink, Resolver, Suggestion};
pub use safety::SafetyPolicy;
