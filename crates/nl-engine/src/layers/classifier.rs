//! Statistical classifier adapter.
//!
//! The engine does not train or embed a model itself; it accepts any
//! `IntentClassifier` implementation (the shipped one is the JSON
//! naive-Bayes artifact in [`crate::model`]). Without a classifier the
//! layer is inert and resolution degrades to the layers around it.

use std::sync::Arc;

use nl_protocol::{Bindings, LayerKind, MatchResult, Platform};

use crate::catalog::CommandCatalog;
use crate::layers::MatchEngine;

/// A classifier's verdict for one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent_id: String,
    /// Posterior probability of the winning intent, in [0, 1].
    pub probability: f64,
}

/// Pluggable statistical model. Implementations must be deterministic
/// for a given input.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, utterance: &str) -> Option<Classification>;

    fn name(&self) -> &str;
}

pub struct ClassifierLayer {
    classifier: Option<Arc<dyn IntentClassifier>>,
    catalog: Arc<CommandCatalog>,
}

impl ClassifierLayer {
    pub fn new(classifier: Option<Arc<dyn IntentClassifier>>, catalog: Arc<CommandCatalog>) -> Self {
        if classifier.is_none() {
            tracing::info!("no intent classifier configured, layer disabled");
        }
        Self { classifier, catalog }
    }
}

impl MatchEngine for ClassifierLayer {
    fn find(&self, utterance: &str, platform: Platform) -> Option<MatchResult> {
        let classifier = self.classifier.as_ref()?;
        let classification = classifier.classify(utterance)?;

        // The model may predate the catalog; a prediction for an
        // unknown or wrong-platform intent is useless here.
        let intent = self.catalog.get(&classification.intent_id)?;
        if !intent.platform.supports(platform) || intent.template_for(platform).is_none() {
            return None;
        }

        tracing::debug!(
            model = classifier.name(),
            intent = %classification.intent_id,
            probability = classification.probability,
            "classifier prediction"
        );
        Some(MatchResult::intent(
            classification.intent_id,
            Bindings::new(),
            classification.probability,
            LayerKind::Classifier,
        ))
    }

    fn kind(&self) -> LayerKind {
        LayerKind::Classifier
    }
}
