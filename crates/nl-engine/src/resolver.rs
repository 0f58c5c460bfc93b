//! The resolver: splits an utterance into parts, runs each part down
//! the layer stack, renders and safety-checks the commands, and folds
//! the steps into one [`ResolvedCommand`].
//!
//! Layer order is fixed: template, classifier, fuzzy, diagnosis, rule.
//! The first layer whose result meets its own acceptance threshold and
//! whose required slots can be filled wins; a result that matches but
//! cannot fill a required slot demotes to the next layer.

use std::sync::Arc;

use nl_protocol::{
    Bindings, CommandStep, FeedbackRecord, LayerKind, Matched, Platform, ResolveError,
    ResolveResult, ResolvedCommand, SafetyVerdict,
};
use serde::Serialize;

use crate::catalog::{render_template, CommandCatalog};
use crate::chain;
use crate::extract;
use crate::layers::{
    ClassifierLayer, DiagnosisMatcher, FuzzyMatcher, IntentClassifier, LinearPhraseIndex,
    MatchEngine, RuleFallback, TemplateMatcher,
};
use crate::safety::SafetyPolicy;

/// Receives a record for every resolved step. Failures inside a sink
/// must not affect resolution.
pub trait FeedbackSink: Send + Sync {
    fn record(&self, record: &FeedbackRecord);
}

/// A ranked alternative returned by [`Resolver::suggestions`].
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub intent_id: String,
    pub phrase: String,
    pub score: f64,
}

pub struct Resolver {
    catalog: Arc<CommandCatalog>,
    policy: SafetyPolicy,
    layers: Vec<Box<dyn MatchEngine>>,
    index: Arc<LinearPhraseIndex>,
    feedback: Option<Arc<dyn FeedbackSink>>,
}

impl Resolver {
    pub fn new(catalog: CommandCatalog, policy: SafetyPolicy) -> Self {
        Self::with_classifier(catalog, policy, None)
    }

    pub fn with_classifier(
        catalog: CommandCatalog,
        policy: SafetyPolicy,
        classifier: Option<Arc<dyn IntentClassifier>>,
    ) -> Self {
        Self::with_history(catalog, policy, classifier, &[])
    }

    /// Like [`Resolver::with_classifier`], but seeds the fuzzy phrase
    /// index with `(utterance, intent_id)` pairs accepted in past
    /// sessions. Pairs naming an unknown intent are skipped. The index
    /// is immutable after this; resolution never adds to it.
    pub fn with_history(
        catalog: CommandCatalog,
        policy: SafetyPolicy,
        classifier: Option<Arc<dyn IntentClassifier>>,
        history: &[(String, String)],
    ) -> Self {
        let catalog = Arc::new(catalog);
        let mut index = LinearPhraseIndex::new(&catalog);
        for (utterance, intent_id) in history {
            match catalog.get(intent_id) {
                Some(intent) => index.seed(utterance, intent),
                None => tracing::debug!(%intent_id, "history names an unknown intent, skipping"),
            }
        }
        let index = Arc::new(index);
        let layers: Vec<Box<dyn MatchEngine>> = vec![
            Box::new(TemplateMatcher::new(Arc::clone(&catalog))),
            Box::new(ClassifierLayer::new(classifier, Arc::clone(&catalog))),
            Box::new(FuzzyMatcher::new(Arc::clone(&index))),
            Box::new(DiagnosisMatcher::new()),
            Box::new(RuleFallback::new()),
        ];
        Self {
            catalog,
            policy,
            layers,
            index,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = Some(sink);
        self
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Resolve an utterance to one or more shell commands.
    ///
    /// Conjunction-joined requests resolve part by part, each part
    /// seeing the steps before it for context references ("in it").
    /// The aggregate confidence is the weakest step's, and a single
    /// blocked command fails the whole chain.
    pub fn resolve(&self, utterance: &str, platform: Platform) -> ResolveResult<ResolvedCommand> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(ResolveError::EmptyUtterance);
        }

        let parts = if chain::is_multi(utterance) {
            chain::split(utterance)
        } else {
            vec![utterance.to_string()]
        };

        let mut steps: Vec<CommandStep> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        for part in &parts {
            let query = chain::resolve_context(part, &steps, platform);
            let step = self.resolve_single(&query, platform)?;

            match self.policy.check(&step.command) {
                SafetyVerdict::Blocked { reason } => {
                    tracing::warn!(command = %step.command, %reason, "resolution blocked");
                    return Err(ResolveError::UnsafeCommand { reason });
                }
                SafetyVerdict::Warned { reasons } => warnings.extend(reasons),
                SafetyVerdict::Allowed => {}
            }

            self.record_feedback(&step);
            steps.push(step);
        }

        let joined = steps
            .iter()
            .map(|s| s.command.as_str())
            .collect::<Vec<_>>()
            .join(platform.separator());
        let confidence = steps
            .iter()
            .map(|s| s.confidence)
            .fold(f64::INFINITY, f64::min);
        let best_effort = steps.iter().any(|s| s.layer == LayerKind::Rule);
        let verdict = if warnings.is_empty() {
            SafetyVerdict::Allowed
        } else {
            SafetyVerdict::Warned { reasons: warnings }
        };

        tracing::info!(%joined, confidence, steps = steps.len(), "resolved");
        Ok(ResolvedCommand {
            steps,
            joined,
            confidence,
            verdict,
            best_effort,
        })
    }

    /// Run one sub-utterance down the layer stack.
    fn resolve_single(&self, query: &str, platform: Platform) -> ResolveResult<CommandStep> {
        // Remembered so a matched-but-unfillable intent surfaces as a
        // missing-slot error instead of a bare no-match.
        let mut last_missing: Option<(String, String)> = None;

        for layer in &self.layers {
            let Some(result) = layer.find(query, platform) else {
                continue;
            };
            if !result.meets_threshold() {
                tracing::debug!(
                    layer = %result.layer,
                    confidence = result.confidence,
                    "below acceptance threshold"
                );
                continue;
            }

            match result.matched {
                Matched::Literal { command, .. } => {
                    return Ok(CommandStep {
                        command,
                        query: query.to_string(),
                        layer: result.layer,
                        confidence: result.confidence,
                        intent_id: None,
                    });
                }
                Matched::Intent { id, bindings } => {
                    match self.render_intent(query, &id, bindings, platform) {
                        Ok(command) => {
                            return Ok(CommandStep {
                                command,
                                query: query.to_string(),
                                layer: result.layer,
                                confidence: result.confidence,
                                intent_id: Some(id),
                            });
                        }
                        Err(slot) => {
                            tracing::debug!(
                                layer = %result.layer,
                                intent = %id,
                                %slot,
                                "missing required slot, demoting"
                            );
                            last_missing = Some((id, slot));
                        }
                    }
                }
            }
        }

        match last_missing {
            Some((intent, slot)) => Err(ResolveError::MissingRequiredSlot { intent, slot }),
            None => Err(ResolveError::NoMatch {
                utterance: query.to_string(),
            }),
        }
    }

    /// Fill the intent's slots and render its platform template.
    fn render_intent(
        &self,
        query: &str,
        intent_id: &str,
        mut bindings: Bindings,
        platform: Platform,
    ) -> Result<String, String> {
        let intent = self
            .catalog
            .get(intent_id)
            .ok_or_else(|| format!("unknown intent {intent_id}"))?;
        let template = intent
            .template_for(platform)
            .ok_or_else(|| format!("no {platform} template"))?;

        extract::fill(query, &intent.slots, &mut bindings).map_err(|m| m.0)?;
        render_template(template, &bindings)
    }

    /// Ranked near-matches for an unresolvable utterance, best first.
    /// Ignores acceptance thresholds; meant for "did you mean" output.
    pub fn suggestions(&self, utterance: &str, platform: Platform, n: usize) -> Vec<Suggestion> {
        use crate::layers::PhraseIndex;
        self.index
            .top_matches(utterance, platform, n)
            .into_iter()
            .map(|s| Suggestion {
                intent_id: s.intent_id,
                phrase: s.phrase,
                score: s.score,
            })
            .collect()
    }

    fn record_feedback(&self, step: &CommandStep) {
        if let Some(sink) = &self.feedback {
            sink.record(&FeedbackRecord::new(
                &step.query,
                step.intent_id.clone(),
                step.layer,
                step.confidence,
            ));
        }
    }
}
