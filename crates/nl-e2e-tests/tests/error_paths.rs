//! Failure modes: empty input, nothing matches, unfillable slots, and
//! degraded operation without a classifier.

mod helpers;

use std::sync::Arc;

use helpers::{on_linux, resolver};
use nl_engine::{Classification, CommandCatalog, IntentClassifier, Resolver, SafetyPolicy};
use nl_protocol::{LayerKind, Platform, ResolveError};

#[test]
fn empty_and_whitespace_utterances() {
    assert!(matches!(on_linux(""), Err(ResolveError::EmptyUtterance)));
    assert!(matches!(on_linux("   \t "), Err(ResolveError::EmptyUtterance)));
}

#[test]
fn gibberish_reports_no_match_with_the_utterance() {
    let err = on_linux("zzgrbl qwxx vrmblfzt").unwrap_err();
    match err {
        ResolveError::NoMatch { utterance } => assert_eq!(utterance, "zzgrbl qwxx vrmblfzt"),
        other => panic!("expected no match, got {other:?}"),
    }
}

#[test]
fn unfillable_required_slot_is_reported() {
    let err = on_linux("close it").unwrap_err();
    match err {
        ResolveError::MissingRequiredSlot { intent, slot } => {
            assert_eq!(intent, "kill_process");
            assert_eq!(slot, "process");
        }
        other => panic!("expected missing slot, got {other:?}"),
    }
}

#[test]
fn slotless_request_is_served_by_the_rule_fallback() {
    // "kill process" names no target; rather than erroring, the rule
    // fallback answers with a best-effort process listing.
    let resolved = on_linux("kill process").unwrap();
    assert_eq!(resolved.joined, "ps aux");
    assert!(resolved.best_effort);
}

struct FailingClassifier;

impl IntentClassifier for FailingClassifier {
    fn classify(&self, _utterance: &str) -> Option<Classification> {
        None
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[test]
fn resolution_survives_a_dead_classifier() {
    let with_dead = Resolver::with_classifier(
        CommandCatalog::builtin(),
        SafetyPolicy::builtin(),
        Some(Arc::new(FailingClassifier) as Arc<dyn IntentClassifier>),
    );
    let without = resolver();

    let a = with_dead.resolve("create folder demo", Platform::Linux).unwrap();
    let b = without.resolve("create folder demo", Platform::Linux).unwrap();
    assert_eq!(a.joined, b.joined);
    assert_eq!(a.steps[0].layer, LayerKind::Template);
}

#[test]
fn one_bad_part_fails_the_whole_chain() {
    let err = on_linux("create folder demo and check the flibbertigib").unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch { .. }));
}
