use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Slot name → extracted value. Ordered so rendering is deterministic.
pub type Bindings = BTreeMap<String, String>;

/// Which matching strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Template,
    Classifier,
    Fuzzy,
    Diagnosis,
    Rule,
}

impl LayerKind {
    /// Minimum confidence at which the resolver accepts this layer's
    /// result. The rule fallback is always accepted as a last resort.
    pub fn acceptance_threshold(&self) -> f64 {
        match self {
            LayerKind::Template => 0.95,
            LayerKind::Classifier => 0.60,
            LayerKind::Fuzzy => 0.60,
            LayerKind::Diagnosis => 0.90,
            LayerKind::Rule => 0.0,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LayerKind::Template => "template",
            LayerKind::Classifier => "classifier",
            LayerKind::Fuzzy => "fuzzy",
            LayerKind::Diagnosis => "diagnosis",
            LayerKind::Rule => "rule",
        };
        write!(f, "{s}")
    }
}

/// What a layer matched: a catalog intent to be rendered, or a literal
/// command string (diagnosis and rule layers bypass the catalog).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matched {
    Intent {
        id: String,
        /// Slot values the layer itself bound (template placeholders).
        /// Remaining slots are filled by the parameter extractor.
        #[serde(default)]
        bindings: Bindings,
    },
    Literal {
        command: String,
        /// Human-readable note (diagnosis remedies carry one).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

/// One layer's answer for a sub-utterance. Layers that have no answer
/// return no result at all, never a zero-confidence placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Matched,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Originating layer.
    pub layer: LayerKind,
}

impl MatchResult {
    pub fn intent(id: impl Into<String>, bindings: Bindings, confidence: f64, layer: LayerKind) -> Self {
        Self {
            matched: Matched::Intent {
                id: id.into(),
                bindings,
            },
            confidence,
            layer,
        }
    }

    pub fn literal(command: impl Into<String>, confidence: f64, layer: LayerKind) -> Self {
        Self {
            matched: Matched::Literal {
                command: command.into(),
                explanation: None,
            },
            confidence,
            layer,
        }
    }

    pub fn meets_threshold(&self) -> bool {
        self.confidence >= self.layer.acceptance_threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_kind_serialization() {
        assert_eq!(serde_json::to_string(&LayerKind::Template).unwrap(), r#""template""#);
        assert_eq!(serde_json::to_string(&LayerKind::Rule).unwrap(), r#""rule""#);
    }

    #[test]
    fn thresholds_follow_priority_design() {
        assert_eq!(LayerKind::Template.acceptance_threshold(), 0.95);
        assert_eq!(LayerKind::Classifier.acceptance_threshold(), 0.60);
        assert_eq!(LayerKind::Fuzzy.acceptance_threshold(), 0.60);
        assert_eq!(LayerKind::Diagnosis.acceptance_threshold(), 0.90);
        assert_eq!(LayerKind::Rule.acceptance_threshold(), 0.0);
    }

    #[test]
    fn match_result_threshold_check() {
        let hit = MatchResult::intent("kill_process", Bindings::new(), 0.72, LayerKind::Fuzzy);
        assert!(hit.meets_threshold());

        let miss = MatchResult::intent("kill_process", Bindings::new(), 0.40, LayerKind::Fuzzy);
        assert!(!miss.meets_threshold());
    }

    #[test]
    fn matched_roundtrip() {
        let mut bindings = Bindings::new();
        bindings.insert("filename".into(), "report.txt".into());
        let result = MatchResult::intent("create_file", bindings, 0.95, LayerKind::Template);

        let json = serde_json::to_string(&result).unwrap();
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        match back.matched {
            Matched::Intent { id, bindings } => {
                assert_eq!(id, "create_file");
                assert_eq!(bindings["filename"], "report.txt");
            }
            _ => panic!("expected intent match"),
        }
    }
}
