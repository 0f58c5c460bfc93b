use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::LayerKind;

/// One accepted resolution, recorded for offline retraining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Record id (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// Original utterance as typed.
    pub utterance: String,
    /// Accepted catalog intent id, if the match was intent-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_id: Option<String>,
    /// Layer that produced the accepted match.
    pub layer: LayerKind,
    /// Confidence of the accepted match.
    pub confidence: f64,
    /// Caller-supplied correctness signal, absent until confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub was_correct: Option<bool>,
    /// When the resolution happened.
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(
        utterance: impl Into<String>,
        intent_id: Option<String>,
        layer: LayerKind,
        confidence: f64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            utterance: utterance.into(),
            intent_id,
            layer,
            confidence,
            was_correct: None,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrip() {
        let record = FeedbackRecord::new(
            "kill chrome",
            Some("kill_process".into()),
            LayerKind::Fuzzy,
            0.82,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: FeedbackRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.utterance, "kill chrome");
        assert_eq!(back.intent_id.as_deref(), Some("kill_process"));
        assert_eq!(back.layer, LayerKind::Fuzzy);
        assert!(back.was_correct.is_none());
    }

    #[test]
    fn unconfirmed_fields_are_skipped() {
        let record = FeedbackRecord::new("list files", None, LayerKind::Rule, 0.3);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("was_correct"));
        assert!(!json.contains("intent_id"));
    }
}
