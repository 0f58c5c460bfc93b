use serde::{Deserialize, Serialize};

use crate::matching::LayerKind;
use crate::verdict::SafetyVerdict;

/// One resolved sub-utterance within a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandStep {
    /// Rendered command string for the target platform.
    pub command: String,
    /// Sub-utterance this step was resolved from.
    pub query: String,
    /// Layer that produced the match.
    pub layer: LayerKind,
    /// Confidence of the accepted match, in [0, 1].
    pub confidence: f64,
    /// Catalog intent id, absent for literal (diagnosis/rule) results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_id: Option<String>,
}

/// Final output of resolution: the ordered command sequence plus the
/// signals a caller needs to decide auto-run vs confirm vs reject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedCommand {
    /// Steps in the original utterance's left-to-right order.
    pub steps: Vec<CommandStep>,
    /// Steps joined with the platform's command separator.
    pub joined: String,
    /// Minimum confidence across all steps.
    pub confidence: f64,
    /// Safety gate outcome (never `Blocked` — blocked chains error out).
    pub verdict: SafetyVerdict,
    /// True when any step came from the rule fallback; callers should
    /// ask for confirmation before acting on a best-effort guess.
    pub best_effort: bool,
}

impl ResolvedCommand {
    /// Rendered command strings in chain order.
    pub fn commands(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.command.as_str()).collect()
    }

    pub fn is_chained(&self) -> bool {
        self.steps.len() > 1
    }
}
