use serde::{Deserialize, Serialize};

/// How destructive a deny-list hit is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Resolution fails with `UnsafeCommand`.
    Block,
    /// Command passes through with an advisory attached.
    Warn,
}

/// One deny-list entry: a literal lowercase substring of a rendered command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenyPattern {
    /// Literal substring matched against the lowercased command.
    pub pattern: String,
    pub severity: Severity,
    /// Why this pattern is dangerous.
    pub reason: String,
    /// Safer alternative to suggest to the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

impl DenyPattern {
    pub fn block(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            severity: Severity::Block,
            reason: reason.into(),
            alternative: None,
        }
    }

    pub fn warn(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            severity: Severity::Warn,
            reason: reason.into(),
            alternative: None,
        }
    }

    pub fn suggest(mut self, alternative: impl Into<String>) -> Self {
        self.alternative = Some(alternative.into());
        self
    }
}

/// Safety gate outcome for a rendered command chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum SafetyVerdict {
    Allowed,
    Warned { reasons: Vec<String> },
    Blocked { reason: String },
}

impl SafetyVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, SafetyVerdict::Blocked { .. })
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, SafetyVerdict::Allowed)
    }
}
