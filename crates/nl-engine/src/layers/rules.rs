//! Keyword-rule fallback, the floor of the layer stack.
//!
//! When nothing else matched, a small ordered rule table maps broad
//! keyword groups to safe read-only commands. Results carry a low
//! fixed confidence and are flagged best-effort by the resolver.

use nl_protocol::{LayerKind, MatchResult, Matched, Platform};

use crate::layers::MatchEngine;

pub const RULE_CONFIDENCE: f64 = 0.30;

struct FallbackRule {
    keywords: &'static [&'static str],
    windows: &'static str,
    linux: &'static str,
    explanation: &'static str,
}

// Ordered: first matching rule wins, so more specific groups come
// before broad ones ("disk" before "show").
static RULES: &[FallbackRule] = &[
    FallbackRule {
        keywords: &["disk", "storage", "space"],
        windows: "wmic logicaldisk get size,freespace,caption",
        linux: "df -h",
        explanation: "Shows disk usage",
    },
    FallbackRule {
        keywords: &["memory", "ram"],
        windows: "systeminfo | findstr Memory",
        linux: "free -h",
        explanation: "Shows memory usage",
    },
    FallbackRule {
        keywords: &["process", "processes", "running", "task", "tasks"],
        windows: "tasklist",
        linux: "ps aux",
        explanation: "Lists running processes",
    },
    FallbackRule {
        keywords: &["ip", "address", "network", "internet", "connection"],
        windows: "ipconfig",
        linux: "ip addr show",
        explanation: "Shows network configuration",
    },
    FallbackRule {
        keywords: &["system", "computer", "machine", "specs", "hardware"],
        windows: "systeminfo",
        linux: "uname -a",
        explanation: "Shows system information",
    },
    FallbackRule {
        keywords: &["temp", "temporary", "cache", "junk"],
        windows: "dir %temp%",
        linux: "ls /tmp",
        explanation: "Shows temporary files",
    },
    FallbackRule {
        keywords: &["date", "time", "clock", "today"],
        windows: "echo %date% %time%",
        linux: "date",
        explanation: "Shows the current date and time",
    },
    FallbackRule {
        keywords: &["user", "username", "who", "whoami"],
        windows: "whoami",
        linux: "whoami",
        explanation: "Shows the current user",
    },
    FallbackRule {
        keywords: &["file", "files", "folder", "folders", "directory", "list", "show"],
        windows: "dir",
        linux: "ls -la",
        explanation: "Lists the current directory",
    },
];

pub struct RuleFallback;

impl RuleFallback {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RuleFallback {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_any(utterance: &str, keywords: &[&str]) -> bool {
    utterance
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(|w| keywords.contains(&w))
}

impl MatchEngine for RuleFallback {
    fn find(&self, utterance: &str, platform: Platform) -> Option<MatchResult> {
        let lower = utterance.to_lowercase();
        let rule = RULES.iter().find(|r| matches_any(&lower, r.keywords))?;
        let command = match platform {
            Platform::Windows => rule.windows,
            Platform::Linux => rule.linux,
        };
        tracing::debug!(%command, "rule fallback hit");
        Some(MatchResult {
            matched: Matched::Literal {
                command: command.to_string(),
                explanation: Some(rule.explanation.to_string()),
            },
            confidence: RULE_CONFIDENCE,
            layer: LayerKind::Rule,
        })
    }

    fn kind(&self) -> LayerKind {
        LayerKind::Rule
    }
}
