//! Human-readable rendering of resolution results.

use std::fmt::Write;

use nl_engine::Suggestion;
use nl_protocol::{ResolvedCommand, SafetyVerdict};

/// Render a resolved command for terminal output.
pub fn render(resolved: &ResolvedCommand) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "$ {}", resolved.joined);

    if resolved.is_chained() {
        for (i, step) in resolved.steps.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({}, {:.0}%)",
                i + 1,
                step.command,
                step.layer,
                step.confidence * 100.0
            );
        }
    } else if let Some(step) = resolved.steps.first() {
        let _ = writeln!(out, "  via {} layer, {:.0}% confidence", step.layer, step.confidence * 100.0);
    }

    if resolved.best_effort {
        let _ = writeln!(out, "  note: best-effort guess, double-check before running");
    }
    if let SafetyVerdict::Warned { reasons } = &resolved.verdict {
        for reason in reasons {
            let _ = writeln!(out, "  warning: {reason}");
        }
    }
    out
}

/// Render "did you mean" alternatives for a failed resolution.
pub fn render_suggestions(suggestions: &[Suggestion]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let mut out = String::from("did you mean:\n");
    for s in suggestions {
        let _ = writeln!(out, "  {} ({:.0}%)", s.phrase, s.score * 100.0);
    }
    out
}
