//! Exact phrasing alignment against catalog templates.
//!
//! Tokenizes the utterance, drops filler words, and walks each catalog
//! phrasing left to right. Literal tokens must be found in order;
//! `{placeholder}` tokens capture utterance tokens as slot bindings. A
//! clean alignment (every literal hit, every placeholder bound, nothing
//! skipped or left over) scores 0.95, everything else degrades below
//! the layer's acceptance threshold and only surfaces as a suggestion.

use std::sync::Arc;

use nl_protocol::{Bindings, LayerKind, MatchResult, Platform};

use crate::catalog::CommandCatalog;
use crate::extract;
use crate::layers::MatchEngine;

const FILLER_WORDS: &[&str] = &["a", "an", "the", "please", "my", "me"];

pub struct TemplateMatcher {
    catalog: Arc<CommandCatalog>,
}

enum PhraseToken<'a> {
    Literal(&'a str),
    Slot(&'a str),
}

struct Alignment {
    bindings: Bindings,
    lit_matched: usize,
    lit_total: usize,
    skipped: usize,
    leftover: usize,
    unbound: usize,
}

impl Alignment {
    fn is_clean(&self) -> bool {
        self.lit_matched == self.lit_total
            && self.unbound == 0
            && self.skipped == 0
            && self.leftover == 0
    }

    fn score(&self) -> f64 {
        if self.is_clean() {
            return 0.95;
        }
        let denom = (self.lit_total + self.skipped + self.leftover).max(1);
        let mut score = 0.95 * self.lit_matched as f64 / denom as f64;
        if self.unbound > 0 {
            score *= 0.5;
        }
        score
    }
}

struct Candidate {
    intent_id: String,
    alignment: Alignment,
    score: f64,
    platform_specific: bool,
}

impl Candidate {
    /// Prefer higher score, then more literal hits (a phrasing that
    /// spells out "named" beats one swallowing it into a placeholder),
    /// then more bound slots, then a platform-specific intent.
    fn beats(&self, other: &Candidate) -> bool {
        let lhs = (
            self.alignment.lit_matched,
            self.alignment.bindings.len(),
            self.platform_specific as u8,
        );
        let rhs = (
            other.alignment.lit_matched,
            other.alignment.bindings.len(),
            other.platform_specific as u8,
        );
        self.score > other.score + 1e-9 || ((self.score - other.score).abs() <= 1e-9 && lhs > rhs)
    }
}

impl TemplateMatcher {
    pub fn new(catalog: Arc<CommandCatalog>) -> Self {
        Self { catalog }
    }
}

impl MatchEngine for TemplateMatcher {
    fn find(&self, utterance: &str, platform: Platform) -> Option<MatchResult> {
        let tokens = tokenize(utterance);
        if tokens.is_empty() {
            return None;
        }

        let mut best: Option<Candidate> = None;
        for intent in self.catalog.iter() {
            if !intent.platform.supports(platform) || intent.template_for(platform).is_none() {
                continue;
            }
            for phrasing in &intent.phrasings {
                let Some(alignment) = align(phrasing, &tokens) else {
                    continue;
                };
                let candidate = Candidate {
                    intent_id: intent.id.clone(),
                    score: alignment.score(),
                    platform_specific: intent.platform.is_specific(),
                    alignment,
                };
                if best.as_ref().is_none_or(|b| candidate.beats(b)) {
                    best = Some(candidate);
                }
            }
        }

        let best = best.filter(|c| c.score >= 0.3)?;
        tracing::debug!(intent = %best.intent_id, score = best.score, "template alignment");
        Some(MatchResult::intent(
            best.intent_id,
            best.alignment.bindings,
            best.score,
            LayerKind::Template,
        ))
    }

    fn kind(&self) -> LayerKind {
        LayerKind::Template
    }
}

fn is_filler(token: &str) -> bool {
    FILLER_WORDS.contains(&token.to_lowercase().as_str())
}

fn tokenize(utterance: &str) -> Vec<&str> {
    utterance
        .split_whitespace()
        .map(|t| t.trim_end_matches(['!', '?', ',', ';']))
        .filter(|t| !t.is_empty() && !is_filler(t))
        .collect()
}

/// Fillers are dropped from phrasings too, so "create a file" and
/// "create file" align identically.
fn parse_phrase(phrasing: &str) -> Vec<PhraseToken<'_>> {
    phrasing
        .split_whitespace()
        .filter(|t| !is_filler(t))
        .map(|t| {
            t.strip_prefix('{')
                .and_then(|t| t.strip_suffix('}'))
                .map_or(PhraseToken::Literal(t), PhraseToken::Slot)
        })
        .collect()
}

/// Walk the phrasing against the token stream. Literals are searched
/// for ahead of the cursor (tokens jumped over count as skips); a
/// placeholder grabs one token, or the whole remainder when it is the
/// final phrase token. Returns `None` only for an empty phrasing.
fn align(phrasing: &str, tokens: &[&str]) -> Option<Alignment> {
    let phrase_tokens = parse_phrase(phrasing);
    if phrase_tokens.is_empty() {
        return None;
    }

    let mut out = Alignment {
        bindings: Bindings::new(),
        lit_matched: 0,
        lit_total: 0,
        skipped: 0,
        leftover: 0,
        unbound: 0,
    };
    let mut j = 0;

    let last = phrase_tokens.len() - 1;
    for (i, pt) in phrase_tokens.iter().enumerate() {
        match pt {
            PhraseToken::Slot(name) => {
                let value = if i == last {
                    (j < tokens.len()).then(|| {
                        let v = tokens[j..].join(" ");
                        j = tokens.len();
                        v
                    })
                } else {
                    (j < tokens.len()).then(|| {
                        let v = tokens[j].to_string();
                        j += 1;
                        v
                    })
                };
                match value {
                    Some(v) if !all_noise(&v) => {
                        out.bindings.insert(name.to_string(), unquote(&v));
                    }
                    _ => out.unbound += 1,
                }
            }
            PhraseToken::Literal(word) => {
                out.lit_total += 1;
                match tokens[j..].iter().position(|t| t.eq_ignore_ascii_case(word)) {
                    Some(k) => {
                        out.skipped += k;
                        out.lit_matched += 1;
                        j += k + 1;
                    }
                    // Absent literal: keep the cursor, the phrasing
                    // just misses this word.
                    None => {}
                }
            }
        }
    }
    out.leftover = tokens.len() - j;
    Some(out)
}

/// A capture whose every token is a structural word carries no value.
fn all_noise(value: &str) -> bool {
    value.split_whitespace().all(extract::is_noise)
}

fn unquote(value: &str) -> String {
    value.trim_matches(['"', '\'']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl_protocol::Matched;

    fn matcher() -> TemplateMatcher {
        TemplateMatcher::new(Arc::new(CommandCatalog::builtin()))
    }

    fn find(utterance: &str, platform: Platform) -> MatchResult {
        matcher().find(utterance, platform).unwrap()
    }

    #[test]
    fn exact_phrasing_scores_full_confidence() {
        let result = find("create a folder named project", Platform::Linux);
        assert_eq!(result.confidence, 0.95);
        match result.matched {
            Matched::Intent { id, bindings } => {
                assert_eq!(id, "create_folder");
                assert_eq!(bindings["foldername"], "project");
            }
            _ => panic!("expected intent"),
        }
    }

    #[test]
    fn named_phrasing_beats_bare_placeholder() {
        // "create file {filename}" would also align cleanly by
        // swallowing "named report.txt"; the longer phrasing wins.
        let result = find("create a file named report.txt", Platform::Windows);
        match result.matched {
            Matched::Intent { bindings, .. } => assert_eq!(bindings["filename"], "report.txt"),
            _ => panic!("expected intent"),
        }
    }

    #[test]
    fn two_placeholders_bind_in_order() {
        let result = find("copy report.txt to backup.txt", Platform::Linux);
        match result.matched {
            Matched::Intent { id, bindings } => {
                assert_eq!(id, "copy_file");
                assert_eq!(bindings["source"], "report.txt");
                assert_eq!(bindings["destination"], "backup.txt");
            }
            _ => panic!("expected intent"),
        }
    }

    #[test]
    fn placeholderless_phrasing_matches() {
        let result = find("list all files", Platform::Linux);
        assert_eq!(result.confidence, 0.95);
        match result.matched {
            Matched::Intent { id, bindings } => {
                assert_eq!(id, "list_files");
                assert!(bindings.is_empty());
            }
            _ => panic!("expected intent"),
        }
    }

    #[test]
    fn noise_word_capture_does_not_count_as_bound() {
        // "kill {process}" would bind the literal word "process";
        // that is a structural word, so the alignment is not clean.
        let result = matcher().find("kill process", Platform::Linux);
        if let Some(r) = result {
            assert!(r.confidence < 0.95);
        }
    }

    #[test]
    fn typo_breaks_the_clean_alignment() {
        let result = matcher().find("kil procces firefox", Platform::Windows);
        if let Some(r) = result {
            assert!(!r.meets_threshold());
        }
    }

    #[test]
    fn gibberish_finds_nothing_acceptable() {
        let result = matcher().find("quantum flux capacitor", Platform::Linux);
        if let Some(r) = result {
            assert!(!r.meets_threshold());
        }
    }
}
