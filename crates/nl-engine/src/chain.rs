//! Multi-command chaining — splitting utterances on conjunctions and
//! resolving context references ("create folder X and a file in it").

use regex::Regex;
use std::sync::LazyLock;

use nl_protocol::{CommandStep, Platform};

/// Connectives that separate chained sub-requests, longest first.
static RE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+and\s+then\s+|\s+after\s+that\s+|\s+then\s+|\s+and\s+|\s+also\s+|\s+next\s+|[,;]\s+",
    )
    .unwrap()
});

static RE_LAST_MKDIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:mkdir|md)\s+([^\s&|;]+)").unwrap());

static RE_CONTEXT_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(file\s+(?:named?\s+|called\s+)?)(\S+)\s+(?:in|inside)\s+(?:the\s+|that\s+)?(?:folder|it|there)\b",
    )
    .unwrap()
});

// Verbs that mark independent sub-requests; splitting only happens
// when at least two of them appear with a conjunction between them.
const ACTION_VERBS: &[&str] = &[
    "create", "make", "delete", "remove", "copy", "move", "list", "show", "find", "kill",
    "stop", "start", "run", "open", "close", "install", "update", "rename", "change",
    "clean", "clear", "check", "ping", "commit", "push", "pull",
];

const CONJUNCTIONS: &[&str] = &["and then", "after that", "then", "and", "also", "next", ",", ";"];

/// True when the utterance looks like several chained requests.
pub fn is_multi(utterance: &str) -> bool {
    let lower = utterance.to_lowercase();
    let verb_count: usize = lower
        .split_whitespace()
        .filter(|w| ACTION_VERBS.contains(w))
        .count();
    verb_count >= 2 && CONJUNCTIONS.iter().any(|c| lower.contains(c))
}

/// Split an utterance into ordered sub-utterances. Single requests
/// come back as a one-element sequence.
pub fn split(utterance: &str) -> Vec<String> {
    if !is_multi(utterance) {
        return vec![utterance.trim().to_string()];
    }
    RE_SEPARATORS
        .split(utterance)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rewrite "file X in it / inside the folder" relative to the most
/// recently created directory in prior steps. No-op when there is no
/// prior mkdir or no context reference.
pub fn resolve_context(query: &str, prior: &[CommandStep], platform: Platform) -> String {
    let Some(folder) = last_created_folder(prior) else {
        return query.to_string();
    };
    let sep = platform.path_separator();
    let rewritten = RE_CONTEXT_FILE.replace(query, |caps: &regex::Captures<'_>| {
        format!("{}{}{}{}", &caps[1], folder, sep, &caps[2])
    });
    rewritten.into_owned()
}

fn last_created_folder(prior: &[CommandStep]) -> Option<String> {
    prior.iter().rev().find_map(|step| {
        RE_LAST_MKDIR
            .captures(&step.command)
            .map(|caps| caps[1].trim_matches(['"', '\'']).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl_protocol::LayerKind;

    fn step(command: &str) -> CommandStep {
        CommandStep {
            command: command.into(),
            query: String::new(),
            layer: LayerKind::Template,
            confidence: 0.95,
            intent_id: None,
        }
    }

    #[test]
    fn single_request_is_not_split() {
        assert_eq!(split("create a folder named test"), vec!["create a folder named test"]);
    }

    #[test]
    fn two_requests_split_on_and() {
        let parts = split("create folder project and create file readme.txt");
        assert_eq!(parts, vec!["create folder project", "create file readme.txt"]);
    }

    #[test]
    fn three_requests_preserve_order() {
        let parts = split("list all files and then show system information then check disk space");
        assert_eq!(
            parts,
            vec!["list all files", "show system information", "check disk space"]
        );
    }

    #[test]
    fn conjunction_without_second_verb_is_single() {
        // "and" inside a noun phrase, only one action verb
        assert!(!is_multi("list files and folders"));
        assert_eq!(split("list files and folders").len(), 1);
    }

    #[test]
    fn context_reference_rewritten_to_created_folder() {
        let prior = [step("mkdir projects")];
        let q = resolve_context("create file named index.html inside it", &prior, Platform::Linux);
        assert_eq!(q, "create file named projects/index.html");

        let q = resolve_context("create file named index.html in the folder", &prior, Platform::Windows);
        assert_eq!(q, "create file named projects\\index.html");
    }

    #[test]
    fn no_prior_mkdir_leaves_query_alone() {
        let prior = [step("ls -la")];
        let q = resolve_context("create file named notes.txt in it", &prior, Platform::Linux);
        assert_eq!(q, "create file named notes.txt in it");
    }
}
