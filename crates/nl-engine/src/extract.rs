//! Parameter extraction — pulls slot values out of free text.
//!
//! Per-kind regex rules with positional fallbacks. Required slots are
//! never invented: a slot that cannot be filled is reported as missing
//! so the resolver can demote to the next layer.

use regex::Regex;
use std::sync::LazyLock;

use nl_protocol::{Bindings, ParameterSlot, SlotKind};

/// A required slot that could not be filled. Recoverable: the resolver
/// treats it as "this layer cannot serve this request".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSlot(pub String);

// Words that are never parameter values when captured positionally.
const NOISE_WORDS: &[&str] = &[
    "file", "files", "folder", "folders", "directory", "directories", "process", "processes",
    "program", "application", "branch", "branches", "all", "info", "information", "space",
    "temp", "temporary", "cache", "changes", "history", "git", "repo", "repository", "it",
    "that", "this", "them", "list", "show", "create", "make", "delete", "remove", "kill",
    "stop", "terminate", "close", "find", "search", "copy", "move", "rename", "commit",
    "push", "pull", "status", "new", "named", "called", "inside",
];

static RE_NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:file|folder|directory|branch)\s+(?:named?|called)\s+["']([^"']+)["']"#)
        .unwrap()
});

static RE_NAMED_BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:file|folder|directory|branch)\s+(?:named?|called)\s+([\w\-.\\/]+)")
        .unwrap()
});

static RE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).unwrap());

static RE_DOTTED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([\w\-]+\.[\w.]+)\b").unwrap());

static RE_KILL_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:kill|stop|close|terminate|end)\s+(?:the\s+)?(?:process\s+|program\s+|application\s+)?["']?([\w.-]+)["']?"#)
        .unwrap()
});

static RE_PROCESS_NOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:process|program|application)\s+["']?([\w.-]+)"#).unwrap());

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://[\w.\-]+(?:/[\w.\-/%?=&#]*)?)").unwrap());

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d+)\b").unwrap());

static RE_CONTENT_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:with\s+)?(?:content|message|text)\s+["'](.+?)["']"#).unwrap()
});

static RE_CONTENT_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)with\s+(?:content|message|text)\s+(.+)$").unwrap());

static RE_TO_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\w\-.\\/]+)\s+to\s+([\w\-.\\/]+)").unwrap());

/// Fill every slot not already bound. Layer-provided bindings win,
/// then extraction rules, then defaults. The first unfillable
/// required slot aborts with `MissingSlot`.
pub fn fill(utterance: &str, slots: &[ParameterSlot], bindings: &mut Bindings) -> Result<(), MissingSlot> {
    // Two path slots form a source→destination pair ("rename X to Y").
    if let [a, b] = slots {
        if a.kind == SlotKind::Path
            && b.kind == SlotKind::Path
            && !bindings.contains_key(&a.name)
            && !bindings.contains_key(&b.name)
        {
            if let Some(caps) = RE_TO_PAIR.captures(utterance) {
                let (first, second) = (caps[1].to_string(), caps[2].to_string());
                if !is_noise(&first) && !is_noise(&second) {
                    bindings.insert(a.name.clone(), first);
                    bindings.insert(b.name.clone(), second);
                }
            }
        }
    }

    for slot in slots {
        if bindings.get(&slot.name).is_some_and(|v| !v.is_empty()) {
            continue;
        }
        if let Some(value) = extract_slot(utterance, slot) {
            bindings.insert(slot.name.clone(), value);
        } else if let Some(default) = &slot.default {
            bindings.insert(slot.name.clone(), default.clone());
        } else if slot.required {
            return Err(MissingSlot(slot.name.clone()));
        }
    }
    Ok(())
}

/// Extract a single slot value, or nothing. Never invents values.
pub fn extract_slot(utterance: &str, slot: &ParameterSlot) -> Option<String> {
    match slot.kind {
        SlotKind::Path => extract_path(utterance),
        SlotKind::ProcessName => extract_process(utterance),
        SlotKind::FreeText => extract_free_text(utterance),
        SlotKind::Url => capture(&RE_URL, utterance),
        SlotKind::Number => capture(&RE_NUMBER, utterance),
    }
}

fn extract_path(utterance: &str) -> Option<String> {
    capture(&RE_NAMED, utterance)
        .or_else(|| capture(&RE_NAMED_BARE, utterance))
        .or_else(|| capture(&RE_QUOTED, utterance))
        .or_else(|| capture(&RE_DOTTED_NAME, utterance))
        .or_else(|| trailing_token(utterance))
}

fn extract_process(utterance: &str) -> Option<String> {
    if let Some(value) = capture(&RE_KILL_TARGET, utterance) {
        if !is_noise(&value) {
            return Some(value);
        }
    }
    if let Some(value) = capture(&RE_PROCESS_NOUN, utterance) {
        if !is_noise(&value) {
            return Some(value);
        }
    }
    trailing_token(utterance)
}

fn extract_free_text(utterance: &str) -> Option<String> {
    capture(&RE_CONTENT_QUOTED, utterance)
        .or_else(|| capture(&RE_QUOTED, utterance))
        .or_else(|| capture(&RE_CONTENT_BARE, utterance))
}

fn capture(re: &Regex, utterance: &str) -> Option<String> {
    re.captures(utterance).map(|caps| caps[1].to_string())
}

/// Last token of the utterance, unless it is a structural word.
fn trailing_token(utterance: &str) -> Option<String> {
    let token = utterance
        .split_whitespace()
        .last()?
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '.' && c != '_' && c != '-');
    if token.is_empty() || is_noise(token) {
        return None;
    }
    Some(token.to_string())
}

pub(crate) fn is_noise(token: &str) -> bool {
    let lower = token.to_lowercase();
    NOISE_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl_protocol::ParameterSlot;

    fn path_slot(name: &str) -> ParameterSlot {
        ParameterSlot::required(name, SlotKind::Path)
    }

    #[test]
    fn named_file_capture() {
        let slot = path_slot("filename");
        assert_eq!(
            extract_slot("create a file named test.txt", &slot).as_deref(),
            Some("test.txt")
        );
        assert_eq!(
            extract_slot(r#"create a folder called "My Folder""#, &slot).as_deref(),
            Some("My Folder")
        );
    }

    #[test]
    fn dotted_filename_without_keyword() {
        let slot = path_slot("filename");
        assert_eq!(
            extract_slot("get rid of old_data.txt", &slot).as_deref(),
            Some("old_data.txt")
        );
    }

    #[test]
    fn process_keyword_adjacent() {
        let slot = ParameterSlot::required("process", SlotKind::ProcessName);
        assert_eq!(extract_slot("kill process chrome", &slot).as_deref(), Some("chrome"));
        assert_eq!(extract_slot("kill chrome", &slot).as_deref(), Some("chrome"));
        assert_eq!(extract_slot("stop the program spotify", &slot).as_deref(), Some("spotify"));
    }

    #[test]
    fn process_with_typos_falls_back_to_trailing_token() {
        let slot = ParameterSlot::required("process", SlotKind::ProcessName);
        assert_eq!(extract_slot("kil procces firefox", &slot).as_deref(), Some("firefox"));
    }

    #[test]
    fn bare_kill_process_extracts_nothing() {
        let slot = ParameterSlot::required("process", SlotKind::ProcessName);
        assert_eq!(extract_slot("kill process", &slot), None);
        assert_eq!(extract_slot("kill the process", &slot), None);
    }

    #[test]
    fn missing_required_slot_is_reported() {
        let slots = [ParameterSlot::required("process", SlotKind::ProcessName)];
        let mut bindings = Bindings::new();
        let err = fill("kill process", &slots, &mut bindings).unwrap_err();
        assert_eq!(err, MissingSlot("process".into()));
    }

    #[test]
    fn optional_slot_takes_default() {
        let slots = [ParameterSlot::optional("message", SlotKind::FreeText, "Update")];
        let mut bindings = Bindings::new();
        fill("commit the changes", &slots, &mut bindings).unwrap();
        assert_eq!(bindings["message"], "Update");
    }

    #[test]
    fn layer_bindings_take_precedence() {
        let slots = [path_slot("filename")];
        let mut bindings = Bindings::new();
        bindings.insert("filename".into(), "report.txt".into());
        fill("create file notes.txt", &slots, &mut bindings).unwrap();
        assert_eq!(bindings["filename"], "report.txt");
    }

    #[test]
    fn to_delimited_pair() {
        let slots = [path_slot("old_name"), path_slot("new_name")];
        let mut bindings = Bindings::new();
        fill("rename old.txt to new.txt", &slots, &mut bindings).unwrap();
        assert_eq!(bindings["old_name"], "old.txt");
        assert_eq!(bindings["new_name"], "new.txt");
    }

    #[test]
    fn url_and_number_capture() {
        let url = ParameterSlot::required("url", SlotKind::Url);
        assert_eq!(
            extract_slot("clone repo https://github.com/acme/widget.git", &url).as_deref(),
            Some("https://github.com/acme/widget.git")
        );

        let number = ParameterSlot::required("number", SlotKind::Number);
        assert_eq!(extract_slot("show the top 10 processes", &number).as_deref(), Some("10"));
    }

    #[test]
    fn quoted_free_text() {
        let slot = ParameterSlot::required("content", SlotKind::FreeText);
        assert_eq!(
            extract_slot("create notes.txt with content 'Hello World'", &slot).as_deref(),
            Some("Hello World")
        );
    }

    #[test]
    fn unquoted_free_text_to_end_of_line() {
        let slot = ParameterSlot::required("message", SlotKind::FreeText);
        assert_eq!(
            extract_slot("commit changes with message fix login bug", &slot).as_deref(),
            Some("fix login bug")
        );
    }
}
