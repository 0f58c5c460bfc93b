//! Full resolution paths: template hits, fuzzy recovery, chaining.

mod helpers;

use helpers::{on_linux, on_windows, resolver};
use nl_protocol::{LayerKind, Platform};

#[test]
fn windows_round_trip_folder_and_file() {
    let resolved = on_windows("create folder project and create file readme.txt").unwrap();
    assert_eq!(resolved.commands(), vec!["mkdir project", "echo. > readme.txt"]);
    assert_eq!(resolved.joined, "mkdir project && echo. > readme.txt");
    assert!(resolved.confidence >= 0.95);
}

#[test]
fn typo_round_trip_via_fuzzy() {
    let resolved = on_windows("kil procces firefox").unwrap();
    assert_eq!(resolved.joined, "taskkill /IM firefox.exe /F");
    assert_eq!(resolved.steps[0].layer, LayerKind::Fuzzy);
    assert!(resolved.confidence >= 0.60 && resolved.confidence < 1.0);
}

#[test]
fn template_outranks_fuzzy_on_the_same_utterance() {
    // An exact phrasing would also fuzzy-match at 1.0; the template
    // layer must claim it first.
    let resolved = on_linux("list all files").unwrap();
    assert_eq!(resolved.steps[0].layer, LayerKind::Template);
}

#[test]
fn chaining_is_associative() {
    let chained = on_linux("list all files and show system information and check disk space").unwrap();
    let singles = ["list all files", "show system information", "check disk space"]
        .iter()
        .map(|q| on_linux(q).unwrap().joined)
        .collect::<Vec<_>>();
    assert_eq!(
        chained.commands(),
        singles.iter().map(String::as_str).collect::<Vec<_>>()
    );
}

#[test]
fn same_utterance_resolves_per_platform() {
    let win = on_windows("show system information").unwrap();
    let linux = on_linux("show system information").unwrap();
    assert_eq!(win.joined, "systeminfo");
    assert_eq!(linux.joined, "uname -a");
}

#[test]
fn context_reference_uses_the_created_folder() {
    let win = on_windows("create folder docs and create file readme.txt in it").unwrap();
    assert_eq!(win.joined, "mkdir docs && echo. > docs\\readme.txt");
    let linux = on_linux("create folder docs and create file readme.txt in it").unwrap();
    assert_eq!(linux.joined, "mkdir docs && touch docs/readme.txt");
}

#[test]
fn problem_statement_resolves_to_a_diagnostic() {
    let resolved = on_windows("wifi not working").unwrap();
    assert_eq!(resolved.steps[0].layer, LayerKind::Diagnosis);
    assert!(resolved.joined.contains("ipconfig"));
    assert!(resolved.confidence <= 0.90);
}

#[test]
fn git_flow_chains_three_commands() {
    let resolved = on_linux("git add all, commit changes, then push changes").unwrap();
    assert_eq!(
        resolved.commands(),
        vec!["git add .", "git commit -m \"Update\"", "git push"]
    );
}

#[test]
fn suggestions_offered_for_near_misses() {
    let r = resolver();
    let suggestions = r.suggestions("kil proc", Platform::Linux, 3);
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.windows(2).all(|w| w[0].score >= w[1].score));
}
