//! Problem-description matching: "wifi not working" style utterances
//! that name a symptom rather than a command.
//!
//! A static table of known problems, grouped by category, each with a
//! per-platform remedy. Relevance is the word overlap with the problem
//! description plus category keyword hits; confidence grows with
//! relevance and caps at 0.90 so a clean template or classifier hit
//! always outranks a diagnosis.

use ahash::AHashSet;

use nl_protocol::{LayerKind, MatchResult, Matched, Platform};

use crate::layers::MatchEngine;

struct Remedy {
    problem: &'static str,
    windows: &'static str,
    linux: &'static str,
    explanation: &'static str,
}

struct Category {
    name: &'static str,
    keywords: &'static [&'static str],
    remedies: &'static [Remedy],
}

static CATEGORIES: &[Category] = &[
    Category {
        name: "network",
        keywords: &[
            "internet", "wifi", "network", "connection", "connect", "dns", "port", "ping",
            "online", "slow",
        ],
        remedies: &[
            Remedy {
                problem: "wifi not working",
                windows: "ipconfig /release && ipconfig /renew && ipconfig /flushdns",
                linux: "sudo systemctl restart NetworkManager",
                explanation: "Renews the network lease and flushes cached DNS entries",
            },
            Remedy {
                problem: "internet is slow",
                windows: "ping -n 10 8.8.8.8",
                linux: "ping -c 10 8.8.8.8",
                explanation: "Measures latency and packet loss to a public resolver",
            },
            Remedy {
                problem: "dns not resolving",
                windows: "ipconfig /flushdns",
                linux: "resolvectl flush-caches",
                explanation: "Clears the local DNS cache",
            },
            Remedy {
                problem: "port already in use",
                windows: "netstat -ano | findstr LISTENING",
                linux: "ss -tulpn",
                explanation: "Lists listening sockets and the processes holding them",
            },
        ],
    },
    Category {
        name: "performance",
        keywords: &[
            "slow", "frozen", "freezing", "lagging", "hang", "memory", "ram", "cpu", "disk",
            "full", "space", "performance",
        ],
        remedies: &[
            Remedy {
                problem: "computer is slow",
                windows: "tasklist /v /fi \"STATUS eq running\"",
                linux: "top -b -n 1 | head -20",
                explanation: "Shows which processes are consuming the machine",
            },
            Remedy {
                problem: "disk is full",
                windows: "dir C:\\ /a /o-s",
                linux: "du -sh /* 2>/dev/null | sort -rh | head -10",
                explanation: "Finds the largest directories so space can be reclaimed",
            },
            Remedy {
                problem: "out of memory",
                windows: "tasklist /fi \"MEMUSAGE gt 100000\"",
                linux: "free -h && ps aux --sort=-%mem | head -10",
                explanation: "Shows memory pressure and the heaviest consumers",
            },
        ],
    },
    Category {
        name: "system_error",
        keywords: &["error", "errors", "crash", "crashed", "crashing", "corrupt", "broken", "bluescreen"],
        remedies: &[
            Remedy {
                problem: "system files corrupt",
                windows: "sfc /scannow",
                linux: "sudo dmesg --level=err,crit",
                explanation: "Scans for system file corruption and recent kernel errors",
            },
            Remedy {
                problem: "computer keeps crashing",
                windows: "wevtutil qe System /c:20 /rd:true /f:text",
                linux: "journalctl -p err -n 50",
                explanation: "Pulls the most recent error-level system log entries",
            },
        ],
    },
    Category {
        name: "application",
        keywords: &["program", "application", "app", "respond", "responding", "stuck", "frozen"],
        remedies: &[
            Remedy {
                problem: "application not responding",
                windows: "tasklist /fi \"STATUS eq not responding\"",
                linux: "ps aux | awk '$8 ~ /D|Z/'",
                explanation: "Lists hung processes so the stuck one can be identified",
            },
        ],
    },
    Category {
        name: "security",
        keywords: &["virus", "malware", "hacked", "suspicious", "infected", "security"],
        remedies: &[
            Remedy {
                problem: "computer might have a virus",
                windows: "start ms-settings:windowsdefender",
                linux: "ss -tupn state established",
                explanation: "Opens the security scanner, or shows active outbound connections",
            },
        ],
    },
    Category {
        name: "boot",
        keywords: &["boot", "booting", "startup", "start", "restart"],
        remedies: &[
            Remedy {
                problem: "computer won't boot properly",
                windows: "chkdsk C: /f",
                linux: "journalctl -b -p err",
                explanation: "Checks the disk and the current boot's error log",
            },
        ],
    },
];

pub struct DiagnosisMatcher;

impl DiagnosisMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiagnosisMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine for DiagnosisMatcher {
    fn find(&self, utterance: &str, platform: Platform) -> Option<MatchResult> {
        let words: AHashSet<String> = utterance
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return None;
        }

        let mut best: Option<(usize, &Category, &Remedy)> = None;
        for category in CATEGORIES {
            let keyword_hits = category.keywords.iter().filter(|k| words.contains(**k)).count();
            for remedy in category.remedies {
                let overlap = remedy
                    .problem
                    .split_whitespace()
                    .filter(|w| words.contains(*w))
                    .count();
                if overlap == 0 {
                    continue;
                }
                let relevance = overlap + keyword_hits;
                if best.as_ref().is_none_or(|(r, _, _)| relevance > *r) {
                    best = Some((relevance, category, remedy));
                }
            }
        }

        let (relevance, category, remedy) = best?;
        let command = match platform {
            Platform::Windows => remedy.windows,
            Platform::Linux => remedy.linux,
        };
        let confidence = (0.75 + 0.05 * relevance as f64).min(0.90);
        tracing::debug!(
            category = category.name,
            problem = remedy.problem,
            relevance,
            "diagnosis candidate"
        );
        Some(MatchResult {
            matched: Matched::Literal {
                command: command.to_string(),
                explanation: Some(remedy.explanation.to_string()),
            },
            confidence,
            layer: LayerKind::Diagnosis,
        })
    }

    fn kind(&self) -> LayerKind {
        LayerKind::Diagnosis
    }
}
