//! JSONL feedback sink. Appends one record per resolved step so the
//! classifier can be retrained offline from real usage.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use nl_engine::FeedbackSink;
use nl_protocol::{FeedbackRecord, LayerKind};

/// Fuzzy-accepted `(utterance, intent_id)` pairs from an existing
/// log, for seeding the resolver's phrase index at startup. A missing
/// log means a cold start; unparseable lines are skipped.
pub fn load_history(path: impl AsRef<Path>) -> Vec<(String, String)> {
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "feedback log unreadable, starting cold");
            return Vec::new();
        }
    };
    contents
        .lines()
        .filter_map(|line| serde_json::from_str::<FeedbackRecord>(line).ok())
        .filter(|record| record.layer == LayerKind::Fuzzy)
        .filter_map(|record| record.intent_id.map(|id| (record.utterance, id)))
        .collect()
}

pub struct JsonlFeedbackSink {
    file: Mutex<File>,
}

impl JsonlFeedbackSink {
    /// Open the log for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FeedbackSink for JsonlFeedbackSink {
    /// Write failures are logged and swallowed; feedback must never
    /// break resolution.
    fn record(&self, record: &FeedbackRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "feedback record serialization failed");
                return;
            }
        };
        match self.file.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{line}") {
                    tracing::warn!(error = %e, "feedback log write failed");
                }
            }
            Err(_) => tracing::warn!("feedback log lock poisoned"),
        }
    }
}
