//! Safety validator — deny-list gate over rendered commands.
//!
//! Patterns are literal lowercase substrings with a severity: `Block`
//! entries fail resolution outright, `Warn` entries pass through with
//! an advisory for the caller to surface. Severity lives in the policy
//! data, not here.

use nl_protocol::{DenyPattern, ResolveError, SafetyVerdict, Severity};

/// Immutable deny-list, loaded once at start.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    deny: Vec<DenyPattern>,
}

impl SafetyPolicy {
    pub fn new(deny: Vec<DenyPattern>) -> Self {
        Self { deny }
    }

    /// Policy with no patterns; everything is allowed.
    pub fn permissive() -> Self {
        Self { deny: Vec::new() }
    }

    /// Load a policy from a JSON array of deny patterns.
    pub fn from_json_file(path: &str) -> Result<Self, ResolveError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ResolveError::Catalog(format!("read {path}: {e}")))?;
        let deny: Vec<DenyPattern> = serde_json::from_str(&contents)
            .map_err(|e| ResolveError::Catalog(format!("parse {path}: {e}")))?;
        Ok(Self::new(deny))
    }

    /// Check a rendered command. A single blocking hit decides the
    /// verdict; warn hits accumulate into one advisory list.
    pub fn check(&self, command: &str) -> SafetyVerdict {
        let lower = command.to_lowercase();
        let mut reasons = Vec::new();

        for pattern in &self.deny {
            if !lower.contains(&pattern.pattern) {
                continue;
            }
            let mut reason = format!("{:?}: {}", pattern.pattern, pattern.reason);
            if let Some(alt) = &pattern.alternative {
                reason.push_str(&format!(" ({alt})"));
            }
            match pattern.severity {
                Severity::Block => {
                    tracing::warn!(pattern = %pattern.pattern, %command, "command blocked");
                    return SafetyVerdict::Blocked { reason };
                }
                Severity::Warn => reasons.push(reason),
            }
        }

        if reasons.is_empty() {
            SafetyVerdict::Allowed
        } else {
            SafetyVerdict::Warned { reasons }
        }
    }

    /// The builtin deny-list covering destructive patterns on both
    /// platforms: recursive force-deletes, disk formatting, raw disk
    /// writes block; system-wide but confirmable operations warn.
    pub fn builtin() -> Self {
        Self::new(vec![
            DenyPattern::block("rm -rf /", "deletes every file on the system")
                .suggest("specify an exact directory instead"),
            DenyPattern::block("rm -rf", "forcefully deletes a directory tree without confirmation")
                .suggest("use rm -r on an exact path"),
            DenyPattern::block("rm -fr", "forcefully deletes a directory tree without confirmation")
                .suggest("use rm -r on an exact path"),
            DenyPattern::block("del /s", "recursively deletes files across subdirectories")
                .suggest("delete specific files one at a time"),
            DenyPattern::block("rd /s", "removes a directory tree without confirmation"),
            DenyPattern::block("format ", "formats and erases an entire disk partition"),
            DenyPattern::block("mkfs", "creates a new filesystem, erasing all data on the partition"),
            DenyPattern::block("dd if=", "low-level disk copy can overwrite the wrong drive"),
            DenyPattern::warn("shutdown", "shuts down the system"),
            DenyPattern::warn("reboot", "restarts the system immediately"),
            DenyPattern::warn("systemctl stop", "stops a system service")
                .suggest("consider systemctl restart"),
            DenyPattern::warn("net user", "modifies user accounts and can lock you out"),
            DenyPattern::warn("chmod 777", "gives full permissions to everyone")
                .suggest("use the minimal permissions needed, e.g. 755"),
            DenyPattern::warn("del ", "deletes files permanently"),
            DenyPattern::warn("rm ", "removes files permanently"),
            DenyPattern::warn("kill -9", "force kills a process without cleanup")
                .suggest("try plain kill first for a graceful shutdown"),
            DenyPattern::warn("pkill", "kills processes by name and may affect several at once"),
            DenyPattern::warn("taskkill", "force terminates a process"),
            DenyPattern::warn("chown -r", "recursively changes file ownership"),
            DenyPattern::warn("firewall", "modifies firewall settings"),
            DenyPattern::warn("ufw ", "changes firewall configuration"),
            DenyPattern::warn("diskpart", "disk partition management can affect disk structure"),
        ])
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_wipe_is_blocked() {
        let policy = SafetyPolicy::builtin();
        let verdict = policy.check("rm -rf /");
        assert!(verdict.is_blocked());
    }

    #[test]
    fn recursive_delete_blocked_regardless_of_target() {
        let policy = SafetyPolicy::builtin();
        assert!(policy.check("rm -rf ./build").is_blocked());
        assert!(policy.check("del /s /q C:\\data").is_blocked());
    }

    #[test]
    fn block_wins_over_earlier_warns() {
        let policy = SafetyPolicy::builtin();
        // "rm " warns, "rm -rf" blocks; the block must decide.
        assert!(policy.check("rm -rf /tmp/cache").is_blocked());
    }

    #[test]
    fn plain_delete_only_warns() {
        let policy = SafetyPolicy::builtin();
        match policy.check("rm notes.txt") {
            SafetyVerdict::Warned { reasons } => assert_eq!(reasons.len(), 1),
            other => panic!("expected warning, got {other:?}"),
        }
    }

    #[test]
    fn harmless_commands_are_allowed() {
        let policy = SafetyPolicy::builtin();
        assert!(policy.check("mkdir project").is_allowed());
        assert!(policy.check("ls -la").is_allowed());
        assert!(policy.check("git status").is_allowed());
        // "rmdir" must not trip the "rm " substring
        assert!(policy.check("rmdir project").is_allowed());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let policy = SafetyPolicy::builtin();
        assert!(policy.check("RM -RF /var").is_blocked());
    }

    #[test]
    fn permissive_policy_allows_everything() {
        let policy = SafetyPolicy::permissive();
        assert!(policy.check("rm -rf /").is_allowed());
    }
}
