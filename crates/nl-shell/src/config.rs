//! Shell configuration, loadable from TOML. Every field is optional;
//! the engine falls back to its builtin catalog and policy.

use nl_protocol::Platform;
use serde::Deserialize;

/// Top-level configuration for the shell binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShellConfig {
    /// Target platform; autodetected from the host when absent.
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Path to a JSON intent catalog replacing the builtin one.
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Path to a JSON deny-list replacing the builtin policy.
    #[serde(default)]
    pub policy_path: Option<String>,
    /// Path to a naive-Bayes model artifact. None disables the
    /// classifier layer.
    #[serde(default)]
    pub model_path: Option<String>,
    /// JSONL file to append one feedback record per resolution.
    #[serde(default)]
    pub feedback_log: Option<String>,
    /// How many "did you mean" suggestions to show on a failed match.
    #[serde(default = "default_suggestions")]
    pub suggestions: usize,
}

fn default_suggestions() -> usize {
    3
}

impl ShellConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_config() {
        let config: ShellConfig = toml::from_str("").unwrap();
        assert!(config.platform.is_none());
        assert!(config.model_path.is_none());
        assert_eq!(config.suggestions, 3);
    }

    #[test]
    fn deserialize_full_config() {
        let toml_src = r#"
            platform = "windows"
            catalog_path = "catalog.json"
            model_path = "model.json"
            feedback_log = "feedback.jsonl"
            suggestions = 5
        "#;
        let config: ShellConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.platform, Some(Platform::Windows));
        assert_eq!(config.catalog_path.as_deref(), Some("catalog.json"));
        assert_eq!(config.suggestions, 5);
    }
}
