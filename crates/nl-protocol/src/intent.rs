use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system a resolved command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// Command-conjunction operator for chained commands.
    /// Both cmd.exe and POSIX shells use `&&` for and-then semantics.
    pub fn separator(&self) -> &'static str {
        " && "
    }

    /// Path separator used when prefixing a file with a directory.
    pub fn path_separator(&self) -> char {
        match self {
            Platform::Windows => '\\',
            Platform::Linux => '/',
        }
    }

    /// Detect the host platform. Non-Windows hosts resolve as Linux.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "linux" | "unix" => Ok(Platform::Linux),
            other => Err(format!("unknown platform: {other:?}")),
        }
    }
}

/// Which platforms an intent is defined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlatformTag {
    Windows,
    Linux,
    #[default]
    Both,
}

impl PlatformTag {
    pub fn supports(&self, platform: Platform) -> bool {
        matches!(
            (self, platform),
            (PlatformTag::Both, _)
                | (PlatformTag::Windows, Platform::Windows)
                | (PlatformTag::Linux, Platform::Linux)
        )
    }

    /// True when the tag names a single platform rather than `both`.
    /// Used as a tie-breaker: specific intents beat generic ones.
    pub fn is_specific(&self) -> bool {
        !matches!(self, PlatformTag::Both)
    }
}

/// Semantic type of a parameter slot, selecting the extraction rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// File or directory name, possibly with separators.
    Path,
    /// Process/program name ("kill process X" → X).
    ProcessName,
    /// Arbitrary text (commit messages, file content).
    FreeText,
    /// http(s) URL.
    Url,
    /// Bare integer.
    Number,
}

/// One parameter slot of an intent's command template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSlot {
    /// Placeholder name as it appears in templates: `{name}`.
    pub name: String,
    /// Semantic type, drives extraction.
    pub kind: SlotKind,
    /// Required slots abort the intent when they cannot be filled.
    pub required: bool,
    /// Substituted for optional slots left unfilled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParameterSlot {
    pub fn required(name: impl Into<String>, kind: SlotKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: SlotKind, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: Some(default.into()),
        }
    }
}

/// A named, parameterized command template with natural-language phrasings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Unique identifier, e.g. "create_file".
    pub id: String,
    /// Phrasing templates with `{placeholder}` tokens.
    pub phrasings: Vec<String>,
    /// Ordered parameter slots.
    #[serde(default)]
    pub slots: Vec<ParameterSlot>,
    /// Platform(s) this intent is defined for.
    #[serde(default)]
    pub platform: PlatformTag,
    /// Windows command template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<String>,
    /// Linux command template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux: Option<String>,
}

impl Intent {
    pub fn new(id: impl Into<String>, platform: PlatformTag) -> Self {
        Self {
            id: id.into(),
            phrasings: Vec::new(),
            slots: Vec::new(),
            platform,
            windows: None,
            linux: None,
        }
    }

    pub fn phrase(mut self, phrasing: impl Into<String>) -> Self {
        self.phrasings.push(phrasing.into());
        self
    }

    pub fn slot(mut self, slot: ParameterSlot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn windows_cmd(mut self, template: impl Into<String>) -> Self {
        self.windows = Some(template.into());
        self
    }

    pub fn linux_cmd(mut self, template: impl Into<String>) -> Self {
        self.linux = Some(template.into());
        self
    }

    /// Command template for the given platform, if this intent supports it.
    pub fn template_for(&self, platform: Platform) -> Option<&str> {
        if !self.platform.supports(platform) {
            return None;
        }
        match platform {
            Platform::Windows => self.windows.as_deref(),
            Platform::Linux => self.linux.as_deref(),
        }
    }
}
