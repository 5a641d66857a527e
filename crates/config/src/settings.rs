// Application settings
// Loaded from ~/.config/colstat/settings.json (or an explicit --config path)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use colstat_engine::column::ColumnSelector;

/// Input file used when neither the command line nor settings name one
pub const DEFAULT_INPUT: &str = "input.xlsx";

/// AI provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIProvider {
    /// OpenAI API (default)
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    /// Local model via Ollama's OpenAI-compatible endpoint
    Local,
}

impl AIProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AIProvider::OpenAI => "openai",
            AIProvider::Local => "local",
        }
    }

    /// Returns the default model for this provider
    pub fn default_model(&self) -> &'static str {
        match self {
            AIProvider::OpenAI => "gpt-4o-mini",
            AIProvider::Local => "llama3:8b",
        }
    }

    /// Returns the default chat-completions base URL for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            AIProvider::OpenAI => "https://api.openai.com/v1",
            AIProvider::Local => "http://localhost:11434/v1",
        }
    }

    pub fn needs_api_key(&self) -> bool {
        matches!(self, AIProvider::OpenAI)
    }
}

/// AI-specific settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AISettings {
    /// Selected AI provider
    pub provider: AIProvider,

    /// Model identifier (empty = provider default)
    pub model: String,

    /// Base URL of the chat-completions API (None = provider default)
    pub endpoint: Option<String>,
}

impl AISettings {
    /// Get the effective model (user-specified or provider default)
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    /// Get the effective endpoint (user-specified or provider default)
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Input file (relative paths resolve against the working directory)
    pub input: Option<PathBuf>,

    /// Column selector: zero-based index, "@" + letter, or header name
    pub column: Option<String>,

    /// First non-empty row holds column headers
    pub headers: bool,

    // AI
    #[serde(rename = "ai", default)]
    pub ai: AISettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            column: None,
            headers: true,
            ai: AISettings::default(),
        }
    }
}

impl Settings {
    /// Get the default settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("colstat");
        config_dir.join("settings.json")
    }

    /// Load settings.
    ///
    /// An explicit path must exist and parse. The default path is optional:
    /// when it is absent the built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("cannot read settings file {}: {}", path.display(), e))?;
        Self::parse(&contents)
            .map_err(|e| format!("invalid settings file {}: {}", path.display(), e))
    }

    /// Parse settings JSON. Lines starting with // are treated as comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        if cleaned.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Effective input path
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT))
    }

    /// Effective column selector (defaults to column C)
    pub fn column_selector(&self) -> Result<ColumnSelector, String> {
        match &self.column {
            Some(s) => s.parse(),
            None => Ok(ColumnSelector::default()),
        }
    }
}
