// AI configuration and secrets management
//
// API keys are looked up in:
// 1. System keychain (preferred)
// 2. Environment variables (fallback for CI/headless, and .env files)
//
// Keys are NEVER stored in settings.json

use std::env;
use std::fmt;

use crate::settings::{AIProvider, AISettings};

/// Service name for keychain storage
const KEYCHAIN_SERVICE: &str = "colstat";

/// Conventional variable read after our own, for OpenAI only
const OPENAI_STANDARD_ENV: &str = "OPENAI_API_KEY";

/// Source of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Key retrieved from system keychain
    Keychain,
    /// Key retrieved from environment variable
    Environment,
    /// No key found
    None,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Keychain => "keychain",
            KeySource::Environment => "environment",
            KeySource::None => "none",
        }
    }
}

/// Result of key lookup
#[derive(Debug, Clone)]
pub struct KeyLookup {
    pub key: Option<String>,
    pub source: KeySource,
}

/// Get the environment variable name for a provider
pub fn env_var_name(provider: &str) -> String {
    format!("COLSTAT_{}_KEY", provider.to_uppercase())
}

/// Get the keychain account name for a provider
fn keychain_account(provider: &str) -> String {
    format!("ai/{}", provider.to_lowercase())
}

/// Environment variables consulted for a provider, in order
fn env_candidates(provider: &str) -> Vec<String> {
    let mut names = vec![env_var_name(provider)];
    if provider.eq_ignore_ascii_case("openai") {
        names.push(OPENAI_STANDARD_ENV.to_string());
    }
    names
}

/// Get an API key for the specified provider
///
/// Checks in order:
/// 1. System keychain
/// 2. COLSTAT_<PROVIDER>_KEY
/// 3. OPENAI_API_KEY (openai only)
pub fn get_api_key(provider: &str) -> KeyLookup {
    #[cfg(feature = "keychain")]
    {
        if let Ok(entry) = keyring::Entry::new(KEYCHAIN_SERVICE, &keychain_account(provider)) {
            if let Ok(key) = entry.get_password() {
                return KeyLookup {
                    key: Some(key),
                    source: KeySource::Keychain,
                };
            }
        }
    }

    get_api_key_from_env(provider)
}

fn get_api_key_from_env(provider: &str) -> KeyLookup {
    for name in env_candidates(provider) {
        if let Ok(key) = env::var(&name) {
            if !key.trim().is_empty() {
                return KeyLookup {
                    key: Some(key.trim().to_string()),
                    source: KeySource::Environment,
                };
            }
        }
    }

    KeyLookup {
        key: None,
        source: KeySource::None,
    }
}

/// Check if keychain support is available
pub fn keychain_available() -> bool {
    #[cfg(feature = "keychain")]
    {
        keyring::Entry::new(KEYCHAIN_SERVICE, "test").is_ok()
    }
    #[cfg(not(feature = "keychain"))]
    {
        false
    }
}

// ============================================================================
// Resolved AI Configuration
// ============================================================================

/// The effective AI configuration, fully resolved from settings, keychain
/// and environment.
#[derive(Debug, Clone)]
pub struct ResolvedAIConfig {
    pub provider: AIProvider,
    /// Effective model (resolved from settings or provider default)
    pub model: String,
    /// Effective chat-completions base URL
    pub endpoint: String,
    /// API key (if available and provider needs one)
    pub api_key: Option<String>,
    pub key_source: KeySource,
}

impl ResolvedAIConfig {
    /// Resolve the effective AI configuration from settings.
    pub fn from_settings(settings: &AISettings) -> Self {
        let provider = settings.provider;

        let (api_key, key_source) = if provider.needs_api_key() {
            let lookup = get_api_key(provider.name());
            (lookup.key, lookup.source)
        } else {
            (None, KeySource::None)
        };

        Self {
            provider,
            model: settings.effective_model().to_string(),
            endpoint: settings.effective_endpoint().trim_end_matches('/').to_string(),
            api_key,
            key_source,
        }
    }

    /// Fail unless credentials are present for a provider that needs them.
    ///
    /// Providers without authentication resolve to an empty credential.
    pub fn require_credentials(&self) -> Result<String, MissingCredentials> {
        if !self.provider.needs_api_key() {
            return Ok(String::new());
        }
        self.api_key.clone().ok_or_else(|| MissingCredentials {
            provider: self.provider,
        })
    }
}

/// No API key could be found for a provider that needs one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCredentials {
    pub provider: AIProvider,
}

impl MissingCredentials {
    /// Remedy text naming the places a key is read from
    pub fn hint(&self) -> String {
        let vars = env_candidates(self.provider.name()).join(" or ");
        if keychain_available() {
            format!("set {} (a .env file works), or store the key in the system keychain", vars)
        } else {
            format!("set {} (a .env file works)", vars)
        }
    }
}

impl fmt::Display for MissingCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no API key found for provider {}", self.provider.name())
    }
}

impl std::error::Error for MissingCredentials {}

// ============================================================================
// Diagnostics (for CLI doctor)
// ============================================================================

/// Diagnostic information about AI configuration
#[derive(Debug)]
pub struct AIDiagnostics {
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub key_required: bool,
    pub key_present: bool,
    pub key_source: KeySource,
    pub keychain_available: bool,
}

impl AIDiagnostics {
    pub fn from_resolved(config: &ResolvedAIConfig) -> Self {
        Self {
            provider: config.provider.name().to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            key_required: config.provider.needs_api_key(),
            key_present: config.api_key.is_some(),
            key_source: config.key_source,
            keychain_available: keychain_available(),
        }
    }

    pub fn status(&self) -> &'static str {
        if !self.key_required || self.key_present {
            "ready"
        } else {
            "missing_key"
        }
    }
}

impl fmt::Display for AIDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AI Doctor")?;
        writeln!(f, "---------")?;
        writeln!(f, "status:          {}", self.status())?;
        writeln!(f, "provider:        {}", self.provider)?;
        writeln!(f, "model:           {}", self.model)?;
        writeln!(f, "endpoint:        {}", self.endpoint)?;
        if self.key_required {
            writeln!(f, "key:             {}", if self.key_present { "present" } else { "missing" })?;
            writeln!(f, "key_source:      {}", self.key_source.as_str())?;
        } else {
            writeln!(f, "key:             not required")?;
        }
        write!(f, "keychain:        {}", if self.keychain_available { "ok" } else { "unavailable" })
    }
}
