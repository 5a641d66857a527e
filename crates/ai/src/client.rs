// Chat-completions client
//
// Sends one user message and returns the text of the first choice.
// Works against OpenAI and any OpenAI-compatible endpoint (Ollama, etc.).

use serde::{Deserialize, Serialize};

/// Error from a completion request
#[derive(Debug, Clone)]
pub enum AskError {
    /// HTTP client could not be built
    Setup(String),
    /// Network error (connect, TLS, transfer)
    NetworkError(String),
    /// API error response
    ApiError { status: u16, message: String },
    /// Failed to parse response body
    ParseError(String),
    /// Provider returned unexpected format
    InvalidResponse(String),
}

impl AskError {
    /// Authentication was rejected (401/403)
    pub fn is_auth(&self) -> bool {
        matches!(self, AskError::ApiError { status: 401 | 403, .. })
    }
}

impl std::fmt::Display for AskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskError::Setup(msg) => write!(f, "Client setup failed: {}", msg),
            AskError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AskError::ApiError { status, message } if self.is_auth() => {
                write!(f, "Authentication failed ({}): {}", status, message)
            }
            AskError::ApiError { status, message } => write!(f, "API error ({}): {}", status, message),
            AskError::ParseError(msg) => write!(f, "Failed to parse response: {}", msg),
            AskError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for AskError {}

/// Anything that can turn a prompt into response text.
///
/// `ChatClient` is the network implementation; tests substitute their own.
pub trait CompletionClient {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, AskError>;
}

/// Connection details for a chat-completions endpoint
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    pub model: String,
    /// Bearer token; empty for endpoints without authentication
    pub api_key: String,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// Blocking chat-completions client.
///
/// No explicit timeout is set; the transport default applies.
pub struct ChatClient {
    http: reqwest::blocking::Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, AskError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("colstat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AskError::Setup(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }
}

impl CompletionClient for ChatClient {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, AskError> {
        let request = build_request(&self.config.model, prompt, temperature);

        log::debug!("POST {} (model {})", self.url(), self.config.model);

        let mut builder = self.http.post(self.url()).json(&request);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let response = builder
            .send()
            .map_err(|e| AskError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| AskError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AskError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        extract_content(&body)
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str, temperature: f64) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature,
    }
}

/// Text of the first choice in a successful response body
fn extract_content(body: &str) -> Result<String, AskError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| AskError::ParseError(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AskError::InvalidResponse("No choices in response".to_string()))?
        .message
        .content
        .ok_or_else(|| AskError::InvalidResponse("Response message has no content".to_string()))?;

    log::debug!("response content: {:?}", content);
    Ok(content)
}
