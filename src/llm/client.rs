/// HTTP client for an OpenAI-compatible chat completions API.
///
/// The default target is Groq, but any server that speaks
/// `POST /chat/completions` works — pointing `[llm] api_url` at a local
/// Ollama (`http://127.0.0.1:11434/v1`) or vLLM instance is supported.
/// Uses the synchronous `ureq` HTTP client. Provides:
///
/// - **Health check**: verify the API is reachable with the configured key.
/// - **Complete**: send a single user message and receive the reply text.
///
/// The API key is read from the environment at construction time, from the
/// variable named by `[llm] api_key_env`. A client without a key still
/// constructs — every completion then fails with a clear error, which the
/// server surfaces as an application failure rather than crashing at start.
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::schema::LlmConfig;

// ---------------------------------------------------------------------------
// Request / response types for the completions API
// ---------------------------------------------------------------------------

/// A single message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    max_tokens: u32,
}

/// Response body from `POST /chat/completions`.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Response body from `GET /models` — lists available models.
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

/// A single model entry returned by the models endpoint.
#[derive(Debug, Deserialize)]
struct ModelEntry {
    #[allow(dead_code)]
    id: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous completions API client.
///
/// Created once per server process from the resolved config and shared
/// across request handlers.
#[derive(Debug)]
pub struct LlmClient {
    api_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl LlmClient {
    /// Build a client from the resolved config.
    ///
    /// Reads the API key from the environment variable the config names.
    /// An unset or empty variable leaves the client unconfigured.
    pub fn from_config(config: &LlmConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty());

        Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Whether an API key was found at construction time.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check whether the completions API is reachable with the current key.
    ///
    /// Uses a short timeout (5 s) so health reporting doesn't stall when the
    /// API is down. Resolves `localhost` to `127.0.0.1` to avoid IPv6 DNS
    /// delays on Windows when pointing at a local server.
    pub fn is_healthy(&self) -> bool {
        let url = format!("{}/models", self.api_url);
        let url = url.replace("://localhost", "://127.0.0.1");

        let mut request = ureq::get(&url).timeout(Duration::from_secs(5));
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }

        match request.call() {
            Ok(resp) => resp
                .into_json::<ModelsResponse>()
                .map(|models| !models.data.is_empty())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Send a prompt as a single user message and return the reply text.
    ///
    /// Fails when no API key is configured, when the request itself fails,
    /// or when the model returns nothing. The reply is trimmed.
    pub fn complete(&self, prompt: &str, temperature: f64) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            anyhow::bail!("API key not configured");
        };

        let url = format!("{}/chat/completions", self.api_url);
        // On Windows, "localhost" may try IPv6 (::1) first, causing timeouts
        // when a local server only binds to IPv4. Use 127.0.0.1 directly.
        let url = url.replace("://localhost", "://127.0.0.1");

        let messages = [Message::user(prompt)];
        let body = CompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature,
            max_tokens: self.max_tokens,
        };

        let resp = ureq::post(&url)
            .timeout(self.timeout)
            .set("Authorization", &format!("Bearer {api_key}"))
            .send_json(&body)
            .context("completion request failed")?;

        let parsed: CompletionResponse = resp
            .into_json()
            .context("failed to parse completion response")?;

        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.trim())
            .unwrap_or_default();

        if content.is_empty() {
            anyhow::bail!("model returned an empty response");
        }

        Ok(content.to_string())
    }

    /// Return the model name for logging.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
