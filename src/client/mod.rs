//! HTTP client for the tonedown API.
//!
//! [`ApiClient`] is the concrete client behind the console and the one-shot
//! commands. The [`Backend`] trait abstracts it so controller behavior can
//! be driven by a scripted fake in tests.
//!
//! Failures split into two classes. [`ApiError::Application`] means the
//! server answered and said no: validation misses, unknown templates, LLM
//! failures. The message is the server's own wording and is shown to the
//! user as-is. [`ApiError::Transport`] means no usable answer arrived at
//! all: connection refused, timeout, or a garbled body. The class decides
//! how a failure renders, not whether the HTTP status was an error code.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::schema::ClientConfig;
use crate::protocol::{
    AdjustToneRequest, AdjustToneResponse, ChatRequest, ChatResponse, DecodeResponse,
    EmailRequest, StatsResponse, TemplatePayload, TemplateResponse, ThreadRequest,
    ThreadResponse, ToxicityResponse,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an API call produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with `success: false`. Carries the server's
    /// error message verbatim.
    Application(String),
    /// The server could not be reached, or the answer was unusable.
    Transport(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Application(msg) => write!(f, "{msg}"),
            ApiError::Transport(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convert a response's `success`/`error` pair into the application error
/// when the server reported failure.
fn check(success: bool, error: &Option<String>) -> Result<(), ApiError> {
    if success {
        Ok(())
    } else {
        Err(ApiError::Application(
            error
                .clone()
                .unwrap_or_else(|| "request failed".to_string()),
        ))
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// The API operations the UI controller needs.
pub trait Backend {
    /// Rewrite an email; returns the rewritten text.
    fn adjust_tone(&self, request: &AdjustToneRequest) -> Result<String, ApiError>;
    /// Scan an email for toxic phrases.
    fn analyze_toxicity(&self, email: &str) -> Result<ToxicityResponse, ApiError>;
    /// Decode the hidden meaning of an email.
    fn decode_email(&self, email: &str) -> Result<DecodeResponse, ApiError>;
    /// Analyze a whole thread; returns the health report text.
    fn analyze_thread(&self, thread: &str) -> Result<String, ApiError>;
    /// Fetch a template by catalog id.
    fn load_template(&self, template_id: &str) -> Result<TemplatePayload, ApiError>;
    /// Fetch the usage counters.
    fn get_stats(&self) -> Result<StatsResponse, ApiError>;
    /// One coach turn; returns the reply text.
    fn chat(&self, message: &str, current_email: &str) -> Result<String, ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// Synchronous client for the tonedown API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn url(&self, path: &str) -> String {
        // On Windows, "localhost" may try IPv6 (::1) first, causing delays
        // when the server only binds to IPv4. Use 127.0.0.1 directly.
        format!("{}{}", self.base_url, path).replace("://localhost", "://127.0.0.1")
    }

    fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let result = ureq::post(&self.url(path))
            .timeout(self.timeout)
            .send_json(body);
        Self::read_response(result)
    }

    fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let result = ureq::get(&self.url(path)).timeout(self.timeout).call();
        Self::read_response(result)
    }

    /// Turn a `ureq` result into a typed response.
    ///
    /// 4xx/5xx answers still carry the standard failure body, so they parse
    /// into the same response type; [`check`] then routes them to
    /// [`ApiError::Application`]. Only an unparseable error body falls back
    /// to a transport error.
    fn read_response<R: DeserializeOwned>(
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<R, ApiError> {
        match result {
            Ok(resp) => resp
                .into_json::<R>()
                .map_err(|e| ApiError::Transport(format!("unreadable response: {e}"))),
            Err(ureq::Error::Status(code, resp)) => resp
                .into_json::<R>()
                .map_err(|_| ApiError::Transport(format!("server returned HTTP {code}"))),
            Err(ureq::Error::Transport(transport)) => {
                Err(ApiError::Transport(transport.to_string()))
            }
        }
    }
}

impl Backend for ApiClient {
    fn adjust_tone(&self, request: &AdjustToneRequest) -> Result<String, ApiError> {
        let resp: AdjustToneResponse = self.post_json("/adjust-tone", request)?;
        check(resp.success, &resp.error)?;
        resp.rewritten_email
            .ok_or_else(|| ApiError::Transport("response missing rewritten_email".to_string()))
    }

    fn analyze_toxicity(&self, email: &str) -> Result<ToxicityResponse, ApiError> {
        let body = EmailRequest {
            email: email.to_string(),
        };
        let resp: ToxicityResponse = self.post_json("/analyze-toxicity", &body)?;
        check(resp.success, &resp.error)?;
        Ok(resp)
    }

    fn decode_email(&self, email: &str) -> Result<DecodeResponse, ApiError> {
        let body = EmailRequest {
            email: email.to_string(),
        };
        let resp: DecodeResponse = self.post_json("/decode-email", &body)?;
        check(resp.success, &resp.error)?;
        Ok(resp)
    }

    fn analyze_thread(&self, thread: &str) -> Result<String, ApiError> {
        let body = ThreadRequest {
            thread: thread.to_string(),
        };
        let resp: ThreadResponse = self.post_json("/analyze-thread", &body)?;
        check(resp.success, &resp.error)?;
        Ok(resp.analysis)
    }

    fn load_template(&self, template_id: &str) -> Result<TemplatePayload, ApiError> {
        let resp: TemplateResponse = self.get_json(&format!("/load-template/{template_id}"))?;
        check(resp.success, &resp.error)?;
        resp.template
            .ok_or_else(|| ApiError::Transport("response missing template".to_string()))
    }

    fn get_stats(&self) -> Result<StatsResponse, ApiError> {
        let resp: StatsResponse = self.get_json("/get-stats")?;
        check(resp.success, &resp.error)?;
        Ok(resp)
    }

    fn chat(&self, message: &str, current_email: &str) -> Result<String, ApiError> {
        let body = ChatRequest {
            message: message.to_string(),
            current_email: current_email.to_string(),
        };
        let resp: ChatResponse = self.post_json("/chat", &body)?;
        check(resp.success, &resp.error)?;
        resp.reply
            .ok_or_else(|| ApiError::Transport("response missing reply".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
