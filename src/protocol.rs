//! Request and response bodies shared by the HTTP server and the API client.
//!
//! Every response carries `success` plus an optional `error`. Payload fields
//! default when absent, so an error body such as
//! `{"success": false, "error": "..."}` still deserializes into the typed
//! response on the client side. Error handling keys off `success`, not the
//! HTTP status code.

use serde::{Deserialize, Serialize};

use crate::catalog::EmailTemplate;
use crate::toxicity::{ToxicSpan, ToxicityReport};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn default_tone() -> String {
    "professional".to_string()
}

fn default_aggression() -> i64 {
    50
}

/// Body of `POST /adjust-tone`. Everything except the email is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustToneRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_aggression")]
    pub aggression: i64,
    #[serde(default)]
    pub personality: Option<String>,
}

impl Default for AdjustToneRequest {
    fn default() -> Self {
        Self {
            email: String::new(),
            tone: default_tone(),
            aggression: default_aggression(),
            personality: None,
        }
    }
}

/// Body of `POST /analyze-toxicity` and `POST /decode-email`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

/// Body of `POST /analyze-thread`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadRequest {
    #[serde(default)]
    pub thread: String,
}

/// Body of `POST /chat`. `current_email` is the draft the user is editing,
/// passed along so the coach can ground its advice; empty means no draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub current_email: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjustToneResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten_email: Option<String>,
}

impl AdjustToneResponse {
    pub fn ok(rewritten_email: String) -> Self {
        Self {
            success: true,
            error: None,
            rewritten_email: Some(rewritten_email),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToxicityResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub highlights: Vec<ToxicSpan>,
    #[serde(default)]
    pub total_toxicity: u32,
    #[serde(default)]
    pub toxicity_percent: u32,
    #[serde(default)]
    pub phrase_count: usize,
}

impl ToxicityResponse {
    pub fn ok(report: ToxicityReport) -> Self {
        Self {
            success: true,
            error: None,
            phrase_count: report.spans.len(),
            total_toxicity: report.total_score,
            toxicity_percent: report.percent,
            highlights: report.spans,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub aggression_score: u8,
}

impl DecodeResponse {
    pub fn ok(analysis: String, aggression_score: u8) -> Self {
        Self {
            success: true,
            error: None,
            analysis,
            aggression_score,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub analysis: String,
}

impl ThreadResponse {
    pub fn ok(analysis: String) -> Self {
        Self {
            success: true,
            error: None,
            analysis,
        }
    }
}

/// Template fields as served to clients. The catalog id is in the URL, not
/// the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub name: String,
    pub angry: String,
    pub context: String,
}

impl From<&EmailTemplate> for TemplatePayload {
    fn from(template: &EmailTemplate) -> Self {
        Self {
            name: template.name.to_string(),
            angry: template.angry.to_string(),
            context: template.context.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplatePayload>,
}

impl TemplateResponse {
    pub fn ok(template: TemplatePayload) -> Self {
        Self {
            success: true,
            error: None,
            template: Some(template),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub emails_processed: u64,
    #[serde(default)]
    pub toxicity_removed: u64,
    #[serde(default)]
    pub most_used_tone: String,
    #[serde(default)]
    pub active_users: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl ChatResponse {
    pub fn ok(reply: String) -> Self {
        Self {
            success: true,
            error: None,
            reply: Some(reply),
        }
    }
}

/// Body for every 4xx/5xx the server emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
