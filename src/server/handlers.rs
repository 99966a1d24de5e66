//! JSON endpoint handlers for the tonedown API.
//!
//! Each handler corresponds to one endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. Failures the caller can
//! act on (validation, unknown templates, LLM errors) come back as 4xx/5xx
//! with a `{"success": false, "error": ...}` body. Clients key off the
//! `success` flag, not the status code.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::catalog;
use crate::config::ToneDownConfig;
use crate::llm::prompts;
use crate::llm::{LlmClient, extract};
use crate::protocol::{
    AdjustToneRequest, AdjustToneResponse, ChatRequest, ChatResponse, DecodeResponse,
    EmailRequest, ErrorBody, TemplateResponse, ThreadRequest, ThreadResponse, ToxicityResponse,
};
use crate::toxicity;

use super::content_type_json;
use super::stats::{self, UsageEvent, UsageStats};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// State shared across the request loop.
///
/// The LLM client is built once at startup, so the API key is read from the
/// environment exactly once per server process.
pub struct ServerState {
    pub config: ToneDownConfig,
    pub llm: LlmClient,
    pub stats: Mutex<UsageStats>,
    pub log_path: Option<PathBuf>,
}

impl ServerState {
    /// Build state from the resolved config, replaying the usage log into
    /// the counters so `/get-stats` carries over across restarts.
    pub fn new(config: ToneDownConfig) -> Self {
        let llm = LlmClient::from_config(&config.llm);
        let log_path = stats::usage_log_path(&config.logging);
        let counters = match &log_path {
            Some(path) => UsageStats::rebuild(&stats::read_usage_events(path)),
            None => UsageStats::new(),
        };

        Self {
            config,
            llm,
            stats: Mutex::new(counters),
            log_path,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a 200 JSON response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Build an error response with the standard failure body.
fn json_error(status: u16, message: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(&ErrorBody::new(message))
        .context("failed to serialize error response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status)))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /adjust-tone` — rewrite an email in the requested tone.
///
/// The stats counter and usage log only move on success, so
/// `emails_processed` counts rewrites that actually happened.
pub fn adjust_tone(
    state: &ServerState,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: AdjustToneRequest =
        serde_json::from_str(body.unwrap_or("{}")).context("invalid /adjust-tone request body")?;

    let email = req.email.trim();
    if email.is_empty() {
        return json_error(400, "Email required");
    }

    let prompt =
        prompts::build_rewrite_prompt(email, &req.tone, req.aggression, req.personality.as_deref());

    let start = Instant::now();
    let rewritten = match state.llm.complete(&prompt, state.config.llm.temperature_rewrite) {
        Ok(text) => text,
        Err(e) => return json_error(500, &e.to_string()),
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    state.stats.lock().unwrap().record_rewrite(&req.tone);
    if let Some(path) = &state.log_path {
        let _ = stats::append_usage_event(path, &UsageEvent::now(&req.tone, Some(latency_ms)));
    }

    json_response(&AdjustToneResponse::ok(rewritten))
}

/// `POST /analyze-toxicity` — scan for passive-aggressive phrases.
///
/// Purely table-driven, no LLM call. Highlight offsets are byte indices
/// into the trimmed email text.
pub fn analyze_toxicity(body: Option<&str>) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: EmailRequest = serde_json::from_str(body.unwrap_or("{}"))
        .context("invalid /analyze-toxicity request body")?;

    let email = req.email.trim();
    if email.is_empty() {
        return json_error(400, "Email required");
    }

    let report = toxicity::scan(email);
    json_response(&ToxicityResponse::ok(report))
}

/// `POST /decode-email` — reveal what a corporate email actually says.
pub fn decode_email(
    state: &ServerState,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: EmailRequest =
        serde_json::from_str(body.unwrap_or("{}")).context("invalid /decode-email request body")?;

    let email = req.email.trim();
    if email.is_empty() {
        return json_error(400, "Email required");
    }

    let prompt = prompts::build_decode_prompt(email);
    match state.llm.complete(&prompt, state.config.llm.temperature_decode) {
        Ok(analysis) => {
            let score = extract::extract_aggression_score(&analysis);
            json_response(&DecodeResponse::ok(analysis, score))
        }
        Err(e) => json_error(500, &e.to_string()),
    }
}

/// `POST /analyze-thread` — communication health report for a whole thread.
pub fn analyze_thread(
    state: &ServerState,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: ThreadRequest = serde_json::from_str(body.unwrap_or("{}"))
        .context("invalid /analyze-thread request body")?;

    let thread = req.thread.trim();
    if thread.is_empty() {
        return json_error(400, "Thread required");
    }

    let prompt = prompts::build_thread_prompt(thread);
    match state.llm.complete(&prompt, state.config.llm.temperature_thread) {
        Ok(analysis) => json_response(&ThreadResponse::ok(analysis)),
        Err(e) => json_error(500, &e.to_string()),
    }
}

/// `GET /load-template/{id}` — canned angry-email starters.
pub fn load_template(template_id: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    match catalog::template_by_id(template_id) {
        Some(template) => json_response(&TemplateResponse::ok(template.into())),
        None => json_error(404, "Template not found"),
    }
}

/// `GET /get-stats` — usage counters.
pub fn get_stats(state: &ServerState) -> Result<Response<Cursor<Vec<u8>>>> {
    let counters = state.stats.lock().unwrap();
    json_response(&counters.to_response())
}

/// `POST /chat` — one turn with the email coach.
///
/// Stateless on the server side: the client sends its draft along with
/// every message, and conversation history stays in the client.
pub fn chat(state: &ServerState, body: Option<&str>) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: ChatRequest =
        serde_json::from_str(body.unwrap_or("{}")).context("invalid /chat request body")?;

    let message = req.message.trim();
    if message.is_empty() {
        return json_error(400, "Message required");
    }

    let prompt = prompts::build_coach_prompt(message, req.current_email.trim());
    match state.llm.complete(&prompt, state.config.llm.temperature_coach) {
        Ok(reply) => json_response(&ChatResponse::ok(reply)),
        Err(e) => json_error(500, &e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
