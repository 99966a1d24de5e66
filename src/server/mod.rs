//! Embedded HTTP API server for tonedown.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) exposing the
//! JSON endpoints the console and one-shot commands consume: tone rewrites,
//! toxicity scans, email decoding, thread analysis, templates, stats, and
//! the chat coach.
//!
//! Launched via `tonedown serve` (default: `http://127.0.0.1:5000`).

pub mod handlers;
pub mod stats;

use std::io::{Cursor, Read};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::ToneDownConfig;

use handlers::ServerState;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the API server on the configured address.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user assistant). Gracefully handles errors per-request
/// without crashing the server.
pub fn serve(config: ToneDownConfig) -> Result<()> {
    let bind = config.server.bind.clone();
    let server = Server::http(&bind)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {bind}: {e}"))?;

    let state = Arc::new(ServerState::new(config));

    println!("tonedown API listening at http://{bind}");
    if !state.llm.is_configured() {
        println!(
            "{}",
            format!(
                "warning: {} is not set, LLM endpoints will report errors until it is exported",
                state.config.llm.api_key_env
            )
            .yellow()
        );
    }
    println!("Press Ctrl+C to stop.\n");

    run(server, state);

    Ok(())
}

/// Accept loop, one request at a time.
///
/// Split from [`serve`] so tests can bind an ephemeral port and drive the
/// loop from a background thread.
pub fn run(server: Server, state: Arc<ServerState>) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        // Read body up-front for methods that carry one
        let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let result = dispatch(&state, &method, &url, body.as_deref());

        match result {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                let body = serde_json::json!({ "success": false, "error": e.to_string() })
                    .to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
            }
        }

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    state: &ServerState,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Post, "/adjust-tone") => handlers::adjust_tone(state, body),
        (&Method::Post, "/analyze-toxicity") => handlers::analyze_toxicity(body),
        (&Method::Post, "/decode-email") => handlers::decode_email(state, body),
        (&Method::Post, "/analyze-thread") => handlers::analyze_thread(state, body),
        (&Method::Post, "/chat") => handlers::chat(state, body),
        (&Method::Get, "/get-stats") => handlers::get_stats(state),
        (&Method::Get, p) if p.starts_with("/load-template/") => {
            let template_id = &p["/load-template/".len()..];
            handlers::load_template(template_id)
        }

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// 404 response with the standard failure body.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"success": false, "error": "Not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}
