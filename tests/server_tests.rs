use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;

use tiny_http::{Header, Response, Server};

use tonedown::app::{ChatEntry, EmailController, Panel, Surface};
use tonedown::client::ApiClient;
use tonedown::config::schema::ToneDownConfig;
use tonedown::protocol::{DecodeResponse, StatsResponse, TemplatePayload, ToxicityResponse};
use tonedown::server::{self, handlers::ServerState};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Config that is deterministic on any machine: file logging off, and the
/// API key looked up in a variable that tests control.
fn test_config() -> ToneDownConfig {
    let mut config = ToneDownConfig::default();
    config.logging.enabled = false;
    config.llm.api_key_env = "TONEDOWN_TEST_ABSENT_KEY".to_string();
    config
}

/// Bind an ephemeral port, drive the request loop from a background
/// thread, and hand back the base URL.
fn spawn_server(config: ToneDownConfig) -> String {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let port = server.server_addr().to_ip().expect("ip listener").port();
    let state = Arc::new(ServerState::new(config));
    thread::spawn(move || server::run(server, state));
    format!("http://127.0.0.1:{port}")
}

/// A stand-in for the completion API that always answers with the given
/// message content.
fn spawn_model_stub(content: &str) -> String {
    let server = Server::http("127.0.0.1:0").expect("bind stub model");
    let port = server.server_addr().to_ip().expect("ip listener").port();
    let content = content.to_string();
    thread::spawn(move || {
        for request in server.incoming_requests() {
            let body = serde_json::json!({
                "choices": [{"message": {"content": content}}]
            })
            .to_string();
            let response = Response::from_string(body).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
            );
            let _ = request.respond(response);
        }
    });
    format!("http://127.0.0.1:{port}")
}

fn post(base: &str, path: &str, body: serde_json::Value) -> Result<ureq::Response, ureq::Error> {
    ureq::post(&format!("{base}{path}")).send_json(body)
}

fn get(base: &str, path: &str) -> Result<ureq::Response, ureq::Error> {
    ureq::get(&format!("{base}{path}")).call()
}

/// Unwrap an error-status reply into (status, parsed body).
fn error_body(result: Result<ureq::Response, ureq::Error>) -> (u16, serde_json::Value) {
    match result {
        Err(ureq::Error::Status(code, resp)) => {
            (code, resp.into_json().expect("error body is JSON"))
        }
        Ok(resp) => panic!("expected an error status, got {}", resp.status()),
        Err(other) => panic!("expected an error status, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Offline endpoints
// ---------------------------------------------------------------------------

#[test]
fn toxicity_endpoint_reports_exact_offsets() {
    let base = spawn_server(test_config());

    let resp = post(
        &base,
        "/analyze-toxicity",
        serde_json::json!({"email": "Per my last email, just checking in."}),
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["phrase_count"], serde_json::json!(2));
    assert_eq!(body["total_toxicity"], serde_json::json!(15));
    assert_eq!(body["toxicity_percent"], serde_json::json!(75));

    let highlights = body["highlights"].as_array().unwrap();
    assert_eq!(highlights[0]["phrase"], "per my last email");
    assert_eq!(highlights[0]["start"], 0);
    assert_eq!(highlights[0]["end"], 17);
    assert_eq!(highlights[1]["phrase"], "just checking in");
    assert_eq!(highlights[1]["start"], 19);
    assert_eq!(highlights[1]["end"], 35);
}

#[test]
fn validation_failures_return_400_with_the_message() {
    let base = spawn_server(test_config());

    let (code, body) = error_body(post(
        &base,
        "/adjust-tone",
        serde_json::json!({"email": "   "}),
    ));
    assert_eq!(code, 400);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"], "Email required");

    let (code, body) = error_body(post(&base, "/analyze-thread", serde_json::json!({})));
    assert_eq!(code, 400);
    assert_eq!(body["error"], "Thread required");

    let (code, body) = error_body(post(&base, "/chat", serde_json::json!({"message": ""})));
    assert_eq!(code, 400);
    assert_eq!(body["error"], "Message required");
}

#[test]
fn template_endpoint_serves_the_catalog() {
    let base = spawn_server(test_config());

    let resp = get(&base, "/load-template/deadline_reminder").unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["template"]["name"], "Deadline Reminder");
    assert_eq!(
        body["template"]["angry"],
        "Where is the report? This was due yesterday. This is completely unacceptable."
    );

    let (code, body) = error_body(get(&base, "/load-template/never_heard_of_it"));
    assert_eq!(code, 404);
    assert_eq!(body["error"], "Template not found");
}

#[test]
fn stats_start_at_zero() {
    let base = spawn_server(test_config());

    let body: serde_json::Value = get(&base, "/get-stats").unwrap().into_json().unwrap();
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["emails_processed"], serde_json::json!(0));
    assert_eq!(body["toxicity_removed"], serde_json::json!(0));
    assert_eq!(body["most_used_tone"], "professional");
    assert_eq!(body["active_users"], serde_json::json!(1));
}

#[test]
fn unknown_paths_get_the_standard_404() {
    let base = spawn_server(test_config());

    let (code, body) = error_body(get(&base, "/totally-unknown"));
    assert_eq!(code, 404);
    assert_eq!(body["error"], "Not found");
}

#[test]
fn malformed_request_bodies_are_a_500() {
    let base = spawn_server(test_config());

    let result = ureq::post(&format!("{base}/adjust-tone"))
        .set("Content-Type", "application/json")
        .send_string("{definitely not json");
    let (code, body) = error_body(result);
    assert_eq!(code, 500);
    assert_eq!(body["success"], serde_json::json!(false));
}

#[test]
fn missing_api_key_is_reported_by_the_server() {
    let base = spawn_server(test_config());

    let (code, body) = error_body(post(
        &base,
        "/adjust-tone",
        serde_json::json!({"email": "WHERE IS THE REPORT?"}),
    ));
    assert_eq!(code, 500);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"], "API key not configured");
}

// ---------------------------------------------------------------------------
// LLM endpoints against a stubbed model
// ---------------------------------------------------------------------------

#[test]
fn rewrite_round_trip_with_a_stubbed_model() {
    let model = spawn_model_stub("Hi, following up politely.");
    // Key lookup must succeed; from_config reads the variable at startup.
    unsafe { std::env::set_var("TONEDOWN_TEST_STUB_KEY", "test-key") };

    let mut config = test_config();
    config.llm.api_url = model;
    config.llm.api_key_env = "TONEDOWN_TEST_STUB_KEY".to_string();
    let base = spawn_server(config);

    let resp = post(
        &base,
        "/adjust-tone",
        serde_json::json!({"email": "WHERE IS THE REPORT?", "tone": "polite"}),
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.into_json().unwrap();
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["rewritten_email"], "Hi, following up politely.");

    // The successful rewrite bumps the in-memory counters.
    let stats: serde_json::Value = get(&base, "/get-stats").unwrap().into_json().unwrap();
    assert_eq!(stats["emails_processed"], serde_json::json!(1));
    assert_eq!(stats["most_used_tone"], "polite");
}

#[test]
fn decode_extracts_the_score_from_the_model_reply() {
    let model = spawn_model_stub(
        "Sounds calm, reads furious.\nPASSIVE-AGGRESSIVE SCORE: 7/10",
    );
    unsafe { std::env::set_var("TONEDOWN_TEST_STUB_KEY", "test-key") };

    let mut config = test_config();
    config.llm.api_url = model;
    config.llm.api_key_env = "TONEDOWN_TEST_STUB_KEY".to_string();
    let base = spawn_server(config);

    let body: serde_json::Value = post(
        &base,
        "/decode-email",
        serde_json::json!({"email": "Per my last email, thoughts?"}),
    )
    .unwrap()
    .into_json()
    .unwrap();

    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["aggression_score"], serde_json::json!(7));
    assert!(body["analysis"]
        .as_str()
        .unwrap()
        .contains("reads furious"));
}

#[test]
fn chat_returns_the_model_reply_verbatim() {
    let model = spawn_model_stub("Try opening with appreciation.");
    unsafe { std::env::set_var("TONEDOWN_TEST_STUB_KEY", "test-key") };

    let mut config = test_config();
    config.llm.api_url = model;
    config.llm.api_key_env = "TONEDOWN_TEST_STUB_KEY".to_string();
    let base = spawn_server(config);

    let body: serde_json::Value = post(
        &base,
        "/chat",
        serde_json::json!({"message": "how do I sound less angry?", "current_email": ""}),
    )
    .unwrap()
    .into_json()
    .unwrap();

    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["reply"], "Try opening with appreciation.");
}

// ---------------------------------------------------------------------------
// Controller against a live server
// ---------------------------------------------------------------------------

#[derive(Default, Clone)]
struct Recorder(Rc<RefCell<Vec<(String, String)>>>);

impl Recorder {
    fn events(&self) -> Vec<(String, String)> {
        self.0.borrow().clone()
    }

    fn tags(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(tag, _)| tag.clone()).collect()
    }
}

struct RecordingSurface(Recorder);

impl RecordingSurface {
    fn push(&mut self, tag: &str, payload: impl ToString) {
        self.0.0.borrow_mut().push((tag.to_string(), payload.to_string()));
    }
}

impl Surface for RecordingSurface {
    fn panel_changed(&mut self, panel: Panel) {
        self.push("panel", panel);
    }
    fn loader(&mut self, on: bool) {
        self.push("loader", on);
    }
    fn validation_prompt(&mut self, prompt: &str) {
        self.push("validation", prompt);
    }
    fn app_error(&mut self, message: &str) {
        self.push("app_error", message);
    }
    fn transport_error(&mut self, message: &str) {
        self.push("transport_error", message);
    }
    fn rewrite_result(&mut self, text: &str) {
        self.push("rewrite", text);
    }
    fn toxicity_report(&mut self, email: &str, _response: &ToxicityResponse) {
        self.push("toxicity", email);
    }
    fn decode_result(&mut self, response: &DecodeResponse) {
        self.push("decode", response.aggression_score);
    }
    fn thread_result(&mut self, analysis: &str) {
        self.push("thread", analysis);
    }
    fn template_loaded(&mut self, template: &TemplatePayload) {
        self.push("template", &template.name);
    }
    fn stats(&mut self, stats: &StatsResponse) {
        self.push("stats", stats.emails_processed);
    }
    fn chat_entry(&mut self, entry: &ChatEntry) {
        self.push("chat", &entry.text);
    }
    fn chat_busy(&mut self, busy: bool) {
        self.push("chat_busy", busy);
    }
    fn note(&mut self, message: &str) {
        self.push("note", message);
    }
}

#[test]
fn empty_draft_never_reaches_the_wire() {
    // Nothing listens here; any request would come back as a transport
    // error, so a validation-only event log proves no request was sent.
    let mut config = ToneDownConfig::default();
    config.client.base_url = "http://127.0.0.1:9".to_string();
    config.client.timeout_secs = 1;

    let recorder = Recorder::default();
    let backend = ApiClient::from_config(&config.client);
    let mut controller =
        EmailController::new(backend, RecordingSurface(recorder.clone()), &config);

    controller.rewrite();

    assert_eq!(recorder.tags(), vec!["validation"]);
    assert_eq!(
        recorder.events()[0].1,
        "Please enter an email to rewrite"
    );
}

#[test]
fn controller_rewrite_flow_against_a_live_server() {
    let model = spawn_model_stub("Hi, following up politely.");
    unsafe { std::env::set_var("TONEDOWN_TEST_STUB_KEY", "test-key") };

    let mut server_config = test_config();
    server_config.llm.api_url = model;
    server_config.llm.api_key_env = "TONEDOWN_TEST_STUB_KEY".to_string();
    let base = spawn_server(server_config);

    let mut config = ToneDownConfig::default();
    config.client.base_url = base;

    let recorder = Recorder::default();
    let backend = ApiClient::from_config(&config.client);
    let mut controller =
        EmailController::new(backend, RecordingSurface(recorder.clone()), &config);

    controller.set_draft(Panel::Rewrite, "WHERE IS THE REPORT?");
    controller.rewrite();

    // Loader on, result rendered, stats refreshed, loader off.
    assert_eq!(recorder.tags(), vec!["loader", "rewrite", "stats", "loader"]);
    let events = recorder.events();
    assert_eq!(events[1].1, "Hi, following up politely.");
    assert_eq!(events[2].1, "1");
    assert_eq!(events[3].1, "false");
}
