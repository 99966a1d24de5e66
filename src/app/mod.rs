//! UI controller for the email assistant.
//!
//! [`EmailController`] owns the whole [`UiState`] and is the only place it
//! mutates. Each operation follows the same shape: validate the draft,
//! show the loader, call the backend, render the outcome, hide the loader.
//! Validation misses never reach the network. The backend and the output
//! surface are both traits, so tests drive the controller with a scripted
//! backend and assert on the recorded surface effects.

pub mod console;
pub mod render;
pub mod state;
pub mod surface;

use crate::catalog;
use crate::client::{ApiError, Backend};
use crate::config::schema::{ToneDownConfig, UiConfig};
use crate::protocol::AdjustToneRequest;

pub use state::{ChatAuthor, ChatEntry, PANELS, Panel, UiState};
pub use surface::{Surface, TerminalSurface};

/// Coordinates the backend, the UI state, and the output surface.
pub struct EmailController<B: Backend, S: Surface> {
    backend: B,
    surface: S,
    pub state: UiState,
    ui: UiConfig,
}

impl<B: Backend, S: Surface> EmailController<B, S> {
    pub fn new(backend: B, surface: S, config: &ToneDownConfig) -> Self {
        Self {
            backend,
            surface,
            state: UiState::new(&config.general),
            ui: config.ui.clone(),
        }
    }

    /// Initial load: fetch the usage counters once.
    pub fn startup(&mut self) {
        self.refresh_stats();
    }

    // -----------------------------------------------------------------------
    // State changes
    // -----------------------------------------------------------------------

    pub fn set_panel(&mut self, panel: Panel) {
        if self.state.active_panel != panel {
            self.state.active_panel = panel;
            self.surface.panel_changed(panel);
        }
    }

    pub fn set_draft(&mut self, panel: Panel, text: impl Into<String>) {
        self.state.set_draft(panel, text);
    }

    pub fn set_tone(&mut self, tone: &str) {
        if catalog::tone_by_id(tone).is_none() {
            self.surface
                .note(&format!("unknown tone '{tone}', sending it as-is"));
        }
        self.state.tone = tone.to_string();
    }

    pub fn set_aggression(&mut self, level: i64) {
        self.state.aggression = level.clamp(0, 100);
    }

    pub fn set_personality(&mut self, personality: Option<&str>) {
        match personality {
            Some(id) => {
                if catalog::personality_by_id(id).is_none() {
                    self.surface
                        .note(&format!("unknown personality '{id}', rewrites will not use it"));
                }
                self.state.personality = Some(id.to_string());
            }
            None => self.state.personality = None,
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Run the operation belonging to the active panel.
    pub fn run_active(&mut self) {
        match self.state.active_panel {
            Panel::Rewrite => self.rewrite(),
            Panel::Toxicity => self.analyze_toxicity(),
            Panel::Decode => self.decode_email(),
            Panel::Thread => self.analyze_thread(),
        }
    }

    /// Rewrite the email draft in the selected tone.
    pub fn rewrite(&mut self) {
        let email = self.state.draft(Panel::Rewrite).trim().to_string();
        if email.is_empty() {
            self.surface.validation_prompt(&self.ui.prompt_rewrite);
            return;
        }
        let request = AdjustToneRequest {
            email,
            tone: self.state.tone.clone(),
            aggression: self.state.aggression,
            personality: self.state.personality.clone(),
        };

        if self.state.begin_load() {
            self.surface.loader(true);
        }
        match self.backend.adjust_tone(&request) {
            Ok(text) => {
                self.surface.rewrite_result(&text);
                // A successful rewrite bumps the server counters.
                self.refresh_stats();
            }
            Err(err) => self.report_error(err),
        }
        if self.state.end_load() {
            self.surface.loader(false);
        }
    }

    /// Scan the toxicity draft for toxic phrases.
    pub fn analyze_toxicity(&mut self) {
        let email = self.state.draft(Panel::Toxicity).trim().to_string();
        if email.is_empty() {
            self.surface.validation_prompt(&self.ui.prompt_toxicity);
            return;
        }

        if self.state.begin_load() {
            self.surface.loader(true);
        }
        match self.backend.analyze_toxicity(&email) {
            Ok(report) => self.surface.toxicity_report(&email, &report),
            Err(err) => self.report_error(err),
        }
        if self.state.end_load() {
            self.surface.loader(false);
        }
    }

    /// Decode what the decode draft actually means.
    pub fn decode_email(&mut self) {
        let email = self.state.draft(Panel::Decode).trim().to_string();
        if email.is_empty() {
            self.surface.validation_prompt(&self.ui.prompt_decode);
            return;
        }

        if self.state.begin_load() {
            self.surface.loader(true);
        }
        match self.backend.decode_email(&email) {
            Ok(decoded) => self.surface.decode_result(&decoded),
            Err(err) => self.report_error(err),
        }
        if self.state.end_load() {
            self.surface.loader(false);
        }
    }

    /// Analyze the thread draft for communication health.
    pub fn analyze_thread(&mut self) {
        let thread = self.state.draft(Panel::Thread).trim().to_string();
        if thread.is_empty() {
            self.surface.validation_prompt(&self.ui.prompt_thread);
            return;
        }

        if self.state.begin_load() {
            self.surface.loader(true);
        }
        match self.backend.analyze_thread(&thread) {
            Ok(analysis) => self.surface.thread_result(&analysis),
            Err(err) => self.report_error(err),
        }
        if self.state.end_load() {
            self.surface.loader(false);
        }
    }

    /// Fetch a template, switch to the rewrite panel, and fill its draft.
    pub fn load_template(&mut self, template_id: &str) {
        match self.backend.load_template(template_id) {
            Ok(template) => {
                self.set_panel(Panel::Rewrite);
                self.state.set_draft(Panel::Rewrite, template.angry.clone());
                self.surface.template_loaded(&template);
            }
            Err(err) => self
                .surface
                .note(&format!("template load failed: {err}")),
        }
    }

    /// One coach turn. Ignored while a previous turn is still in flight;
    /// failures become canned coach replies instead of errors.
    pub fn send_chat(&mut self, message: &str) {
        let message = message.trim();
        if message.is_empty() || self.state.chat_in_flight {
            return;
        }
        let current = self.state.draft(self.state.active_panel).trim().to_string();

        let entry = self.state.push_chat(ChatAuthor::User, message);
        self.surface.chat_entry(entry);
        self.state.chat_in_flight = true;
        self.surface.chat_busy(true);

        let reply = match self.backend.chat(message, &current) {
            Ok(reply) => reply,
            Err(ApiError::Application(_)) => self.ui.chat_error_reply.clone(),
            Err(ApiError::Transport(_)) => self.ui.chat_offline_reply.clone(),
        };

        let entry = self.state.push_chat(ChatAuthor::Coach, reply);
        self.surface.chat_entry(entry);
        self.state.chat_in_flight = false;
        self.surface.chat_busy(false);
    }

    /// Fetch the usage counters and show them.
    pub fn refresh_stats(&mut self) {
        match self.backend.get_stats() {
            Ok(stats) => self.surface.stats(&stats),
            Err(err) => self.surface.note(&format!("stats unavailable: {err}")),
        }
    }

    fn report_error(&mut self, err: ApiError) {
        match err {
            ApiError::Application(msg) => self.surface.app_error(&msg),
            ApiError::Transport(msg) => self.surface.transport_error(&msg),
        }
    }
}
