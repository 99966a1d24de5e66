//! UI state for the email assistant.
//!
//! All mutable UI state lives in one [`UiState`] value owned by the
//! controller. Panels never read each other's fields directly; every
//! mutation goes through the controller, so there is exactly one place
//! where state can change.

use crate::config::schema::GeneralConfig;

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// The four input panels, each with its own draft text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Rewrite,
    Toxicity,
    Decode,
    Thread,
}

/// All panels in display order.
pub const PANELS: [Panel; 4] = [Panel::Rewrite, Panel::Toxicity, Panel::Decode, Panel::Thread];

impl Panel {
    /// Stable name used on the command line and in the console prompt.
    pub fn name(self) -> &'static str {
        match self {
            Panel::Rewrite => "rewrite",
            Panel::Toxicity => "toxicity",
            Panel::Decode => "decode",
            Panel::Thread => "thread",
        }
    }

    /// Parse a panel name as typed by the user.
    pub fn parse(name: &str) -> Option<Panel> {
        match name.trim().to_lowercase().as_str() {
            "rewrite" => Some(Panel::Rewrite),
            "toxicity" => Some(Panel::Toxicity),
            "decode" => Some(Panel::Decode),
            "thread" => Some(Panel::Thread),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Panel::Rewrite => 0,
            Panel::Toxicity => 1,
            Panel::Decode => 2,
            Panel::Thread => 3,
        }
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Chat transcript
// ---------------------------------------------------------------------------

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAuthor {
    User,
    Coach,
}

/// One line of the coach conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub author: ChatAuthor,
    pub text: String,
}

// ---------------------------------------------------------------------------
// UI state
// ---------------------------------------------------------------------------

/// The complete mutable state of the UI.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Panel the next `run` acts on.
    pub active_panel: Panel,
    /// Draft text per panel, indexed by [`Panel::index`].
    drafts: [String; 4],
    /// Tone id for rewrites.
    pub tone: String,
    /// Aggression level, 0 to 100.
    pub aggression: i64,
    /// Optional personality id for rewrites.
    pub personality: Option<String>,
    /// Count of in-flight operations. The loading indicator shows while
    /// this is nonzero, so overlapping operations cannot blank it early.
    loading: u32,
    /// Coach conversation so far, oldest first.
    pub transcript: Vec<ChatEntry>,
    /// A chat request is in flight; sends are refused until it settles.
    pub chat_in_flight: bool,
}

impl UiState {
    /// Fresh state seeded from the configured defaults.
    pub fn new(general: &GeneralConfig) -> Self {
        let personality = if general.default_personality.is_empty() {
            None
        } else {
            Some(general.default_personality.clone())
        };
        Self {
            active_panel: Panel::Rewrite,
            drafts: Default::default(),
            tone: general.default_tone.clone(),
            aggression: general.default_aggression,
            personality,
            loading: 0,
            transcript: Vec::new(),
            chat_in_flight: false,
        }
    }

    /// Draft text of a panel.
    pub fn draft(&self, panel: Panel) -> &str {
        &self.drafts[panel.index()]
    }

    /// Replace a panel's draft text.
    pub fn set_draft(&mut self, panel: Panel, text: impl Into<String>) {
        self.drafts[panel.index()] = text.into();
    }

    /// Mark one operation started. Returns true when the indicator should
    /// turn on (this was the first in-flight operation).
    pub fn begin_load(&mut self) -> bool {
        self.loading += 1;
        self.loading == 1
    }

    /// Mark one operation finished. Returns true when the indicator should
    /// turn off (this was the last in-flight operation).
    pub fn end_load(&mut self) -> bool {
        self.loading = self.loading.saturating_sub(1);
        self.loading == 0
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    /// Append a line to the coach transcript.
    pub fn push_chat(&mut self, author: ChatAuthor, text: impl Into<String>) -> &ChatEntry {
        self.transcript.push(ChatEntry {
            author,
            text: text.into(),
        });
        self.transcript.last().unwrap()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(&GeneralConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_config() {
        let state = UiState::default();
        assert_eq!(state.active_panel, Panel::Rewrite);
        assert_eq!(state.tone, "professional");
        assert_eq!(state.aggression, 50);
        assert_eq!(state.personality, None);
        assert!(!state.is_loading());
        assert!(state.transcript.is_empty());
    }

    #[test]
    fn configured_personality_is_picked_up() {
        let mut general = GeneralConfig::default();
        general.default_personality = "tactful".to_string();
        let state = UiState::new(&general);
        assert_eq!(state.personality.as_deref(), Some("tactful"));
    }

    #[test]
    fn drafts_are_independent_per_panel() {
        let mut state = UiState::default();
        state.set_draft(Panel::Rewrite, "angry email");
        state.set_draft(Panel::Thread, "a long thread");

        assert_eq!(state.draft(Panel::Rewrite), "angry email");
        assert_eq!(state.draft(Panel::Thread), "a long thread");
        assert_eq!(state.draft(Panel::Toxicity), "");
        assert_eq!(state.draft(Panel::Decode), "");
    }

    #[test]
    fn loader_reports_edges_only() {
        let mut state = UiState::default();
        assert!(state.begin_load());
        assert!(!state.begin_load());
        assert!(state.is_loading());
        assert!(!state.end_load());
        assert!(state.is_loading());
        assert!(state.end_load());
        assert!(!state.is_loading());
    }

    #[test]
    fn loader_never_underflows() {
        let mut state = UiState::default();
        assert!(state.end_load());
        assert!(!state.is_loading());
        assert!(state.begin_load());
        assert!(state.is_loading());
    }

    #[test]
    fn panel_names_round_trip() {
        for panel in PANELS {
            assert_eq!(Panel::parse(panel.name()), Some(panel));
        }
        assert_eq!(Panel::parse(" Rewrite "), Some(Panel::Rewrite));
        assert_eq!(Panel::parse("emails"), None);
    }

    #[test]
    fn transcript_grows_in_order() {
        let mut state = UiState::default();
        state.push_chat(ChatAuthor::User, "too harsh?");
        state.push_chat(ChatAuthor::Coach, "soften the opener");

        assert_eq!(state.transcript.len(), 2);
        assert_eq!(state.transcript[0].author, ChatAuthor::User);
        assert_eq!(state.transcript[1].text, "soften the opener");
    }
}
