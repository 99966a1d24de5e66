/// Configuration schema and defaults for the entire tonedown system.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[general]`, `[ui]`, `[client]`, `[server]`, `[llm]`, and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level tonedown configuration.
///
/// Maps directly to the `~/.tonedown/config.toml` and `.tonedown.toml` file
/// schemas. All sections and fields are optional — missing values fall back
/// to built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneDownConfig {
    pub general: GeneralConfig,
    pub ui: UiConfig,
    pub client: ClientConfig,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

/// Defaults applied to a fresh editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tone selected when a session starts. Must be a catalog tone id.
    pub default_tone: String,
    /// Aggression slider position when a session starts (0-100).
    pub default_aggression: i64,
    /// Personality selected when a session starts. Empty means none.
    pub default_personality: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_tone: "professional".to_string(),
            default_aggression: 50,
            default_personality: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// [ui]
// ---------------------------------------------------------------------------

/// User-facing message strings.
///
/// Every prompt and canned reply the controller shows lives here, so a
/// deployment can reword them without touching code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Shown when the rewrite panel is submitted with an empty draft.
    pub prompt_rewrite: String,
    /// Shown when the toxicity panel is submitted with an empty draft.
    pub prompt_toxicity: String,
    /// Shown when the decode panel is submitted with an empty draft.
    pub prompt_decode: String,
    /// Shown when the thread panel is submitted with an empty draft.
    pub prompt_thread: String,
    /// Coach reply substituted when the server reports a chat failure.
    pub chat_error_reply: String,
    /// Coach reply substituted when the server cannot be reached.
    pub chat_offline_reply: String,
    /// Shown by the toxicity panel when the scan finds nothing.
    pub no_findings: String,
    /// Caption next to the busy indicator.
    pub loader_caption: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            prompt_rewrite: "Please enter an email to rewrite".to_string(),
            prompt_toxicity: "Please enter an email to analyze".to_string(),
            prompt_decode: "Please enter an email to decode".to_string(),
            prompt_thread: "Please enter an email thread".to_string(),
            chat_error_reply: "I apologize, but I encountered an error. Please try again."
                .to_string(),
            chat_offline_reply: "Connection error. Please check your internet connection."
                .to_string(),
            no_findings: "No toxic phrases detected".to_string(),
            loader_caption: "Processing...".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [client]
// ---------------------------------------------------------------------------

/// Settings for the API client side (console and one-shot commands).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the tonedown API server.
    pub base_url: String,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Settings for `tonedown serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, `host:port`.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [llm]
// ---------------------------------------------------------------------------

/// Upstream LLM settings (OpenAI-compatible chat completions API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the completions API.
    pub api_url: String,
    /// Environment variable holding the API key. The key itself never lives
    /// in a config file.
    pub api_key_env: String,
    /// Model name.
    pub model: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
    /// Sampling temperature for email rewrites.
    pub temperature_rewrite: f64,
    /// Sampling temperature for hidden-meaning decoding.
    pub temperature_decode: f64,
    /// Sampling temperature for thread health analysis.
    pub temperature_thread: f64,
    /// Sampling temperature for the chat coach.
    pub temperature_coach: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            max_tokens: 1000,
            timeout_secs: 30,
            temperature_rewrite: 0.3,
            temperature_decode: 0.4,
            temperature_thread: 0.4,
            temperature_coach: 0.2,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Usage logging settings (server side).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether rewrite usage logging is enabled.
    pub enabled: bool,
    /// Path to the usage log file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.tonedown/usage-log.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl ToneDownConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `tonedown config init` to create a starting config file with
    /// all settings documented.
    pub fn default_toml() -> String {
        r#"# tonedown Configuration
# Corporate email tone assistant
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (TONEDOWN_*)
#   2. Project config (.tonedown.toml in current directory)
#   3. User global config (~/.tonedown/config.toml)
#   4. Built-in defaults

[general]
default_tone = "professional"   # polite | neutral | professional | tech | legal | academic
default_aggression = 50         # 0 = soft and apologetic, 100 = direct and firm
default_personality = ""        # therapist | lawyer | diplomat | coach, empty = none

[ui]
prompt_rewrite = "Please enter an email to rewrite"
prompt_toxicity = "Please enter an email to analyze"
prompt_decode = "Please enter an email to decode"
prompt_thread = "Please enter an email thread"
chat_error_reply = "I apologize, but I encountered an error. Please try again."
chat_offline_reply = "Connection error. Please check your internet connection."
no_findings = "No toxic phrases detected"
loader_caption = "Processing..."

[client]
base_url = "http://127.0.0.1:5000"    # Where console/one-shot commands send requests
timeout_secs = 30

[server]
bind = "127.0.0.1:5000"               # Address for `tonedown serve`

[llm]
api_url = "https://api.groq.com/openai/v1"
api_key_env = "GROQ_API_KEY"          # Env var holding the API key, never the key itself
model = "llama-3.1-8b-instant"
max_tokens = 1000
timeout_secs = 30
temperature_rewrite = 0.3
temperature_decode = 0.4
temperature_thread = 0.4
temperature_coach = 0.2

[logging]
enabled = true
path = "~/.tonedown/usage-log.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
