/// Configuration system for tonedown.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::ToneDownConfig::default()`]
/// 2. **User global config** — `~/.tonedown/config.toml`
/// 3. **Project local config** — `.tonedown.toml` in the current working directory
/// 4. **Environment variables** — `TONEDOWN_*` overrides (highest precedence)
///
/// Later layers override earlier ones at the field level. Missing sections
/// in a TOML file fall back to the previous layer's values.
///
/// # Usage
///
/// ```rust,ignore
/// use tonedown::config;
///
/// let cfg = config::load();
/// println!("serving on {}", cfg.server.bind);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::ToneDownConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved tonedown configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for all modules that need
/// configuration.
pub fn load() -> ToneDownConfig {
    let mut config = ToneDownConfig::default();

    // Layer 2: user global config (~/.tonedown/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        merge_config(&mut config, &global);
    }

    // Layer 3: project local config (.tonedown.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. Malformed files are silently ignored — a broken
/// config file must never take the tool down.
fn load_toml_file(path: Option<PathBuf>) -> Option<ToneDownConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge a loaded config layer into the base config.
///
/// Each TOML file deserializes with `serde(default)`, so unset keys in the
/// overlay already hold the built-in defaults. The overlay therefore fully
/// replaces the base: explicitly-set values win, unset values match what the
/// base had anyway.
fn merge_config(base: &mut ToneDownConfig, overlay: &ToneDownConfig) {
    *base = overlay.clone();
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.tonedown/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tonedown").join("config.toml"))
}

/// Path to the project local config: `.tonedown.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".tonedown.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` in a configured path to the home directory.
///
/// Paths without a `~` prefix pass through unchanged. Returns `None` only
/// when a `~` is present and the home directory cannot be determined.
pub fn expand_home(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        return dirs::home_dir().map(|home| home.join(rest));
    }
    if path == "~" {
        return dirs::home_dir();
    }
    Some(PathBuf::from(path))
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `TONEDOWN_BASE_URL` — API server URL the client talks to
/// - `TONEDOWN_BIND` — `host:port` for `tonedown serve`
/// - `TONEDOWN_API_URL` — upstream completions API URL
/// - `TONEDOWN_MODEL` — upstream model name
/// - `TONEDOWN_MAX_TOKENS` — completion token cap
/// - `TONEDOWN_TIMEOUT_SECS` — upstream request timeout
/// - `TONEDOWN_LOG` — usage logging enabled (`1`/`true`/`yes`/`on`)
/// - `TONEDOWN_DEFAULT_TONE` — session default tone
fn apply_env_overrides(config: &mut ToneDownConfig) {
    if let Ok(val) = std::env::var("TONEDOWN_BASE_URL")
        && !val.is_empty()
    {
        config.client.base_url = val;
    }
    if let Ok(val) = std::env::var("TONEDOWN_BIND")
        && !val.is_empty()
    {
        config.server.bind = val;
    }
    if let Ok(val) = std::env::var("TONEDOWN_API_URL")
        && !val.is_empty()
    {
        config.llm.api_url = val;
    }
    if let Ok(val) = std::env::var("TONEDOWN_MODEL")
        && !val.is_empty()
    {
        config.llm.model = val;
    }
    if let Ok(val) = std::env::var("TONEDOWN_MAX_TOKENS")
        && let Ok(n) = val.parse::<u32>()
    {
        config.llm.max_tokens = n;
    }
    if let Ok(val) = std::env::var("TONEDOWN_TIMEOUT_SECS")
        && let Ok(secs) = val.parse::<u64>()
    {
        config.llm.timeout_secs = secs;
    }
    if let Ok(val) = std::env::var("TONEDOWN_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("TONEDOWN_DEFAULT_TONE")
        && !val.is_empty()
    {
        config.general.default_tone = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.tonedown/config.toml`.
///
/// Creates the `~/.tonedown/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.tonedown/ directory")?;
    }

    fs::write(&path, ToneDownConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `llm.model`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    // Load current config or defaults
    let config = if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        // Parse as toml::Value for surgical update
        let mut value_table: toml::Value =
            toml::from_str(&content).context("failed to parse config as TOML value")?;

        set_toml_value(&mut value_table, key, value)?;

        // Write back
        let toml_str =
            toml::to_string_pretty(&value_table).context("failed to serialize config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create config directory")?;
        }
        fs::write(&path, toml_str).context("failed to write config file")?;

        return Ok(());
    } else {
        ToneDownConfig::default()
    };

    // No existing file — serialize defaults, update, write
    let toml_str = toml::to_string_pretty(&config).context("failed to serialize default config")?;
    let mut value_table: toml::Value =
        toml::from_str(&toml_str).context("failed to parse serialized defaults")?;

    set_toml_value(&mut value_table, key, value)?;

    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.is_empty() {
        anyhow::bail!("empty config key");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    // Determine the type of the existing value to parse correctly
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let existing = table.get(leaf);
    let new_value = match existing {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(_)) => {
            // Parse as comma-separated list
            let items: Vec<toml::Value> = raw_value
                .split(',')
                .map(|s| toml::Value::String(s.trim().to_string()))
                .collect();
            toml::Value::Array(items)
        }
        _ => {
            // Default to string
            toml::Value::String(raw_value.to_string())
        }
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
