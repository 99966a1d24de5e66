/// Configuration integration tests.
///
/// Unit tests for schema defaults and TOML parsing live in the config
/// modules' `#[cfg(test)]` blocks. These tests exercise the full
/// [`config::load`] pipeline, including environment overrides.
///
/// Note: `load()` also merges any `~/.tonedown/config.toml` or
/// `.tonedown.toml` present on the machine running the tests, so the
/// assertions only cover fields pinned by environment variables, which
/// are applied last and always win.
///
/// # Safety
///
/// `std::env::set_var` / `remove_var` are `unsafe` in the 2024 edition.
/// All environment mutation is combined into a single `#[test]` so no
/// other test in this binary races with it, and the asserted fields of
/// the remaining tests are never touched by environment overrides.
use tonedown::config;

/// Helper: set an env var (wraps the `unsafe` call).
unsafe fn set_env(key: &str, val: &str) {
    unsafe { std::env::set_var(key, val) }
}

/// Helper: remove an env var (wraps the `unsafe` call).
unsafe fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

#[test]
fn environment_overrides_always_win() {
    unsafe {
        set_env("TONEDOWN_BASE_URL", "http://envhost:8123");
        set_env("TONEDOWN_BIND", "0.0.0.0:8123");
        set_env("TONEDOWN_API_URL", "http://localhost:11434/v1");
        set_env("TONEDOWN_MODEL", "llama-3.3-70b-versatile");
        set_env("TONEDOWN_MAX_TOKENS", "2048");
        set_env("TONEDOWN_TIMEOUT_SECS", "90");
        set_env("TONEDOWN_LOG", "0");
        set_env("TONEDOWN_DEFAULT_TONE", "legal");
    }

    let config = config::load();

    assert_eq!(config.client.base_url, "http://envhost:8123");
    assert_eq!(config.server.bind, "0.0.0.0:8123");
    assert_eq!(config.llm.api_url, "http://localhost:11434/v1");
    assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
    assert_eq!(config.llm.max_tokens, 2048);
    assert_eq!(config.llm.timeout_secs, 90);
    assert!(!config.logging.enabled, "TONEDOWN_LOG=0 should disable logging");
    assert_eq!(config.general.default_tone, "legal");

    // --- unparseable numbers are skipped, not fatal ---
    unsafe { set_env("TONEDOWN_MAX_TOKENS", "not-a-number") };
    let _ = config::load();

    // --- empty values are ignored entirely ---
    unsafe { set_env("TONEDOWN_MODEL", "") };
    let config = config::load();
    assert_ne!(config.llm.model, "");

    unsafe {
        remove_env("TONEDOWN_BASE_URL");
        remove_env("TONEDOWN_BIND");
        remove_env("TONEDOWN_API_URL");
        remove_env("TONEDOWN_MODEL");
        remove_env("TONEDOWN_MAX_TOKENS");
        remove_env("TONEDOWN_TIMEOUT_SECS");
        remove_env("TONEDOWN_LOG");
        remove_env("TONEDOWN_DEFAULT_TONE");
    }
}

#[test]
fn effective_config_renders_as_valid_toml() {
    let rendered = config::show_effective_config().unwrap();
    let parsed: tonedown::config::schema::ToneDownConfig =
        toml::from_str(&rendered).expect("effective config must parse back");

    // UI strings have no environment override, so they are stable here
    // no matter what the machine's config files say about other fields.
    let loaded = config::load();
    assert_eq!(parsed.ui.prompt_rewrite, loaded.ui.prompt_rewrite);
    assert_eq!(parsed.ui.chat_error_reply, loaded.ui.chat_error_reply);
}

#[test]
fn home_expansion_covers_the_log_path_forms() {
    let home = dirs::home_dir().expect("test host has a home directory");

    assert_eq!(
        config::expand_home("~/.tonedown/usage-log.jsonl"),
        Some(home.join(".tonedown").join("usage-log.jsonl"))
    );
    assert_eq!(config::expand_home("~"), Some(home));
    assert_eq!(
        config::expand_home("/var/log/tonedown.jsonl"),
        Some(std::path::PathBuf::from("/var/log/tonedown.jsonl"))
    );
}
