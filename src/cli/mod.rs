//! CLI command implementations for tonedown.
//!
//! Provides subcommand handlers for:
//! - `tonedown rewrite|toxicity|decode|thread` — one-shot panel operations
//! - `tonedown template` — list templates or load one as a rewrite draft
//! - `tonedown chat "message"` — one coach turn
//! - `tonedown stats` — usage counters from the server
//! - `tonedown health` — check config, server, API key, LLM, usage log
//! - `tonedown config show|init|set|reset` — configuration management
//!
//! Every command drives the same [`EmailController`] the console uses, so
//! validation, loading, error rendering, and stats refresh behave
//! identically everywhere.

use std::io::Read;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::app::{EmailController, Panel, TerminalSurface};
use crate::catalog;
use crate::client::{ApiClient, Backend};
use crate::config::{self, schema::ToneDownConfig};
use crate::llm::LlmClient;
use crate::server::stats;

fn build_controller(config: &ToneDownConfig) -> EmailController<ApiClient, TerminalSurface> {
    let backend = ApiClient::from_config(&config.client);
    let surface = TerminalSurface::new(config.ui.clone());
    EmailController::new(backend, surface, config)
}

/// Use the argument if given, otherwise read the text from stdin.
fn read_text_arg(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed reading text from stdin")?;
            Ok(buf)
        }
    }
}

// ---------------------------------------------------------------------------
// tonedown rewrite | toxicity | decode | thread
// ---------------------------------------------------------------------------

/// Rewrite an email in the selected tone.
pub fn run_rewrite(
    text: Option<String>,
    tone: Option<String>,
    aggression: Option<i64>,
    personality: Option<String>,
) -> Result<()> {
    let config = config::load();
    let mut controller = build_controller(&config);

    let email = read_text_arg(text)?;
    controller.set_draft(Panel::Rewrite, email);
    if let Some(tone) = tone {
        controller.set_tone(&tone);
    }
    if let Some(level) = aggression {
        controller.set_aggression(level);
    }
    if let Some(personality) = personality {
        controller.set_personality(Some(&personality));
    }

    controller.rewrite();
    Ok(())
}

/// Scan an email for toxic phrases.
pub fn run_toxicity(text: Option<String>) -> Result<()> {
    let config = config::load();
    let mut controller = build_controller(&config);
    let email = read_text_arg(text)?;
    controller.set_draft(Panel::Toxicity, email);
    controller.analyze_toxicity();
    Ok(())
}

/// Decode what an email actually means.
pub fn run_decode(text: Option<String>) -> Result<()> {
    let config = config::load();
    let mut controller = build_controller(&config);
    let email = read_text_arg(text)?;
    controller.set_draft(Panel::Decode, email);
    controller.decode_email();
    Ok(())
}

/// Analyze an email thread for communication health.
pub fn run_thread(text: Option<String>) -> Result<()> {
    let config = config::load();
    let mut controller = build_controller(&config);
    let thread = read_text_arg(text)?;
    controller.set_draft(Panel::Thread, thread);
    controller.analyze_thread();
    Ok(())
}

// ---------------------------------------------------------------------------
// tonedown template
// ---------------------------------------------------------------------------

/// List templates, or load one and print its draft text.
pub fn run_template(id: Option<String>) -> Result<()> {
    match id {
        None => {
            println!("{}", "Templates".bold().cyan());
            for template in catalog::TEMPLATES {
                println!("  {:<18} {}", template.id.bold(), template.name);
                println!("  {:<18} {}", "", template.context.dimmed());
            }
        }
        Some(id) => {
            let config = config::load();
            let mut controller = build_controller(&config);
            controller.load_template(&id);
            let draft = controller.state.draft(Panel::Rewrite);
            if !draft.is_empty() {
                println!();
                println!("{draft}");
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// tonedown chat
// ---------------------------------------------------------------------------

/// One coach turn without entering the console.
pub fn run_chat(message: &str) -> Result<()> {
    let config = config::load();
    let mut controller = build_controller(&config);
    controller.send_chat(message);
    Ok(())
}

// ---------------------------------------------------------------------------
// tonedown stats
// ---------------------------------------------------------------------------

/// Show the server's usage counters.
pub fn run_stats() -> Result<()> {
    let config = config::load();
    let mut controller = build_controller(&config);
    controller.refresh_stats();
    Ok(())
}

// ---------------------------------------------------------------------------
// tonedown health
// ---------------------------------------------------------------------------

/// Check config files, server reachability, API key, LLM, and the log.
pub fn run_health() -> Result<()> {
    println!("{}", "tonedown Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // 0. Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.tonedown/config.toml found"
        } else {
            "not found (run `tonedown config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".tonedown.toml found"
        } else {
            "none (optional)"
        },
    );

    // 1. API server
    let client = ApiClient::from_config(&cfg.client);
    let server_ok = client.get_stats().is_ok();
    let server_detail = if server_ok {
        format!("reachable at {}", cfg.client.base_url)
    } else {
        "not reachable — is the server running? (tonedown serve)".to_string()
    };
    print_health_item("API server", server_ok, &server_detail);

    // 2. LLM credentials and connectivity
    let llm = LlmClient::from_config(&cfg.llm);
    let key_ok = llm.is_configured();
    print_health_item(
        "API key",
        key_ok,
        &if key_ok {
            format!("{} is set", cfg.llm.api_key_env)
        } else {
            format!("{} not set — LLM endpoints will fail", cfg.llm.api_key_env)
        },
    );

    if key_ok {
        let llm_ok = llm.is_healthy();
        let llm_detail = if llm_ok {
            format!("reachable at {}", cfg.llm.api_url)
        } else {
            "not reachable — check the API URL and key".to_string()
        };
        print_health_item("LLM endpoint", llm_ok, &llm_detail);
        print_health_item("Model", true, llm.model_name());
    }

    // 3. Usage log
    match stats::usage_log_path(&cfg.logging) {
        None => print_health_item("Usage log", true, "disabled in config"),
        Some(path) => {
            let log_exists = path.exists();
            let detail = if log_exists {
                format!("{} entries", stats::read_usage_events(&path).len())
            } else {
                "no log file yet".to_string()
            };
            print_health_item("Usage log", log_exists, &detail);
        }
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// tonedown config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective tonedown Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.tonedown/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.tonedown/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".tonedown.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".tonedown.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "TONEDOWN_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.tonedown/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to customize tonedown behavior.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_argument_wins_over_stdin() {
        let text = read_text_arg(Some("already provided".to_string())).unwrap();
        assert_eq!(text, "already provided");
    }
}
