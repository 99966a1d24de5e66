//! Interactive console.
//!
//! A small line-driven front end over [`EmailController`]: one session,
//! four panels, a coach chat, and the same operations the one-shot
//! commands expose. Reads commands from stdin until EOF or `quit`.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::app::render::truncate;
use crate::app::{EmailController, PANELS, Panel, Surface, TerminalSurface};
use crate::catalog;
use crate::client::{ApiClient, Backend};
use crate::config::schema::ToneDownConfig;

/// Run the console against the configured server.
pub fn run(config: ToneDownConfig) -> Result<()> {
    let backend = ApiClient::from_config(&config.client);
    let surface = TerminalSurface::new(config.ui.clone());
    let mut controller = EmailController::new(backend, surface, &config);

    println!("{}", "tonedown console".bold().cyan());
    println!("{}", "=".repeat(40));
    println!(
        "  connected to {}",
        config.client.base_url.as_str().dimmed()
    );
    println!("  type {} for commands", "help".bold());
    controller.startup();
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("tonedown:{}> ", controller.state.active_panel);
        io::stdout().flush().context("failed to flush prompt")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed reading console input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (cmd, rest) = trimmed
            .split_once(' ')
            .map(|(cmd, rest)| (cmd, rest.trim()))
            .unwrap_or((trimmed, ""));

        match cmd {
            "help" => print_help(),
            "mode" => match Panel::parse(rest) {
                Some(panel) => controller.set_panel(panel),
                None => println!(
                    "{}",
                    "panels: rewrite, toxicity, decode, thread".yellow()
                ),
            },
            "text" => {
                let panel = controller.state.active_panel;
                controller.set_draft(panel, rest);
            }
            "paste" => {
                let text = read_paste(&mut lines)?;
                let panel = controller.state.active_panel;
                controller.set_draft(panel, text);
            }
            "show" => print_state(&controller),
            "tone" => {
                if rest.is_empty() {
                    print_tones();
                } else {
                    controller.set_tone(rest);
                }
            }
            "aggression" => match rest.parse::<i64>() {
                Ok(level) => controller.set_aggression(level),
                Err(_) => println!("{}", "usage: aggression <0-100>".yellow()),
            },
            "personality" => {
                if rest.is_empty() {
                    print_personalities();
                } else if rest == "none" {
                    controller.set_personality(None);
                } else {
                    controller.set_personality(Some(rest));
                }
            }
            "template" => {
                if rest.is_empty() {
                    print_templates();
                } else {
                    controller.load_template(rest);
                }
            }
            "run" => controller.run_active(),
            "chat" => controller.send_chat(rest),
            "stats" => controller.refresh_stats(),
            "clear" => {
                let panel = controller.state.active_panel;
                controller.set_draft(panel, "");
            }
            "quit" | "exit" => break,
            _ => println!(
                "{}",
                format!("unknown command '{cmd}', type help for the list").yellow()
            ),
        }
    }

    Ok(())
}

/// Collect lines until a lone "." terminator.
fn read_paste(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String> {
    println!("{}", "paste text, end with a single '.' line".dimmed());
    let mut buf = String::new();
    for line in lines.by_ref() {
        let line = line.context("failed reading pasted input")?;
        if line.trim() == "." {
            break;
        }
        if !buf.is_empty() {
            buf.push('\n');
        }
        buf.push_str(&line);
    }
    Ok(buf)
}

fn print_help() {
    println!("{}", "Commands".bold().cyan());
    println!("  {:<22} {}", "mode <panel>", "switch panel (rewrite, toxicity, decode, thread)");
    println!("  {:<22} {}", "text <email>", "set the active panel's draft in one line");
    println!("  {:<22} {}", "paste", "set the draft from multiple lines, end with '.'");
    println!("  {:<22} {}", "show", "show the current drafts and settings");
    println!("  {:<22} {}", "tone [id]", "list tones, or pick one for rewrites");
    println!("  {:<22} {}", "aggression <0-100>", "set how firm rewrites should be");
    println!("  {:<22} {}", "personality [id]", "list personalities, pick one, or 'none'");
    println!("  {:<22} {}", "template [id]", "list templates, or load one into the rewrite draft");
    println!("  {:<22} {}", "run", "run the active panel's operation");
    println!("  {:<22} {}", "chat <message>", "ask the communication coach");
    println!("  {:<22} {}", "stats", "show usage counters");
    println!("  {:<22} {}", "clear", "clear the active panel's draft");
    println!("  {:<22} {}", "quit", "leave the console");
}

fn print_state<B: Backend, S: Surface>(controller: &EmailController<B, S>) {
    let state = &controller.state;
    println!("{}", "Session".bold().cyan());
    println!("  {} {}", "Active panel:".bold(), state.active_panel);
    println!("  {} {}", "Tone:        ".bold(), state.tone);
    println!("  {} {}", "Aggression:  ".bold(), state.aggression);
    println!(
        "  {} {}",
        "Personality: ".bold(),
        state.personality.as_deref().unwrap_or("none")
    );
    for panel in PANELS {
        let draft = state.draft(panel);
        let preview = if draft.is_empty() {
            "(empty)".dimmed().to_string()
        } else {
            truncate(&draft.replace('\n', " "), 48)
        };
        println!("  {:<10} {}", format!("{panel}:"), preview);
    }
}

fn print_tones() {
    println!("{}", "Tones".bold().cyan());
    for tone in catalog::TONES {
        println!("  {:<14} {}", tone.id.bold(), tone.label);
    }
}

fn print_personalities() {
    println!("{}", "Personalities".bold().cyan());
    for personality in catalog::PERSONALITIES {
        println!("  {:<12} {}", personality.id.bold(), personality.style.dimmed());
    }
    println!("  {:<12} {}", "none".bold(), "clear the personality".dimmed());
}

fn print_templates() {
    println!("{}", "Templates".bold().cyan());
    for template in catalog::TEMPLATES {
        println!("  {:<18} {}", template.id.bold(), template.name);
        println!("  {:<18} {}", "", template.context.dimmed());
    }
}
