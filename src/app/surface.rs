//! Output surface for the controller.
//!
//! The controller never prints; it reports everything through [`Surface`].
//! [`TerminalSurface`] renders to stdout with `colored`, and tests swap in
//! a recording fake to assert on the exact sequence of UI effects.

use colored::Colorize;

use crate::app::render::{self, Segment};
use crate::app::state::{ChatAuthor, ChatEntry, Panel};
use crate::config::schema::UiConfig;
use crate::protocol::{DecodeResponse, StatsResponse, TemplatePayload, ToxicityResponse};
use crate::toxicity;

/// Everything the controller can show the user.
pub trait Surface {
    /// The active panel changed.
    fn panel_changed(&mut self, panel: Panel);
    /// The loading indicator turned on or off.
    fn loader(&mut self, on: bool);
    /// Input was missing; show the panel's prompt instead of calling out.
    fn validation_prompt(&mut self, prompt: &str);
    /// The server answered with a failure message.
    fn app_error(&mut self, message: &str);
    /// The server could not be reached.
    fn transport_error(&mut self, message: &str);
    /// A rewrite came back.
    fn rewrite_result(&mut self, text: &str);
    /// A toxicity report came back for the given email text.
    fn toxicity_report(&mut self, email: &str, response: &ToxicityResponse);
    /// A decode came back.
    fn decode_result(&mut self, response: &DecodeResponse);
    /// A thread analysis came back.
    fn thread_result(&mut self, analysis: &str);
    /// A template was fetched and placed in the rewrite draft.
    fn template_loaded(&mut self, template: &TemplatePayload);
    /// Fresh usage counters.
    fn stats(&mut self, stats: &StatsResponse);
    /// A line was appended to the coach transcript.
    fn chat_entry(&mut self, entry: &ChatEntry);
    /// The coach is busy (or done); sends are refused while busy.
    fn chat_busy(&mut self, busy: bool);
    /// Low-priority notice.
    fn note(&mut self, message: &str);
}

// ---------------------------------------------------------------------------
// Terminal rendering
// ---------------------------------------------------------------------------

/// Renders controller output to stdout.
pub struct TerminalSurface {
    ui: UiConfig,
}

impl TerminalSurface {
    pub fn new(ui: UiConfig) -> Self {
        Self { ui }
    }
}

impl Surface for TerminalSurface {
    fn panel_changed(&mut self, panel: Panel) {
        println!("{} active panel is now {}", "·".dimmed(), panel.name().bold());
    }

    fn loader(&mut self, on: bool) {
        // A line terminal has nothing to erase once the caption is printed.
        if on {
            println!("{}", self.ui.loader_caption.dimmed());
        }
    }

    fn validation_prompt(&mut self, prompt: &str) {
        println!("{}", prompt.yellow());
    }

    fn app_error(&mut self, message: &str) {
        println!("{} {}", "Error:".red().bold(), message);
    }

    fn transport_error(&mut self, message: &str) {
        println!("{} {}", "Failed:".red().bold(), message);
    }

    fn rewrite_result(&mut self, text: &str) {
        println!();
        println!("{}", "Rewritten Email".bold().cyan());
        println!("{}", "=".repeat(50));
        println!("{text}");
    }

    fn toxicity_report(&mut self, email: &str, response: &ToxicityResponse) {
        let percent = response.toxicity_percent;
        println!();
        println!("{}", "Toxicity Analysis".bold().cyan());
        println!("{}", "=".repeat(50));
        println!(
            "  {} {}% {}",
            "Toxicity:".bold(),
            percent,
            render::meter(percent as u64, 100, 20),
        );
        println!("  {}", render::severity_label(toxicity::severity(percent)));
        println!();

        let mut line = String::new();
        for segment in render::split_highlights(email, &response.highlights) {
            match segment {
                Segment::Plain(text) => line.push_str(text),
                Segment::Toxic { text, .. } => {
                    line.push_str(&text.red().bold().to_string());
                }
            }
        }
        println!("{line}");

        if response.highlights.is_empty() {
            println!();
            println!("  {}", self.ui.no_findings.green());
        } else {
            println!();
            println!("{}", "Detected Phrases".bold().cyan());
            for span in &response.highlights {
                println!("  \"{}\" (toxicity {}/10)", span.phrase, span.toxicity);
                println!("    {}", span.meaning.dimmed());
            }
        }
    }

    fn decode_result(&mut self, response: &DecodeResponse) {
        println!();
        println!("{}", "Decoded Message".bold().cyan());
        println!("{}", "=".repeat(50));
        println!(
            "  {} {}/10 {}",
            "Aggression:".bold(),
            response.aggression_score,
            render::meter(response.aggression_score as u64, 10, 10),
        );
        println!();
        println!("{}", response.analysis);
    }

    fn thread_result(&mut self, analysis: &str) {
        println!();
        println!("{}", "Thread Health Report".bold().cyan());
        println!("{}", "=".repeat(50));
        println!("{analysis}");
    }

    fn template_loaded(&mut self, template: &TemplatePayload) {
        println!(
            "{} Loaded template {} into the rewrite draft",
            "✓".green().bold(),
            template.name.bold(),
        );
        println!("  {}", template.context.dimmed());
    }

    fn stats(&mut self, stats: &StatsResponse) {
        println!();
        println!("{}", "Usage Stats".bold().cyan());
        println!("{}", "=".repeat(40));
        println!(
            "  {} {}",
            "Emails processed:".bold(),
            render::format_number(stats.emails_processed),
        );
        println!(
            "  {} {}",
            "Toxicity removed:".bold(),
            render::format_number(stats.toxicity_removed),
        );
        println!("  {} {}", "Most used tone:  ".bold(), stats.most_used_tone);
        println!("  {} {}", "Active users:    ".bold(), stats.active_users);
    }

    fn chat_entry(&mut self, entry: &ChatEntry) {
        match entry.author {
            ChatAuthor::User => println!("{} {}", "you:".bold(), entry.text),
            ChatAuthor::Coach => println!("{} {}", "coach:".cyan().bold(), entry.text),
        }
    }

    fn chat_busy(&mut self, busy: bool) {
        if busy {
            println!("{}", "coach is typing...".dimmed());
        }
    }

    fn note(&mut self, message: &str) {
        println!("{}", message.dimmed());
    }
}
