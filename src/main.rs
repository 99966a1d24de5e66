use anyhow::Result;
use clap::{Parser, Subcommand};

use tonedown::app::console;
use tonedown::cli;
use tonedown::config;
use tonedown::server;

#[derive(Debug, Parser)]
#[command(name = "tonedown")]
#[command(about = "Rewrite angry emails, decode passive aggression, coach calmer threads")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind, e.g. 127.0.0.1:5000
        #[arg(long)]
        bind: Option<String>,
    },
    /// Interactive console — four panels plus the coach chat
    Console,
    /// Rewrite an email in a chosen tone
    Rewrite {
        /// The email text; omit to read it from stdin
        text: Option<String>,
        /// Tone id: polite, neutral, professional, tech, legal, academic
        #[arg(long)]
        tone: Option<String>,
        /// How firm the rewrite should be, 0-100
        #[arg(long)]
        aggression: Option<i64>,
        /// Personality id: therapist, lawyer, diplomat, coach
        #[arg(long)]
        personality: Option<String>,
    },
    /// Scan an email for toxic phrases
    Toxicity {
        /// The email text; omit to read it from stdin
        text: Option<String>,
    },
    /// Decode what an email actually means
    Decode {
        /// The email text; omit to read it from stdin
        text: Option<String>,
    },
    /// Analyze an email thread for communication health
    Thread {
        /// The thread text; omit to read it from stdin
        text: Option<String>,
    },
    /// List email templates, or load one by id
    Template {
        /// Template id; omit to list all templates
        id: Option<String>,
    },
    /// Ask the communication coach a question
    Chat {
        /// The message to send
        #[arg(trailing_var_arg = true, required = true)]
        message: Vec<String>,
    },
    /// Show usage counters from the server
    Stats,
    /// Check config, server, API key, LLM, and the usage log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Write the default config to ~/.tonedown/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set one value, e.g. `tonedown config set general.default_tone polite`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { bind } => {
            let mut cfg = config::load();
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            server::serve(cfg)
        }
        Commands::Console => {
            let cfg = config::load();
            console::run(cfg)
        }
        Commands::Rewrite {
            text,
            tone,
            aggression,
            personality,
        } => cli::run_rewrite(text, tone, aggression, personality),
        Commands::Toxicity { text } => cli::run_toxicity(text),
        Commands::Decode { text } => cli::run_decode(text),
        Commands::Thread { text } => cli::run_thread(text),
        Commands::Template { id } => cli::run_template(id),
        Commands::Chat { message } => {
            let message = message.join(" ");
            cli::run_chat(&message)
        }
        Commands::Stats => cli::run_stats(),
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
