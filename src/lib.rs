//! tonedown — an email tone assistant for the terminal.
//!
//! Rewrites hostile emails into a chosen tone, scans drafts for
//! passive-aggressive phrases, decodes the hidden meaning of corporate
//! messages, scores thread health, and answers coaching questions — all
//! against a small JSON API served by `tonedown serve` (the AI work itself
//! is delegated to an external chat-completions LLM service).
//!
//! The crate splits into three layers:
//!
//! - [`server`] — the HTTP backend: endpoint handlers, the deterministic
//!   toxicity scanner, and usage stats.
//! - [`client`] — the typed API client and its two-class error taxonomy
//!   (application vs transport).
//! - [`app`] — the controller that owns all UI state and drives the
//!   endpoints, with display output behind the [`app::surface::Surface`]
//!   trait. The interactive console and every one-shot CLI command go
//!   through the same controller.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod llm;
pub mod protocol;
pub mod server;
pub mod toxicity;
