/// LLM integration — prompt building, completion calls, score extraction.
///
/// Four operations go through the LLM: tone rewrites, hidden-meaning
/// decoding, thread health analysis, and the chat coach. Each pairs a
/// template from [`prompts`] with a per-operation sampling temperature from
/// `[llm]` config, sent through [`client::LlmClient`].
///
/// The toxicity scanner deliberately does not live here: it is a fixed
/// pattern table and works with no model at all.
///
/// # Configuration
///
/// The upstream is any OpenAI-compatible completions API. The key is read
/// from the environment variable named by `[llm] api_key_env` (default
/// `GROQ_API_KEY`), never from a config file. With no key set, the server
/// still runs — LLM-backed endpoints report the failure per request.
pub mod client;
pub mod extract;
pub mod prompts;

pub use client::LlmClient;
