/// Integration tests for prompt construction and reply parsing.
///
/// Unit tests for the individual pieces live in each module's
/// `#[cfg(test)]` block. These cover the round trip the server relies
/// on: prompts demand labelled score lines, and the extractor pulls the
/// numbers back out of realistic replies.
///
/// Tests that require a live completion API are gated behind the
/// `TONEDOWN_TEST_LLM` environment variable (set to `1` to run).
use tonedown::config::schema::LlmConfig;
use tonedown::llm::LlmClient;
use tonedown::llm::extract::extract_aggression_score;
use tonedown::llm::prompts;

// ---------------------------------------------------------------------------
// Prompt / extractor round trips
// ---------------------------------------------------------------------------

#[test]
fn decode_prompt_and_extractor_agree_on_the_score_format() {
    let prompt = prompts::build_decode_prompt("Per my last email, please advise.");
    assert!(prompt.contains("PASSIVE-AGGRESSIVE SCORE"));

    // A reply in exactly the shape the prompt demands.
    let reply = "\
TRANSLATION: You ignored my email and I am running out of patience.\n\
PASSIVE-AGGRESSIVE SCORE: 8/10\n\
HIDDEN MEANING: The sender wants an answer today.";
    assert_eq!(extract_aggression_score(reply), 8);
}

#[test]
fn rewrite_prompt_carries_every_setting() {
    let prompt =
        prompts::build_rewrite_prompt("WHERE IS THE REPORT?", "legal", 85, Some("lawyer"));

    assert!(prompt.contains("WHERE IS THE REPORT?"));
    assert!(prompt.contains("legal"));
    assert!(prompt.contains("direct, firm"));
    assert!(prompt.contains("Write in the style of a lawyer"));
    assert!(prompt.ends_with("REWRITTEN EMAIL:"));
}

#[test]
fn coach_prompt_only_mentions_a_draft_when_there_is_one() {
    let with_draft = prompts::build_coach_prompt("is this too harsh?", "my current draft");
    assert!(with_draft.contains("Current email draft:"));
    assert!(with_draft.contains("my current draft"));

    let without_draft = prompts::build_coach_prompt("is this too harsh?", "");
    assert!(!without_draft.contains("Current email draft:"));
}

#[test]
fn scores_outside_the_scale_are_handled() {
    assert_eq!(extract_aggression_score("SCORE: 15/10"), 10);
    assert_eq!(extract_aggression_score("nothing numeric here"), 5);
    assert_eq!(extract_aggression_score(""), 5);
}

// ---------------------------------------------------------------------------
// Live completion API tests (gated behind TONEDOWN_TEST_LLM=1)
// ---------------------------------------------------------------------------

/// Round trip against the real completion API.
///
/// To run: `TONEDOWN_TEST_LLM=1 cargo test llm_live` with the API key
/// exported in the environment.
#[test]
fn llm_live_complete_round_trip() {
    if std::env::var("TONEDOWN_TEST_LLM").unwrap_or_default() != "1" {
        eprintln!("Skipping live LLM test (set TONEDOWN_TEST_LLM=1 to enable)");
        return;
    }

    let config = LlmConfig::default();
    let client = LlmClient::from_config(&config);
    assert!(
        client.is_configured(),
        "export the API key to run live tests"
    );
    assert!(client.is_healthy(), "completion API should be reachable");

    let prompt = prompts::build_rewrite_prompt("WHERE IS THE REPORT?", "polite", 20, None);
    let reply = client
        .complete(&prompt, config.temperature_rewrite)
        .expect("completion should succeed");
    assert!(!reply.trim().is_empty(), "model reply should be non-empty");
}
