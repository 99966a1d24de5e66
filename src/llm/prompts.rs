//! Prompt templates for every LLM-backed operation.
//!
//! Each endpoint builds its prompt here: tone rewrites, hidden-meaning
//! decoding, thread health analysis, and the chat coach. Prompts are single
//! user messages — the role definition for the coach is part of the prompt
//! text itself rather than a separate system message.
//!
//! The wording is deliberately rigid. The decode and thread prompts ask for
//! labelled sections (`PASSIVE-AGGRESSIVE SCORE: [X/10]`, `HEALTH SCORE:`) so
//! scores can be pulled back out of the free-form response.

use crate::catalog;

// ---------------------------------------------------------------------------
// Firmness
// ---------------------------------------------------------------------------

/// Map the 0-100 aggression slider onto firmness wording.
///
/// Below 30 is soft, 30 to 69 is balanced, 70 and up is direct.
pub fn firmness_for(aggression: i64) -> &'static str {
    if aggression < 30 {
        "soft, apologetic"
    } else if aggression < 70 {
        "balanced"
    } else {
        "direct, firm"
    }
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the rewrite prompt for `/adjust-tone`.
///
/// The tone id is interpolated as-is — unrecognized tones still produce a
/// usable instruction. A personality only adds its style line when the id is
/// in the catalog; unknown ids are ignored.
pub fn build_rewrite_prompt(
    email: &str,
    tone: &str,
    aggression: i64,
    personality: Option<&str>,
) -> String {
    let firmness = firmness_for(aggression);

    let personality_instruction = personality
        .and_then(catalog::personality_by_id)
        .map(|p| format!("\nWrite in the style of a {}: {}", p.id, p.style))
        .unwrap_or_default();

    format!(
        "Rewrite this email in a {tone} tone with {firmness} language.{personality_instruction}\n\
         \n\
         Preserve all key information. Do NOT add new details. Only change tone and phrasing.\n\
         \n\
         ORIGINAL:\n\
         {email}\n\
         \n\
         REWRITTEN EMAIL:"
    )
}

/// Build the hidden-meaning prompt for `/decode-email`.
pub fn build_decode_prompt(email: &str) -> String {
    format!(
        "Analyze this corporate email and reveal the hidden meaning:\n\
         \n\
         EMAIL:\n\
         {email}\n\
         \n\
         Provide:\n\
         \n\
         PLAIN TRANSLATION:\n\
         [Honest, direct version of what they're really saying]\n\
         \n\
         PASSIVE-AGGRESSIVE SCORE: [X/10]\n\
         \n\
         RED FLAGS:\n\
         - [List passive-aggressive phrases with translations]\n\
         \n\
         EMOTIONAL STATE:\n\
         [What the sender is actually feeling]"
    )
}

/// Build the communication-health prompt for `/analyze-thread`.
pub fn build_thread_prompt(thread: &str) -> String {
    format!(
        "Analyze this email thread for communication health:\n\
         \n\
         THREAD:\n\
         {thread}\n\
         \n\
         Provide:\n\
         \n\
         TONE TIMELINE:\n\
         [How tone changed from first to last email]\n\
         \n\
         TOXIC PHRASE COUNT:\n\
         [Count: \"per my last email\", \"as mentioned\", etc.]\n\
         \n\
         RED FLAGS:\n\
         [Most problematic patterns]\n\
         \n\
         HEALTH SCORE: [X/10]\n\
         [0=toxic, 10=healthy]\n\
         \n\
         RECOMMENDATIONS:\n\
         [How to improve communication]"
    )
}

/// Build the coaching prompt for `/chat`.
///
/// When the user has a draft open, it rides along so advice can reference
/// it. An empty draft adds nothing.
pub fn build_coach_prompt(message: &str, current_email: &str) -> String {
    let email_context = if current_email.is_empty() {
        String::new()
    } else {
        format!("\n\nCurrent email draft:\n{current_email}")
    };

    format!(
        "You are a Corporate Email Communication Coach.\n\
         Your job is to help users write better professional emails.\n\
         \n\
         Focus ONLY on:\n\
         - Tone analysis\n\
         - Professionalism\n\
         - Clarity\n\
         - Workplace appropriateness\n\
         \n\
         Rules:\n\
         1. Never change the user's original intent\n\
         2. Never add new facts or commitments\n\
         3. If email sounds harsh/passive-aggressive, explain why briefly\n\
         4. Suggest improvements respectfully\n\
         5. Keep responses concise and actionable (2-3 sentences max)\n\
         6. Stay professional - no emojis, no jokes\n\
         7. Only answer questions about email communication\n\
         \n\
         User is working in a professional environment.{email_context}\n\
         \n\
         User question:\n\
         {message}\n\
         \n\
         Provide a short, professional response:"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
