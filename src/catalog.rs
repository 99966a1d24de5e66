//! Static catalogs: tones, coaching personalities, and email templates.
//!
//! These tables back the `/load-template/{id}` endpoint, the personality
//! clause of the rewrite prompt, and the listings shown by the console's
//! `tone`, `personality`, and `template` commands.

// ---------------------------------------------------------------------------
// Tones
// ---------------------------------------------------------------------------

/// A selectable rewrite tone.
///
/// The `id` is what travels over the wire and gets interpolated into the
/// rewrite prompt; the `label` is display text. Unknown tone ids are not
/// rejected anywhere — the rewrite endpoint passes whatever it receives
/// through to the prompt and counts it in the per-tone usage stats.
#[derive(Debug, Clone, Copy)]
pub struct ToneProfile {
    pub id: &'static str,
    pub label: &'static str,
}

pub const TONES: &[ToneProfile] = &[
    ToneProfile {
        id: "polite",
        label: "Polite & Apologetic",
    },
    ToneProfile {
        id: "neutral",
        label: "Neutral & Direct",
    },
    ToneProfile {
        id: "professional",
        label: "Professional & Firm",
    },
    ToneProfile {
        id: "tech",
        label: "Tech Startup Casual",
    },
    ToneProfile {
        id: "legal",
        label: "Legal Formal",
    },
    ToneProfile {
        id: "academic",
        label: "Academic Scholarly",
    },
];

pub fn tone_by_id(id: &str) -> Option<&'static ToneProfile> {
    TONES.iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Coaching personalities
// ---------------------------------------------------------------------------

/// An optional writing persona applied to the rewrite prompt.
///
/// Unlike tones, personalities ARE validated: an unknown id simply
/// contributes no persona clause to the prompt.
#[derive(Debug, Clone, Copy)]
pub struct Personality {
    pub id: &'static str,
    pub style: &'static str,
}

pub const PERSONALITIES: &[Personality] = &[
    Personality {
        id: "therapist",
        style: "Empathetic, understanding, validating feelings while being supportive",
    },
    Personality {
        id: "lawyer",
        style: "Precise, defensive, citing precedent and using legal language",
    },
    Personality {
        id: "diplomat",
        style: "Tactful, finding middle ground, emphasizing win-win solutions",
    },
    Personality {
        id: "coach",
        style: "Motivational, encouraging, focusing on growth and improvement",
    },
];

pub fn personality_by_id(id: &str) -> Option<&'static Personality> {
    PERSONALITIES.iter().find(|p| p.id == id)
}

// ---------------------------------------------------------------------------
// Email templates
// ---------------------------------------------------------------------------

/// A canned starting point for the rewrite panel.
///
/// `angry` is the deliberately hostile draft the template loads into the
/// input; `context` is a one-line description of the situation.
#[derive(Debug, Clone, Copy)]
pub struct EmailTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub angry: &'static str,
    pub context: &'static str,
}

pub const TEMPLATES: &[EmailTemplate] = &[
    EmailTemplate {
        id: "deadline_reminder",
        name: "Deadline Reminder",
        angry: "Where is the report? This was due yesterday. This is completely unacceptable.",
        context: "Following up on a missed deadline",
    },
    EmailTemplate {
        id: "meeting_request",
        name: "Difficult Conversation",
        angry: "We need to talk about your performance issues. Come to my office now.",
        context: "Requesting a sensitive meeting",
    },
    EmailTemplate {
        id: "feedback",
        name: "Critical Feedback",
        angry: "This work is terrible and full of errors. You need to redo everything immediately.",
        context: "Giving constructive criticism",
    },
    EmailTemplate {
        id: "followup",
        name: "No Response Follow-up",
        angry: "I've emailed you three times with no response. This is extremely unprofessional.",
        context: "Following up after being ignored",
    },
];

pub fn template_by_id(id: &str) -> Option<&'static EmailTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_lookup_finds_known_ids() {
        assert_eq!(tone_by_id("polite").map(|t| t.label), Some("Polite & Apologetic"));
        assert_eq!(tone_by_id("legal").map(|t| t.label), Some("Legal Formal"));
        assert!(tone_by_id("sarcastic").is_none());
    }

    #[test]
    fn tone_lookup_is_case_sensitive() {
        assert!(tone_by_id("Polite").is_none());
    }

    #[test]
    fn personality_lookup() {
        let lawyer = personality_by_id("lawyer").unwrap();
        assert!(lawyer.style.contains("precedent"));
        assert!(personality_by_id("pirate").is_none());
    }

    #[test]
    fn template_lookup() {
        let t = template_by_id("deadline_reminder").unwrap();
        assert_eq!(t.name, "Deadline Reminder");
        assert!(t.angry.contains("due yesterday"));
        assert!(template_by_id("missing").is_none());
    }

    #[test]
    fn catalog_ids_are_unique() {
        for table in [
            TONES.iter().map(|t| t.id).collect::<Vec<_>>(),
            PERSONALITIES.iter().map(|p| p.id).collect(),
            TEMPLATES.iter().map(|t| t.id).collect(),
        ] {
            let mut sorted = table.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), table.len());
        }
    }

    #[test]
    fn expected_catalog_sizes() {
        assert_eq!(TONES.len(), 6);
        assert_eq!(PERSONALITIES.len(), 4);
        assert_eq!(TEMPLATES.len(), 4);
    }
}
