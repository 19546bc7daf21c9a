use crate::core::config::ModelProfile;

/// Simulated model identity that picks the reply template family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Claude,
    Gemini,
    /// The o1 reasoning models.
    Reasoning,
    /// Default persona; replies follow the detected intent.
    Gpt,
}

impl Persona {
    /// Detects the persona from a model id by case-insensitive substring.
    pub fn for_model(model_id: &str) -> Self {
        let lowered = model_id.to_lowercase();
        if lowered.contains("claude") {
            Persona::Claude
        } else if lowered.contains("gemini") {
            Persona::Gemini
        } else if lowered.contains("o1") {
            Persona::Reasoning
        } else {
            Persona::Gpt
        }
    }

    /// Fixed reply for personas that ignore intent, `None` for [`Persona::Gpt`].
    pub fn fixed_reply(self, profile: &ModelProfile) -> Option<String> {
        match self {
            Persona::Claude => Some(claude_reply(profile)),
            Persona::Gemini => Some(gemini_reply(profile)),
            Persona::Reasoning => Some(reasoning_reply(profile)),
            Persona::Gpt => None,
        }
    }
}

fn claude_reply(profile: &ModelProfile) -> String {
    format!(
        "Hi, this is Claude ({name}).\n\n\
         I read code closely and like to reason through it with you. I can help with:\n\
         - walking through what a piece of code does and why\n\
         - spotting bugs and edge cases before they bite\n\
         - suggesting cleaner structure for tangled modules\n\
         - drafting tests that pin down the behaviour you care about\n\n\
         Attach a file with --file and tell me what you are trying to do.",
        name = profile.name
    )
}

fn gemini_reply(profile: &ModelProfile) -> String {
    let vision = if profile.supports_vision {
        "I can also look at screenshots and diagrams."
    } else {
        "This model works with text only."
    };
    format!(
        "Hello from Gemini ({name}).\n\n\
         I can take in a lot of context at once ({tokens} tokens), so larger \
         files and whole-workspace questions are welcome. {vision}\n\n\
         Share the files you are working on and ask away.",
        name = profile.name,
        tokens = profile.max_tokens,
    )
}

fn reasoning_reply(profile: &ModelProfile) -> String {
    format!(
        "{name} here. I work through problems step by step before answering.\n\n\
         I am most useful for:\n\
         1. Algorithm design and complexity analysis\n\
         2. Tracking down subtle logic errors\n\
         3. Planning larger refactors\n\n\
         Describe the problem in detail and include the relevant files.",
        name = profile.name
    )
}
