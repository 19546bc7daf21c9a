//! Keyword-based intent classification.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Explain,
    Greet,
    Create,
    Fix,
    Test,
    Refactor,
    General,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Explain => "explain",
            Intent::Greet => "greet",
            Intent::Create => "create",
            Intent::Fix => "fix",
            Intent::Test => "test",
            Intent::Refactor => "refactor",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked top to bottom; the first row with a matching keyword wins.
const KEYWORD_TABLE: &[(Intent, &[&str])] = &[
    (Intent::Explain, &["explain", "what does", "how does"]),
    (Intent::Greet, &["hello", "hi", "hey"]),
    (Intent::Create, &["create", "generate", "make", "build"]),
    (Intent::Fix, &["fix", "debug", "error", "bug"]),
    (Intent::Test, &["test", "testing", "unittest"]),
    (Intent::Refactor, &["refactor", "improve", "optimize"]),
];

/// Classifies `message` by case-insensitive substring match.
///
/// Keywords are matched anywhere in the text, so "this" counts as "hi".
pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    KEYWORD_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::General)
}
