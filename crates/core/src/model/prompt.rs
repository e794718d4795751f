use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── PROMPT ERRORS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PromptError {
    #[error("question text is empty")]
    EmptyQuestion,

    #[error("option {0} has no text")]
    EmptyOption(OptionKey),

    #[error("display tokens are not a rearrangement of the canonical tokens")]
    TokenMismatch,
}

//
// ─── OPTION KEY ────────────────────────────────────────────────────────────────
//

/// The four answer slots of a quiz prompt.
///
/// Option codes compare by exact equality; parsing accepts only the
/// lowercase codes the content payload uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// All keys in display order.
    #[must_use]
    pub fn all() -> [OptionKey; 4] {
        [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D]
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::A => "a",
            OptionKey::B => "b",
            OptionKey::C => "c",
            OptionKey::D => "d",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing an option code from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown option code: {code}")]
pub struct ParseOptionKeyError {
    code: String,
}

impl FromStr for OptionKey {
    type Err = ParseOptionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(OptionKey::A),
            "b" => Ok(OptionKey::B),
            "c" => Ok(OptionKey::C),
            "d" => Ok(OptionKey::D),
            other => Err(ParseOptionKeyError {
                code: other.to_string(),
            }),
        }
    }
}

//
// ─── QUIZ PROMPT ───────────────────────────────────────────────────────────────
//

/// One multiple-choice question with four options and a single correct key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizPrompt {
    question: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
    correct: OptionKey,
}

impl QuizPrompt {
    /// Build a quiz prompt, validating that the question and every option
    /// carry text.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::EmptyQuestion` or `PromptError::EmptyOption`.
    pub fn new(
        question: impl Into<String>,
        options: [String; 4],
        correct: OptionKey,
    ) -> Result<Self, PromptError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(PromptError::EmptyQuestion);
        }
        for (key, text) in OptionKey::all().iter().zip(options.iter()) {
            if text.trim().is_empty() {
                return Err(PromptError::EmptyOption(*key));
            }
        }
        let [option_a, option_b, option_c, option_d] = options;
        Ok(Self {
            question,
            option_a,
            option_b,
            option_c,
            option_d,
            correct,
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Text of the option behind the given key.
    #[must_use]
    pub fn option(&self, key: OptionKey) -> &str {
        match key {
            OptionKey::A => &self.option_a,
            OptionKey::B => &self.option_b,
            OptionKey::C => &self.option_c,
            OptionKey::D => &self.option_d,
        }
    }

    #[must_use]
    pub fn correct(&self) -> OptionKey {
        self.correct
    }
}

//
// ─── SCRAMBLE PROMPT ───────────────────────────────────────────────────────────
//

/// A headline split into tokens, plus the order the tiles are presented in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScramblePrompt {
    canonical_tokens: Vec<String>,
    display_tokens: Vec<String>,
}

impl ScramblePrompt {
    /// Build a scramble prompt from canonical tokens and a display order.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::TokenMismatch` if `display_tokens` is not a
    /// rearrangement of `canonical_tokens`.
    pub fn new(
        canonical_tokens: Vec<String>,
        display_tokens: Vec<String>,
    ) -> Result<Self, PromptError> {
        let mut canonical_sorted = canonical_tokens.clone();
        let mut display_sorted = display_tokens.clone();
        canonical_sorted.sort_unstable();
        display_sorted.sort_unstable();
        if canonical_sorted != display_sorted {
            return Err(PromptError::TokenMismatch);
        }
        Ok(Self {
            canonical_tokens,
            display_tokens,
        })
    }

    /// Build a prompt presenting tokens in canonical order.
    ///
    /// Shuffling of the display order happens upstream; this is the
    /// fallback when no display order was supplied.
    #[must_use]
    pub fn unshuffled(canonical_tokens: Vec<String>) -> Self {
        Self {
            display_tokens: canonical_tokens.clone(),
            canonical_tokens,
        }
    }

    #[must_use]
    pub fn canonical_tokens(&self) -> &[String] {
        &self.canonical_tokens
    }

    #[must_use]
    pub fn display_tokens(&self) -> &[String] {
        &self.display_tokens
    }

    /// The canonical headline, single-space joined.
    #[must_use]
    pub fn canonical_text(&self) -> String {
        self.canonical_tokens.join(" ")
    }

    /// True when there is nothing to arrange.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canonical_tokens.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
