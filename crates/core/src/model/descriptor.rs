use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{ArticleGuid, GameId, QuizPrompt, ScramblePrompt};

/// Discriminator for the two playable unit families.
///
/// Doubles as the namespace key for persisted history records, which keep
/// quiz and scramble stores separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVariant {
    Quiz,
    Scramble,
}

impl GameVariant {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Quiz => "quiz",
            GameVariant::Scramble => "scramble",
        }
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific content of a game descriptor.
///
/// `display_tokens` for scramble is filled in by the session builder; the
/// content collaborator supplies only the headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum DescriptorPayload {
    Quiz {
        prompts: Vec<QuizPrompt>,
    },
    Scramble {
        headline: String,
        article_guid: ArticleGuid,
        #[serde(default)]
        display_tokens: Vec<String>,
    },
}

/// Immutable source data for one playable unit within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDescriptor {
    id: GameId,
    #[serde(flatten)]
    payload: DescriptorPayload,
}

impl GameDescriptor {
    #[must_use]
    pub fn quiz(id: GameId, prompts: Vec<QuizPrompt>) -> Self {
        Self {
            id,
            payload: DescriptorPayload::Quiz { prompts },
        }
    }

    #[must_use]
    pub fn scramble(id: GameId, headline: impl Into<String>, article_guid: ArticleGuid) -> Self {
        Self {
            id,
            payload: DescriptorPayload::Scramble {
                headline: headline.into(),
                article_guid,
                display_tokens: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn payload(&self) -> &DescriptorPayload {
        &self.payload
    }

    #[must_use]
    pub fn variant(&self) -> GameVariant {
        match self.payload {
            DescriptorPayload::Quiz { .. } => GameVariant::Quiz,
            DescriptorPayload::Scramble { .. } => GameVariant::Scramble,
        }
    }

    /// GUID of the backing article, present for scramble units only.
    #[must_use]
    pub fn article_guid(&self) -> Option<ArticleGuid> {
        match &self.payload {
            DescriptorPayload::Quiz { .. } => None,
            DescriptorPayload::Scramble { article_guid, .. } => Some(*article_guid),
        }
    }

    /// Number of prompts a unit built from this descriptor will hold.
    ///
    /// A scramble unit holds exactly one prompt, or none when the headline
    /// carries no tokens.
    #[must_use]
    pub fn total_prompts(&self) -> usize {
        match &self.payload {
            DescriptorPayload::Quiz { prompts } => prompts.len(),
            DescriptorPayload::Scramble { headline, .. } => {
                if headline.split_whitespace().next().is_some() {
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Replace the scramble display order; a no-op for quiz descriptors.
    #[must_use]
    pub fn with_display_tokens(mut self, tokens: Vec<String>) -> Self {
        if let DescriptorPayload::Scramble { display_tokens, .. } = &mut self.payload {
            *display_tokens = tokens;
        }
        self
    }

    /// The scramble prompt this descriptor describes, if it is a scramble.
    ///
    /// Falls back to canonical token order when the stored display order is
    /// missing or is not a rearrangement of the headline tokens.
    #[must_use]
    pub fn scramble_prompt(&self) -> Option<ScramblePrompt> {
        let DescriptorPayload::Scramble {
            headline,
            display_tokens,
            ..
        } = &self.payload
        else {
            return None;
        };
        let canonical: Vec<String> = headline.split_whitespace().map(String::from).collect();
        let prompt = ScramblePrompt::new(canonical.clone(), display_tokens.clone())
            .unwrap_or_else(|_| ScramblePrompt::unshuffled(canonical));
        Some(prompt)
    }
}
