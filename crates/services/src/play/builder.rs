use rand::rng;
use rand::seq::SliceRandom;

use game_core::Session;
use game_core::model::GameDescriptor;
use game_core::session::SessionError;

/// Builds a [`Session`] from content-collaborator descriptors, scrambling
/// the tile order of headline units on the way in.
pub struct SessionBuilder {
    shuffle_tiles: bool,
}

impl SessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shuffle_tiles: true,
        }
    }

    /// Disable tile shuffling (tests present headlines in canonical order).
    #[must_use]
    pub fn with_shuffle_tiles(mut self, shuffle: bool) -> Self {
        self.shuffle_tiles = shuffle;
        self
    }

    /// Build a session over the descriptors.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no descriptors are supplied.
    pub fn build(self, descriptors: Vec<GameDescriptor>) -> Result<Session, SessionError> {
        let prepared = descriptors
            .into_iter()
            .map(|d| self.prepare(d))
            .collect();
        Session::new(prepared)
    }

    fn prepare(&self, descriptor: GameDescriptor) -> GameDescriptor {
        if !self.shuffle_tiles {
            return descriptor;
        }
        let Some(prompt) = descriptor.scramble_prompt() else {
            return descriptor;
        };

        let canonical = prompt.canonical_tokens().to_vec();
        let mut tokens = canonical.clone();
        let mut rng = rng();
        tokens.as_mut_slice().shuffle(&mut rng);

        // Never present the solved order when another arrangement exists.
        // A one-step rotation differs from the original unless every token
        // is identical.
        let all_identical = canonical.windows(2).all(|w| w[0] == w[1]);
        if tokens == canonical && !all_identical {
            tokens.rotate_left(1);
        }

        descriptor.with_display_tokens(tokens)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::model::{ArticleGuid, GameId, OptionKey, QuizPrompt};
    use game_core::unit::{PromptRef, UnitKind};

    fn guid() -> ArticleGuid {
        "7f000000-0000-4000-8000-000000000000".parse().unwrap()
    }

    fn scramble(id: u64, headline: &str) -> GameDescriptor {
        GameDescriptor::scramble(GameId::new(id), headline, guid())
    }

    #[test]
    fn empty_descriptor_list_is_rejected() {
        let err = SessionBuilder::new().build(Vec::new()).unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn shuffled_tiles_are_a_rearrangement_and_never_the_solution() {
        let headline = "one two three four five six seven";
        let session = SessionBuilder::new()
            .build(vec![scramble(1, headline)])
            .unwrap();

        let UnitKind::Scramble { prompt } = session.unit().kind() else {
            panic!("expected a scramble unit");
        };

        let mut sorted_display = prompt.display_tokens().to_vec();
        let mut sorted_canonical = prompt.canonical_tokens().to_vec();
        sorted_display.sort_unstable();
        sorted_canonical.sort_unstable();
        assert_eq!(sorted_display, sorted_canonical);
        assert_ne!(prompt.display_tokens(), prompt.canonical_tokens());
    }

    #[test]
    fn single_token_headline_keeps_its_order() {
        let session = SessionBuilder::new().build(vec![scramble(1, "Solo")]).unwrap();
        let UnitKind::Scramble { prompt } = session.unit().kind() else {
            panic!("expected a scramble unit");
        };
        assert_eq!(prompt.display_tokens(), &["Solo"]);
    }

    #[test]
    fn shuffling_can_be_disabled() {
        let session = SessionBuilder::new()
            .with_shuffle_tiles(false)
            .build(vec![scramble(1, "The cat sat")])
            .unwrap();
        let UnitKind::Scramble { prompt } = session.unit().kind() else {
            panic!("expected a scramble unit");
        };
        assert_eq!(prompt.display_tokens(), prompt.canonical_tokens());
    }

    #[test]
    fn quiz_descriptors_pass_through_untouched() {
        let prompt = QuizPrompt::new(
            "Q?",
            ["one", "two", "three", "four"].map(String::from),
            OptionKey::C,
        )
        .unwrap();
        let mut session = SessionBuilder::new()
            .build(vec![GameDescriptor::quiz(
                GameId::new(1),
                vec![prompt.clone()],
            )])
            .unwrap();

        session.unit_mut().begin().unwrap();
        match session.unit().current_prompt() {
            Some(PromptRef::Quiz(current)) => assert_eq!(current, &prompt),
            other => panic!("expected a quiz prompt, got {other:?}"),
        }
    }
}
