use thiserror::Error;

use crate::model::{
    AnswerLogEntry, DescriptorPayload, GameDescriptor, GameId, GameVariant, OptionKey, QuizPrompt,
    ScramblePrompt,
};
use crate::validate::{self, ArrangementOutcome};

//
// ─── PLAY STATE ────────────────────────────────────────────────────────────────
//

/// States of the generic play machine shared by both unit variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Presenting,
    AwaitingSubmission,
    Feedback,
    Completed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnitError {
    #[error("unit already completed")]
    Completed,

    #[error("operation arrived in {0:?} state")]
    OutOfTurn(PlayState),

    #[error("submission does not match the unit variant")]
    VariantMismatch,
}

//
// ─── UNIT KIND ─────────────────────────────────────────────────────────────────
//

/// Tagged union of the variant-specific prompt data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    Quiz { prompts: Vec<QuizPrompt> },
    Scramble { prompt: ScramblePrompt },
}

/// Borrowed view of the prompt currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRef<'a> {
    Quiz(&'a QuizPrompt),
    Scramble(&'a ScramblePrompt),
}

//
// ─── GAME UNIT ─────────────────────────────────────────────────────────────────
//

/// One playable unit: ordered prompts, running score, answer log, and the
/// play state machine that guards scoring.
///
/// A unit built from a descriptor with no prompts reports itself completed
/// immediately with a zero score instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameUnit {
    id: GameId,
    kind: UnitKind,
    state: PlayState,
    current_prompt: usize,
    score: u32,
    passed: Option<bool>,
    answer_log: Vec<AnswerLogEntry>,
}

impl GameUnit {
    /// Instantiate a fresh unit for a descriptor.
    #[must_use]
    pub fn from_descriptor(descriptor: &GameDescriptor) -> Self {
        let kind = match descriptor.payload() {
            DescriptorPayload::Quiz { prompts } => UnitKind::Quiz {
                prompts: prompts.clone(),
            },
            DescriptorPayload::Scramble { .. } => {
                // scramble_prompt() is Some for every scramble payload
                let prompt = descriptor
                    .scramble_prompt()
                    .unwrap_or_else(|| ScramblePrompt::unshuffled(Vec::new()));
                UnitKind::Scramble { prompt }
            }
        };

        let mut unit = Self {
            id: descriptor.id(),
            kind,
            state: PlayState::Idle,
            current_prompt: 0,
            score: 0,
            passed: None,
            answer_log: Vec::new(),
        };
        if unit.total_prompts() == 0 {
            unit.state = PlayState::Completed;
        }
        unit
    }

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn variant(&self) -> GameVariant {
        match self.kind {
            UnitKind::Quiz { .. } => GameVariant::Quiz,
            UnitKind::Scramble { .. } => GameVariant::Scramble,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    #[must_use]
    pub fn state(&self) -> PlayState {
        self.state
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Pass/fail verdict, set by the scramble evaluation. Quiz units carry
    /// no verdict of their own.
    #[must_use]
    pub fn passed(&self) -> Option<bool> {
        self.passed
    }

    #[must_use]
    pub fn answer_log(&self) -> &[AnswerLogEntry] {
        &self.answer_log
    }

    #[must_use]
    pub fn total_prompts(&self) -> usize {
        match &self.kind {
            UnitKind::Quiz { prompts } => prompts.len(),
            UnitKind::Scramble { prompt } => {
                if prompt.is_empty() {
                    0
                } else {
                    1
                }
            }
        }
    }

    #[must_use]
    pub fn current_prompt_index(&self) -> usize {
        self.current_prompt
    }

    /// The prompt currently presented; `None` once the unit is completed.
    #[must_use]
    pub fn current_prompt(&self) -> Option<PromptRef<'_>> {
        if self.state == PlayState::Completed {
            return None;
        }
        match &self.kind {
            UnitKind::Quiz { prompts } => prompts.get(self.current_prompt).map(PromptRef::Quiz),
            UnitKind::Scramble { prompt } => Some(PromptRef::Scramble(prompt)),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == PlayState::Completed
    }

    /// How far through the unit the player is, as a percentage of prompts.
    ///
    /// An empty (trivially completed) unit reports 100.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        let total = self.total_prompts();
        if total == 0 {
            return 100;
        }
        percent(self.current_prompt as u32 + 1, total)
    }

    /// Score as a rounded percentage of total prompts; 0 for an empty unit.
    #[must_use]
    pub fn score_percent(&self) -> u32 {
        let total = self.total_prompts();
        if total == 0 {
            return 0;
        }
        percent(self.score, total)
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Unit start: `Idle → Presenting`.
    ///
    /// # Errors
    ///
    /// Returns `UnitError` when invoked outside `Idle`; the unit state is
    /// untouched and the call is safe to ignore.
    pub fn begin(&mut self) -> Result<(), UnitError> {
        match self.state {
            PlayState::Idle => {
                self.state = PlayState::Presenting;
                Ok(())
            }
            PlayState::Completed => Err(UnitError::Completed),
            state => Err(UnitError::OutOfTurn(state)),
        }
    }

    /// The user started interacting: `Presenting → AwaitingSubmission`.
    ///
    /// Submissions are accepted from `Presenting` as well, so this exists
    /// for controllers that mirror widget focus, not as a gate.
    ///
    /// # Errors
    ///
    /// Returns `UnitError` when invoked outside `Presenting`.
    pub fn begin_interaction(&mut self) -> Result<(), UnitError> {
        match self.state {
            PlayState::Presenting => {
                self.state = PlayState::AwaitingSubmission;
                Ok(())
            }
            PlayState::Completed => Err(UnitError::Completed),
            state => Err(UnitError::OutOfTurn(state)),
        }
    }

    /// Evaluate a quiz selection against the current prompt.
    ///
    /// Exactly one scoring event can occur per prompt index: the submission
    /// moves the machine to `Feedback`, and repeat submissions are rejected
    /// without touching score or log.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::VariantMismatch` on a scramble unit, or a state
    /// error when no submission is expected.
    pub fn check_answer(&mut self, selected: OptionKey) -> Result<bool, UnitError> {
        self.ensure_submittable()?;
        let UnitKind::Quiz { prompts } = &self.kind else {
            return Err(UnitError::VariantMismatch);
        };
        let Some(prompt) = prompts.get(self.current_prompt) else {
            return Err(UnitError::Completed);
        };

        let is_correct = validate::check_option(selected, prompt.correct());
        self.answer_log.push(AnswerLogEntry {
            prompt_index: self.current_prompt,
            submission: selected.as_str().to_string(),
            is_correct,
        });
        if is_correct {
            self.score += 1;
        }
        self.state = PlayState::Feedback;
        Ok(is_correct)
    }

    /// Evaluate a token arrangement against the canonical headline.
    ///
    /// Sets the unit verdict and completes the unit: a scramble unit holds
    /// one prompt, so its feedback phase collapses into completion.
    ///
    /// # Errors
    ///
    /// Returns `UnitError::VariantMismatch` on a quiz unit, or a state
    /// error when no submission is expected.
    pub fn check_arrangement<S: AsRef<str>>(
        &mut self,
        user_tokens: &[S],
    ) -> Result<ArrangementOutcome, UnitError> {
        self.ensure_submittable()?;
        let UnitKind::Scramble { prompt } = &self.kind else {
            return Err(UnitError::VariantMismatch);
        };

        let outcome = validate::check_arrangement(user_tokens, &prompt.canonical_text());
        self.answer_log.push(AnswerLogEntry {
            prompt_index: self.current_prompt,
            submission: outcome.normalized_user.clone(),
            is_correct: outcome.is_correct,
        });
        if outcome.is_correct {
            self.score += 1;
        }
        self.passed = Some(outcome.is_correct);
        self.state = PlayState::Completed;
        Ok(outcome)
    }

    /// Leave feedback: `Feedback → Presenting` when a prompt remains
    /// (`Ok(true)`), otherwise `Feedback → Completed` (`Ok(false)`).
    ///
    /// # Errors
    ///
    /// Returns `UnitError` when the unit is not in `Feedback`.
    pub fn next_prompt(&mut self) -> Result<bool, UnitError> {
        match self.state {
            PlayState::Feedback => {
                if self.current_prompt + 1 < self.total_prompts() {
                    self.current_prompt += 1;
                    self.state = PlayState::Presenting;
                    Ok(true)
                } else {
                    self.state = PlayState::Completed;
                    Ok(false)
                }
            }
            PlayState::Completed => Err(UnitError::Completed),
            state => Err(UnitError::OutOfTurn(state)),
        }
    }

    fn ensure_submittable(&self) -> Result<(), UnitError> {
        match self.state {
            PlayState::Presenting | PlayState::AwaitingSubmission => Ok(()),
            PlayState::Completed => Err(UnitError::Completed),
            state => Err(UnitError::OutOfTurn(state)),
        }
    }
}

fn percent(part: u32, total: usize) -> u32 {
    let total = total as u32;
    let ratio = f64::from(part) * 100.0 / f64::from(total);
    // total > 0 checked by callers, so the ratio is finite
    ratio.round() as u32
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArticleGuid;
    use uuid::Uuid;

    fn quiz_prompt(correct: OptionKey) -> QuizPrompt {
        QuizPrompt::new(
            "Q?",
            ["one", "two", "three", "four"].map(String::from),
            correct,
        )
        .unwrap()
    }

    fn quiz_unit(prompts: Vec<QuizPrompt>) -> GameUnit {
        GameUnit::from_descriptor(&GameDescriptor::quiz(GameId::new(1), prompts))
    }

    fn scramble_unit(headline: &str) -> GameUnit {
        let descriptor =
            GameDescriptor::scramble(GameId::new(2), headline, ArticleGuid::new(Uuid::nil()));
        GameUnit::from_descriptor(&descriptor)
    }

    #[test]
    fn single_prompt_quiz_scores_full_marks() {
        let mut unit = quiz_unit(vec![quiz_prompt(OptionKey::B)]);
        unit.begin().unwrap();

        let correct = unit.check_answer(OptionKey::B).unwrap();
        assert!(correct);
        assert_eq!(unit.score(), 1);
        assert_eq!(unit.score_percent(), 100);
        assert_eq!(unit.state(), PlayState::Feedback);

        assert!(!unit.next_prompt().unwrap());
        assert!(unit.is_complete());
    }

    #[test]
    fn repeat_submission_is_rejected_and_never_double_counts() {
        let mut unit = quiz_unit(vec![quiz_prompt(OptionKey::A)]);
        unit.begin().unwrap();

        assert!(unit.check_answer(OptionKey::A).unwrap());
        let err = unit.check_answer(OptionKey::A).unwrap_err();
        assert_eq!(err, UnitError::OutOfTurn(PlayState::Feedback));
        assert_eq!(unit.score(), 1);
        assert_eq!(unit.answer_log().len(), 1);
    }

    #[test]
    fn wrong_answer_is_logged_without_scoring() {
        let mut unit = quiz_unit(vec![quiz_prompt(OptionKey::C)]);
        unit.begin().unwrap();

        assert!(!unit.check_answer(OptionKey::A).unwrap());
        assert_eq!(unit.score(), 0);
        let entry = &unit.answer_log()[0];
        assert_eq!(entry.prompt_index, 0);
        assert_eq!(entry.submission, "a");
        assert!(!entry.is_correct);
    }

    #[test]
    fn quiz_walks_prompts_in_order() {
        let mut unit = quiz_unit(vec![quiz_prompt(OptionKey::A), quiz_prompt(OptionKey::B)]);
        unit.begin().unwrap();
        assert_eq!(unit.progress_percent(), 50);

        unit.check_answer(OptionKey::A).unwrap();
        assert!(unit.next_prompt().unwrap());
        assert_eq!(unit.current_prompt_index(), 1);
        assert_eq!(unit.progress_percent(), 100);

        unit.check_answer(OptionKey::D).unwrap();
        assert!(!unit.next_prompt().unwrap());
        assert!(unit.is_complete());
        assert_eq!(unit.score(), 1);
        assert_eq!(unit.score_percent(), 50);
    }

    #[test]
    fn submission_accepted_straight_from_presenting() {
        let mut unit = quiz_unit(vec![quiz_prompt(OptionKey::A)]);
        unit.begin().unwrap();
        // no begin_interaction: selecting an option is itself the interaction
        assert!(unit.check_answer(OptionKey::A).is_ok());
    }

    #[test]
    fn submission_before_begin_is_rejected() {
        let mut unit = quiz_unit(vec![quiz_prompt(OptionKey::A)]);
        let err = unit.check_answer(OptionKey::A).unwrap_err();
        assert_eq!(err, UnitError::OutOfTurn(PlayState::Idle));
        assert!(unit.answer_log().is_empty());
    }

    #[test]
    fn scramble_completes_after_one_evaluation() {
        let mut unit = scramble_unit("The cat sat");
        unit.begin().unwrap();
        unit.begin_interaction().unwrap();

        let outcome = unit.check_arrangement(&["The", "cat", "sat"]).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(unit.passed(), Some(true));
        assert!(unit.is_complete());
        assert_eq!(unit.score(), 1);

        let err = unit.check_arrangement(&["The", "cat", "sat"]).unwrap_err();
        assert_eq!(err, UnitError::Completed);
    }

    #[test]
    fn scramble_normalizes_whitespace_before_comparing() {
        let mut unit = scramble_unit("The cat sat");
        unit.begin().unwrap();

        let outcome = unit.check_arrangement(&["The ", " cat", "sat"]).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.normalized_user, "The cat sat");
    }

    #[test]
    fn failed_arrangement_fails_the_unit() {
        let mut unit = scramble_unit("The cat sat");
        unit.begin().unwrap();

        let outcome = unit.check_arrangement(&["sat", "cat", "The"]).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(unit.passed(), Some(false));
        assert!(unit.is_complete());
        assert_eq!(unit.score(), 0);
    }

    #[test]
    fn empty_unit_is_born_completed() {
        let mut unit = quiz_unit(Vec::new());
        assert!(unit.is_complete());
        assert_eq!(unit.score(), 0);
        assert_eq!(unit.score_percent(), 0);
        assert_eq!(unit.progress_percent(), 100);
        assert!(unit.current_prompt().is_none());
        assert_eq!(unit.begin().unwrap_err(), UnitError::Completed);
    }

    #[test]
    fn blank_headline_degrades_to_completed() {
        let unit = scramble_unit("   ");
        assert!(unit.is_complete());
        assert_eq!(unit.total_prompts(), 0);
    }

    #[test]
    fn submission_variant_must_match_unit_variant() {
        let mut quiz = quiz_unit(vec![quiz_prompt(OptionKey::A)]);
        quiz.begin().unwrap();
        assert_eq!(
            quiz.check_arrangement(&["x"]).unwrap_err(),
            UnitError::VariantMismatch
        );

        let mut scramble = scramble_unit("The cat sat");
        scramble.begin().unwrap();
        assert_eq!(
            scramble.check_answer(OptionKey::A).unwrap_err(),
            UnitError::VariantMismatch
        );
    }
}
