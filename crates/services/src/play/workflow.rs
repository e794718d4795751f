use std::sync::Arc;

use chrono::Duration;

use game_core::model::OptionKey;
use game_core::validate::ArrangementOutcome;
use game_core::{Clock, Session};
use storage::repository::HistoryRepository;

use super::progress::PlayProgress;
use super::timer::AdvanceTimer;
use crate::error::PlayError;
use crate::history_service::HistoryService;
use crate::sync_service::{ContinueStateUnit, SyncService};

const DEFAULT_FEEDBACK_DELAY_SECS: i64 = 2;

/// Orchestrates the persisted play loop over a [`Session`].
///
/// The session is passed in by the caller every time; the service holds
/// only its collaborators (clock, history policy, sync client) and the
/// feedback-delay policy for the advance timer.
#[derive(Clone)]
pub struct PlayLoopService {
    clock: Clock,
    history: HistoryService,
    sync: SyncService,
    feedback_delay: Duration,
}

impl PlayLoopService {
    #[must_use]
    pub fn new(clock: Clock, history: Arc<dyn HistoryRepository>, sync: SyncService) -> Self {
        Self {
            clock,
            history: HistoryService::new(history, clock),
            sync,
            feedback_delay: Duration::seconds(DEFAULT_FEEDBACK_DELAY_SECS),
        }
    }

    /// Override how long feedback stays on screen before auto-advance.
    #[must_use]
    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    /// A fresh, disarmed timer carrying the configured feedback delay.
    /// The controller owns it and polls or fires it explicitly.
    #[must_use]
    pub fn timer(&self) -> AdvanceTimer {
        AdvanceTimer::new(self.feedback_delay)
    }

    #[must_use]
    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    #[must_use]
    pub fn progress(session: &Session) -> PlayProgress {
        PlayProgress::of(session)
    }

    /// Start the active unit and record it as last played.
    ///
    /// A unit that degraded to completed at construction (no prompts) has
    /// its zero-score result recorded immediately.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Unit` when the unit was already started; the
    /// session is untouched and the call is safe to ignore.
    pub async fn start_unit(&self, session: &mut Session) -> Result<(), PlayError> {
        let (game_id, family) = {
            let unit = session.unit();
            (unit.id(), unit.variant())
        };

        if session.unit().is_complete() {
            self.finish_unit(session).await?;
        } else {
            session.unit_mut().begin()?;
        }

        self.history.mark_played(family, game_id).await;
        Ok(())
    }

    /// Evaluate a quiz selection and arm the feedback auto-advance.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Unit` when no submission is expected (repeat
    /// submissions included); nothing is scored or armed in that case.
    pub async fn submit_answer(
        &self,
        session: &mut Session,
        selected: OptionKey,
        timer: &mut AdvanceTimer,
    ) -> Result<bool, PlayError> {
        let is_correct = session.unit_mut().check_answer(selected)?;
        timer.arm(self.clock.now());
        Ok(is_correct)
    }

    /// Evaluate a scramble arrangement. The unit completes on the spot, so
    /// its result is recorded before this returns.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Unit` when no submission is expected.
    pub async fn submit_arrangement<S: AsRef<str>>(
        &self,
        session: &mut Session,
        user_tokens: &[S],
    ) -> Result<ArrangementOutcome, PlayError> {
        let outcome = session.unit_mut().check_arrangement(user_tokens)?;
        self.finish_unit(session).await?;
        Ok(outcome)
    }

    /// Leave quiz feedback, whether the timer fired or the player moved on
    /// manually. Cancels any armed auto-advance either way.
    ///
    /// Returns true when a next prompt is being presented; false when the
    /// unit just completed (its result is then recorded).
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Unit` when the unit is not in feedback.
    pub async fn advance_feedback(
        &self,
        session: &mut Session,
        timer: &mut AdvanceTimer,
    ) -> Result<bool, PlayError> {
        timer.cancel();
        let more = session.unit_mut().next_prompt()?;
        if !more {
            self.finish_unit(session).await?;
        }
        Ok(more)
    }

    /// Move to the next unit and start it. Returns false (doing nothing)
    /// when the session is already at the last unit.
    ///
    /// # Errors
    ///
    /// Propagates `start_unit` errors for the freshly created unit.
    pub async fn next_unit(&self, session: &mut Session) -> Result<bool, PlayError> {
        if !session.advance() {
            return Ok(false);
        }
        self.start_unit(session).await?;
        Ok(true)
    }

    /// Record the active unit's outcome in the session results, and close
    /// out the session when this was the last outstanding unit.
    async fn finish_unit(&self, session: &mut Session) -> Result<(), PlayError> {
        let index = session.current_index();
        let (score, passed) = {
            let unit = session.unit();
            (unit.score(), unit.passed())
        };
        session.update_result(index, score, passed, true)?;

        if session.is_complete() {
            self.finish_session(session).await;
        }
        Ok(())
    }

    /// Session bookkeeping after the final unit: refresh the last-played
    /// stamp and push the continue state, best-effort.
    async fn finish_session(&self, session: &Session) {
        let (game_id, family) = {
            let unit = session.unit();
            (unit.id(), unit.variant())
        };
        self.history.mark_played(family, game_id).await;

        if !self.sync.enabled() {
            return;
        }
        let units = ContinueStateUnit::collect(session);
        match self.sync.submit_continue_state(&units).await {
            Ok(status) => tracing::debug!(status, "continue state synced"),
            Err(err) => {
                tracing::warn!(error = %err, "continue state sync failed; local store stays authoritative");
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
