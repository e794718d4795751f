use thiserror::Error;

use crate::deeplink::DeepLink;
use crate::model::{GameDescriptor, GameResult};
use crate::unit::GameUnit;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no game descriptors supplied for session")]
    Empty,

    #[error("no unit at index {index}")]
    UnknownUnit { index: usize },
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Session-wide statistics computed over the result records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAggregate {
    pub total_score: u32,
    pub total_prompts: usize,
    /// `round(100 * total_score / total_prompts)`; 0 when no prompts exist.
    pub percentage: u32,
    /// Completed units whose verdict is a pass.
    pub total_passed: usize,
    /// Completed units whose verdict is a fail.
    pub total_failed: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Coordinator for one play session: the ordered unit descriptors, the
/// active unit, and a result record per unit.
///
/// Constructed once per page load from immutable content data and passed by
/// reference to whoever drives it; there is no shared global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    descriptors: Vec<GameDescriptor>,
    current: usize,
    results: Vec<GameResult>,
    unit: GameUnit,
}

impl Session {
    /// Build a session over the supplied descriptors, instantiating the
    /// unit for index 0 and a zero-state result per unit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no descriptors are supplied.
    pub fn new(descriptors: Vec<GameDescriptor>) -> Result<Self, SessionError> {
        let Some(first) = descriptors.first() else {
            return Err(SessionError::Empty);
        };

        let results = descriptors
            .iter()
            .enumerate()
            .map(|(index, d)| GameResult::zero(index, d.total_prompts()))
            .collect();
        let unit = GameUnit::from_descriptor(first);

        Ok(Self {
            descriptors,
            current: 0,
            results,
            unit,
        })
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn descriptors(&self) -> &[GameDescriptor] {
        &self.descriptors
    }

    #[must_use]
    pub fn descriptor(&self, index: usize) -> Option<&GameDescriptor> {
        self.descriptors.get(index)
    }

    /// The unit currently being played.
    #[must_use]
    pub fn unit(&self) -> &GameUnit {
        &self.unit
    }

    pub fn unit_mut(&mut self) -> &mut GameUnit {
        &mut self.unit
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current + 1 < self.descriptors.len()
    }

    /// Move to the next unit, instantiating it fresh.
    ///
    /// A no-op returning false when already at the last unit.
    pub fn advance(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        self.unit = GameUnit::from_descriptor(&self.descriptors[self.current]);
        true
    }

    /// Jump straight to a unit index, instantiating it fresh.
    ///
    /// A no-op returning false when the index is out of range.
    pub fn jump_to(&mut self, index: usize) -> bool {
        let Some(descriptor) = self.descriptors.get(index) else {
            return false;
        };
        self.current = index;
        self.unit = GameUnit::from_descriptor(descriptor);
        true
    }

    /// Replay the current unit from scratch.
    pub fn restart_current(&mut self) {
        self.unit = GameUnit::from_descriptor(&self.descriptors[self.current]);
    }

    #[must_use]
    pub fn results(&self) -> &[GameResult] {
        &self.results
    }

    #[must_use]
    pub fn result(&self, index: usize) -> Option<&GameResult> {
        self.results.get(index)
    }

    /// Record a unit outcome. Completion latches in the result until an
    /// explicit [`Session::reset_result`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownUnit` for an out-of-range index.
    pub fn update_result(
        &mut self,
        index: usize,
        score: u32,
        passed: Option<bool>,
        completed: bool,
    ) -> Result<(), SessionError> {
        let result = self
            .results
            .get_mut(index)
            .ok_or(SessionError::UnknownUnit { index })?;
        result.update(score, passed, completed);
        Ok(())
    }

    /// Return a result to its zero state, recomputing `total_prompts` from
    /// the live descriptor data rather than the stale record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownUnit` for an out-of-range index.
    pub fn reset_result(&mut self, index: usize) -> Result<(), SessionError> {
        let total_prompts = self
            .descriptors
            .get(index)
            .map(GameDescriptor::total_prompts)
            .ok_or(SessionError::UnknownUnit { index })?;
        let result = self
            .results
            .get_mut(index)
            .ok_or(SessionError::UnknownUnit { index })?;
        result.reset(total_prompts);
        Ok(())
    }

    /// True once every unit's result is completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.results.iter().all(GameResult::completed)
    }

    /// Aggregate statistics over all result records.
    #[must_use]
    pub fn aggregate(&self) -> SessionAggregate {
        let total_score: u32 = self.results.iter().map(GameResult::score).sum();
        let total_prompts: usize = self.results.iter().map(GameResult::total_prompts).sum();

        // Guard the zero denominator so the percentage is never NaN.
        let percentage = if total_prompts == 0 {
            0
        } else {
            (f64::from(total_score) * 100.0 / total_prompts as f64).round() as u32
        };

        let completed = self.results.iter().filter(|r| r.completed());
        let total_passed = completed
            .clone()
            .filter(|r| r.passed() == Some(true))
            .count();
        let total_failed = completed.filter(|r| r.passed() == Some(false)).count();

        SessionAggregate {
            total_score,
            total_prompts,
            percentage,
            total_passed,
            total_failed,
        }
    }

    /// Back to unit 0 with every result in its zero state.
    pub fn reset(&mut self) {
        self.current = 0;
        self.results = self
            .descriptors
            .iter()
            .enumerate()
            .map(|(index, d)| GameResult::zero(index, d.total_prompts()))
            .collect();
        self.unit = GameUnit::from_descriptor(&self.descriptors[0]);
    }

    /// Deep-link parameters for the active unit.
    #[must_use]
    pub fn deep_link(&self) -> DeepLink {
        DeepLink::for_descriptor(&self.descriptors[self.current])
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
