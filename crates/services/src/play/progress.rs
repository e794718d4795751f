use game_core::Session;

/// Aggregated view of play progress, for the controller to decide
/// unit and session transitions from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayProgress {
    pub unit_index: usize,
    pub unit_count: usize,
    pub has_next_unit: bool,
    pub prompt_index: usize,
    pub total_prompts: usize,
    pub unit_complete: bool,
    pub session_complete: bool,
}

impl PlayProgress {
    #[must_use]
    pub fn of(session: &Session) -> Self {
        let unit = session.unit();
        Self {
            unit_index: session.current_index(),
            unit_count: session.unit_count(),
            has_next_unit: session.has_next(),
            prompt_index: unit.current_prompt_index(),
            total_prompts: unit.total_prompts(),
            unit_complete: unit.is_complete(),
            session_complete: session.is_complete(),
        }
    }
}
