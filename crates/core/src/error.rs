use thiserror::Error;

use crate::model::PromptError;
use crate::session::SessionError;
use crate::unit::UnitError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
