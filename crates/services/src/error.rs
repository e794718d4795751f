//! Shared error types for the services crate.

use thiserror::Error;

use game_core::session::SessionError;
use game_core::unit::UnitError;
use storage::repository::StorageError;

/// Errors emitted by `SyncService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("history sync is not configured")]
    Disabled,
    #[error("sync endpoint returned status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the play workflow.
///
/// Unit and session variants signal guarded no-ops (an operation arrived
/// outside its valid state); storage variants are swallowed before they
/// reach here, so gameplay never stops on persistence trouble.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayError {
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
