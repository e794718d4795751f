#![forbid(unsafe_code)]

pub mod error;
pub mod history_service;
pub mod play;
pub mod sync_service;

pub use game_core::Clock;

pub use error::{PlayError, SyncError};
pub use history_service::HistoryService;
pub use play::{AdvanceTimer, PlayLoopService, PlayProgress, SessionBuilder};
pub use sync_service::{ContinueStateUnit, SyncConfig, SyncService};
