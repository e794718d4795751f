#![forbid(unsafe_code)]

pub mod deeplink;
pub mod error;
pub mod model;
pub mod session;
pub mod time;
pub mod unit;
pub mod validate;

pub use deeplink::DeepLink;
pub use error::Error;
pub use session::{Session, SessionAggregate, SessionError};
pub use time::Clock;
pub use unit::{GameUnit, PlayState, PromptRef, UnitError, UnitKind};
pub use validate::ArrangementOutcome;
