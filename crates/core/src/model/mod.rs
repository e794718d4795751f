mod descriptor;
mod ids;
mod prompt;
mod result;

pub use descriptor::{DescriptorPayload, GameDescriptor, GameVariant};
pub use ids::{ArticleGuid, GameId, ParseIdError};
pub use prompt::{OptionKey, ParseOptionKeyError, PromptError, QuizPrompt, ScramblePrompt};
pub use result::{AnswerLogEntry, GameResult};
