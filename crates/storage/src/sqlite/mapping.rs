use game_core::model::GameId;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn game_id_to_i64(id: GameId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("game_id overflow".into()))
}

pub(crate) fn game_id_from_i64(v: i64) -> Result<GameId, StorageError> {
    u64::try_from(v)
        .map(GameId::new)
        .map_err(|_| StorageError::Serialization(format!("invalid game_id: {v}")))
}
