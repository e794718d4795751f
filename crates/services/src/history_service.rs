use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use game_core::Clock;
use game_core::model::{GameId, GameVariant};
use storage::repository::HistoryRepository;

/// Fail-open policy layer over the history store.
///
/// Reads degrade to empty values and writes are swallowed with a warning:
/// the worst outcome of a broken store is a skipped history record, never
/// an interrupted game.
#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
    clock: Clock,
}

impl HistoryService {
    #[must_use]
    pub fn new(repo: Arc<dyn HistoryRepository>, clock: Clock) -> Self {
        Self { repo, clock }
    }

    /// Overwrite the last-played timestamp for a game with "now".
    pub async fn mark_played(&self, family: GameVariant, game_id: GameId) {
        let at = self.clock.now();
        if let Err(err) = self.repo.save_last_played(family, game_id, at).await {
            tracing::warn!(%family, %game_id, error = %err, "failed to record last played");
        }
    }

    /// The family's last-played map; empty when the store cannot be read.
    pub async fn last_played(&self, family: GameVariant) -> HashMap<GameId, DateTime<Utc>> {
        match self.repo.last_played(family).await {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(%family, error = %err, "failed to read last played map");
                HashMap::new()
            }
        }
    }

    /// When a game was last played; `None` when never played or unreadable.
    pub async fn last_played_for(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Option<DateTime<Utc>> {
        match self.repo.last_played_for(family, game_id).await {
            Ok(at) => at,
            Err(err) => {
                tracing::warn!(%family, %game_id, error = %err, "failed to read last played");
                None
            }
        }
    }

    /// Flip favorite membership, reporting the new state.
    ///
    /// When the store cannot be updated the membership is unchanged and
    /// this reports false.
    pub async fn toggle_favorite(&self, family: GameVariant, game_id: GameId) -> bool {
        match self.repo.toggle_favorite(family, game_id).await {
            Ok(added) => added,
            Err(err) => {
                tracing::warn!(%family, %game_id, error = %err, "failed to toggle favorite");
                false
            }
        }
    }

    pub async fn is_favorite(&self, family: GameVariant, game_id: GameId) -> bool {
        match self.repo.is_favorite(family, game_id).await {
            Ok(fav) => fav,
            Err(err) => {
                tracing::warn!(%family, %game_id, error = %err, "failed to read favorite");
                false
            }
        }
    }

    /// The family's favorite set; empty when the store cannot be read.
    pub async fn favorites(&self, family: GameVariant) -> HashSet<GameId> {
        match self.repo.favorites(family).await {
            Ok(set) => set,
            Err(err) => {
                tracing::warn!(%family, error = %err, "failed to read favorites");
                HashSet::new()
            }
        }
    }

    /// Drop the family's history records. Part of the logout flow only.
    pub async fn clear_on_logout(&self, family: GameVariant) {
        if let Err(err) = self.repo.clear(family).await {
            tracing::warn!(%family, error = %err, "failed to clear history on logout");
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use game_core::time::{fixed_clock, fixed_now};
    use storage::repository::{InMemoryRepository, StorageError};

    /// Repository double whose every operation fails.
    struct BrokenRepository;

    #[async_trait]
    impl HistoryRepository for BrokenRepository {
        async fn save_last_played(
            &self,
            _family: GameVariant,
            _game_id: GameId,
            _at: DateTime<Utc>,
        ) -> Result<(), StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn last_played(
            &self,
            _family: GameVariant,
        ) -> Result<HashMap<GameId, DateTime<Utc>>, StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn last_played_for(
            &self,
            _family: GameVariant,
            _game_id: GameId,
        ) -> Result<Option<DateTime<Utc>>, StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn toggle_favorite(
            &self,
            _family: GameVariant,
            _game_id: GameId,
        ) -> Result<bool, StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn is_favorite(
            &self,
            _family: GameVariant,
            _game_id: GameId,
        ) -> Result<bool, StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn favorites(&self, _family: GameVariant) -> Result<HashSet<GameId>, StorageError> {
            Err(StorageError::Connection("down".into()))
        }

        async fn clear(&self, _family: GameVariant) -> Result<(), StorageError> {
            Err(StorageError::Connection("down".into()))
        }
    }

    #[tokio::test]
    async fn mark_played_stamps_the_clock_time() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = HistoryService::new(repo.clone(), fixed_clock());

        service.mark_played(GameVariant::Quiz, GameId::new(1)).await;

        let stored = service
            .last_played_for(GameVariant::Quiz, GameId::new(1))
            .await;
        assert_eq!(stored, Some(fixed_now()));
    }

    #[tokio::test]
    async fn favorite_toggle_roundtrips_through_service() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = HistoryService::new(repo, fixed_clock());
        let id = GameId::new(5);

        assert!(service.toggle_favorite(GameVariant::Scramble, id).await);
        assert!(service.is_favorite(GameVariant::Scramble, id).await);
        assert!(!service.toggle_favorite(GameVariant::Scramble, id).await);
        assert!(!service.is_favorite(GameVariant::Scramble, id).await);
    }

    #[tokio::test]
    async fn reads_fail_open_on_a_broken_store() {
        let service = HistoryService::new(Arc::new(BrokenRepository), fixed_clock());
        let id = GameId::new(1);

        // none of these may panic or surface an error
        service.mark_played(GameVariant::Quiz, id).await;
        assert!(service.last_played(GameVariant::Quiz).await.is_empty());
        assert_eq!(service.last_played_for(GameVariant::Quiz, id).await, None);
        assert!(!service.toggle_favorite(GameVariant::Quiz, id).await);
        assert!(!service.is_favorite(GameVariant::Quiz, id).await);
        assert!(service.favorites(GameVariant::Quiz).await.is_empty());
        service.clear_on_logout(GameVariant::Quiz).await;
    }

    #[tokio::test]
    async fn logout_clear_reaches_the_store() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = HistoryService::new(repo, fixed_clock());
        let id = GameId::new(2);

        service.mark_played(GameVariant::Quiz, id).await;
        service.toggle_favorite(GameVariant::Quiz, id).await;
        service.clear_on_logout(GameVariant::Quiz).await;

        assert!(service.last_played(GameVariant::Quiz).await.is_empty());
        assert!(service.favorites(GameVariant::Quiz).await.is_empty());
    }
}
