use async_trait::async_trait;
use chrono::{DateTime, Utc};
use game_core::model::{GameId, GameVariant};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence contract for play history.
///
/// Every operation is namespaced by [`GameVariant`]: the quiz and scramble
/// mini-game families keep separate last-played maps and favorite sets.
/// Writes are last-writer-wins; callers decide how to treat failures (the
/// services layer swallows them rather than interrupt gameplay).
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Record when a game was last played. Overwrites any earlier record;
    /// no history of prior plays is kept.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn save_last_played(
        &self,
        family: GameVariant,
        game_id: GameId,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// The full last-played map for a family. Empty when nothing has been
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn last_played(
        &self,
        family: GameVariant,
    ) -> Result<HashMap<GameId, DateTime<Utc>>, StorageError>;

    /// Last-played timestamp for one game; `None` when never played.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn last_played_for(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<Option<DateTime<Utc>>, StorageError>;

    /// Flip a game's favorite membership. Returns the new membership:
    /// true when the game was added, false when it was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be updated.
    async fn toggle_favorite(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<bool, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be read.
    async fn is_favorite(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<bool, StorageError>;

    /// The favorite set for a family. Empty when nothing is favorited.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be read.
    async fn favorites(&self, family: GameVariant) -> Result<HashSet<GameId>, StorageError>;

    /// Drop every record for a family. Invoked by the logout flow only.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be deleted.
    async fn clear(&self, family: GameVariant) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    last_played: Arc<Mutex<HashMap<(GameVariant, GameId), DateTime<Utc>>>>,
    favorites: Arc<Mutex<HashSet<(GameVariant, GameId)>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<'a, T>(guard: &'a Arc<Mutex<T>>) -> Result<std::sync::MutexGuard<'a, T>, StorageError> {
        guard
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn save_last_played(
        &self,
        family: GameVariant,
        game_id: GameId,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = Self::lock(&self.last_played)?;
        guard.insert((family, game_id), at);
        Ok(())
    }

    async fn last_played(
        &self,
        family: GameVariant,
    ) -> Result<HashMap<GameId, DateTime<Utc>>, StorageError> {
        let guard = Self::lock(&self.last_played)?;
        Ok(guard
            .iter()
            .filter(|((f, _), _)| *f == family)
            .map(|((_, id), at)| (*id, *at))
            .collect())
    }

    async fn last_played_for(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let guard = Self::lock(&self.last_played)?;
        Ok(guard.get(&(family, game_id)).copied())
    }

    async fn toggle_favorite(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<bool, StorageError> {
        let mut guard = Self::lock(&self.favorites)?;
        let key = (family, game_id);
        if guard.remove(&key) {
            Ok(false)
        } else {
            guard.insert(key);
            Ok(true)
        }
    }

    async fn is_favorite(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<bool, StorageError> {
        let guard = Self::lock(&self.favorites)?;
        Ok(guard.contains(&(family, game_id)))
    }

    async fn favorites(&self, family: GameVariant) -> Result<HashSet<GameId>, StorageError> {
        let guard = Self::lock(&self.favorites)?;
        Ok(guard
            .iter()
            .filter(|(f, _)| *f == family)
            .map(|(_, id)| *id)
            .collect())
    }

    async fn clear(&self, family: GameVariant) -> Result<(), StorageError> {
        let mut played = Self::lock(&self.last_played)?;
        played.retain(|(f, _), _| *f != family);
        drop(played);

        let mut favorites = Self::lock(&self.favorites)?;
        favorites.retain(|(f, _)| *f != family);
        Ok(())
    }
}

/// Aggregates the history store behind a trait object for backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            history: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::time::fixed_now;

    #[tokio::test]
    async fn last_played_overwrites_per_game() {
        let repo = InMemoryRepository::new();
        let id = GameId::new(1);
        let first = fixed_now();
        let later = first + chrono::Duration::hours(2);

        repo.save_last_played(GameVariant::Quiz, id, first)
            .await
            .unwrap();
        repo.save_last_played(GameVariant::Quiz, id, later)
            .await
            .unwrap();

        let stored = repo.last_played_for(GameVariant::Quiz, id).await.unwrap();
        assert_eq!(stored, Some(later));
        assert_eq!(repo.last_played(GameVariant::Quiz).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn families_are_namespaced() {
        let repo = InMemoryRepository::new();
        let id = GameId::new(1);
        repo.save_last_played(GameVariant::Quiz, id, fixed_now())
            .await
            .unwrap();

        assert!(
            repo.last_played(GameVariant::Scramble)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            repo.last_played_for(GameVariant::Scramble, id)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn toggle_favorite_roundtrips() {
        let repo = InMemoryRepository::new();
        let id = GameId::new(7);

        assert!(repo.toggle_favorite(GameVariant::Quiz, id).await.unwrap());
        assert!(repo.is_favorite(GameVariant::Quiz, id).await.unwrap());

        assert!(!repo.toggle_favorite(GameVariant::Quiz, id).await.unwrap());
        assert!(!repo.is_favorite(GameVariant::Quiz, id).await.unwrap());
        assert!(repo.favorites(GameVariant::Quiz).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_wipes_only_the_given_family() {
        let repo = InMemoryRepository::new();
        let id = GameId::new(3);
        repo.save_last_played(GameVariant::Quiz, id, fixed_now())
            .await
            .unwrap();
        repo.save_last_played(GameVariant::Scramble, id, fixed_now())
            .await
            .unwrap();
        repo.toggle_favorite(GameVariant::Quiz, id).await.unwrap();

        repo.clear(GameVariant::Quiz).await.unwrap();

        assert!(repo.last_played(GameVariant::Quiz).await.unwrap().is_empty());
        assert!(repo.favorites(GameVariant::Quiz).await.unwrap().is_empty());
        assert_eq!(
            repo.last_played(GameVariant::Scramble).await.unwrap().len(),
            1
        );
    }
}
