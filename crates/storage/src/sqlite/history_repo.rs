use chrono::{DateTime, Utc};
use game_core::model::{GameId, GameVariant};
use sqlx::Row;
use std::collections::{HashMap, HashSet};

use super::SqliteRepository;
use super::mapping::{game_id_from_i64, game_id_to_i64, ser};
use crate::repository::{HistoryRepository, StorageError};

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn save_last_played(
        &self,
        family: GameVariant,
        game_id: GameId,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let game_id = game_id_to_i64(game_id)?;

        sqlx::query(
            r"
                INSERT INTO last_played (family, game_id, played_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(family, game_id) DO UPDATE SET
                    played_at = excluded.played_at
            ",
        )
        .bind(family.as_str())
        .bind(game_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn last_played(
        &self,
        family: GameVariant,
    ) -> Result<HashMap<GameId, DateTime<Utc>>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT game_id, played_at
                FROM last_played
                WHERE family = ?1
            ",
        )
        .bind(family.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = HashMap::with_capacity(rows.len());
        for row in rows {
            let game_id = game_id_from_i64(row.try_get::<i64, _>("game_id").map_err(ser)?)?;
            let played_at: DateTime<Utc> = row.try_get("played_at").map_err(ser)?;
            out.insert(game_id, played_at);
        }
        Ok(out)
    }

    async fn last_played_for(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let game_id = game_id_to_i64(game_id)?;

        let row = sqlx::query(
            r"
                SELECT played_at
                FROM last_played
                WHERE family = ?1 AND game_id = ?2
            ",
        )
        .bind(family.as_str())
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|r| r.try_get("played_at").map_err(ser)).transpose()
    }

    async fn toggle_favorite(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<bool, StorageError> {
        let game_id = game_id_to_i64(game_id)?;

        let removed = sqlx::query(
            r"
                DELETE FROM favorites
                WHERE family = ?1 AND game_id = ?2
            ",
        )
        .bind(family.as_str())
        .bind(game_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .rows_affected();

        if removed > 0 {
            return Ok(false);
        }

        sqlx::query(
            r"
                INSERT INTO favorites (family, game_id)
                VALUES (?1, ?2)
                ON CONFLICT(family, game_id) DO NOTHING
            ",
        )
        .bind(family.as_str())
        .bind(game_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(true)
    }

    async fn is_favorite(
        &self,
        family: GameVariant,
        game_id: GameId,
    ) -> Result<bool, StorageError> {
        let game_id = game_id_to_i64(game_id)?;

        let row = sqlx::query(
            r"
                SELECT 1 FROM favorites
                WHERE family = ?1 AND game_id = ?2
            ",
        )
        .bind(family.as_str())
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn favorites(&self, family: GameVariant) -> Result<HashSet<GameId>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT game_id FROM favorites
                WHERE family = ?1
            ",
        )
        .bind(family.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = HashSet::with_capacity(rows.len());
        for row in rows {
            out.insert(game_id_from_i64(
                row.try_get::<i64, _>("game_id").map_err(ser)?,
            )?);
        }
        Ok(out)
    }

    async fn clear(&self, family: GameVariant) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM last_played WHERE family = ?1")
            .bind(family.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query("DELETE FROM favorites WHERE family = ?1")
            .bind(family.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
