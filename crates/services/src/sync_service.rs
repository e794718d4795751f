use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use game_core::Session;
use game_core::model::{ArticleGuid, GameId, GameResult, GameVariant};

use crate::error::SyncError;

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub base_url: String,
    pub user_id: String,
}

impl SyncConfig {
    /// Read the sync endpoint configuration from the environment.
    ///
    /// Returns `None` when `GAMES_SYNC_BASE_URL` is unset or blank, which
    /// disables sync entirely.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("GAMES_SYNC_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let user_id = env::var("GAMES_SYNC_USER_ID").unwrap_or_else(|_| "anonymous".into());
        Some(Self { base_url, user_id })
    }
}

/// Snapshot of one unit's standing, as shipped to the sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContinueStateUnit {
    pub game_id: GameId,
    pub variant: GameVariant,
    pub article_guid: Option<ArticleGuid>,
    pub result: GameResult,
}

impl ContinueStateUnit {
    /// Snapshot every unit of a session, in session order.
    #[must_use]
    pub fn collect(session: &Session) -> Vec<Self> {
        session
            .descriptors()
            .iter()
            .zip(session.results())
            .map(|(descriptor, result)| Self {
                game_id: descriptor.id(),
                variant: descriptor.variant(),
                article_guid: descriptor.article_guid(),
                result: result.clone(),
            })
            .collect()
    }
}

/// Best-effort client for the remote continue-state endpoint.
///
/// The local store stays authoritative: callers fire this after gameplay
/// bookkeeping is done and discard failures.
#[derive(Clone)]
pub struct SyncService {
    client: Client,
    config: Option<SyncConfig>,
}

impl SyncService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(SyncConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<SyncConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Push the full unit array to the remote endpoint.
    ///
    /// Returns the endpoint's status flag. No retry here; if the caller
    /// wants backoff it owns it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` when sync is disabled, the request fails, or
    /// the endpoint answers with a non-success status.
    pub async fn submit_continue_state(
        &self,
        units: &[ContinueStateUnit],
    ) -> Result<bool, SyncError> {
        let config = self.config.as_ref().ok_or(SyncError::Disabled)?;

        let url = format!("{}/continue_state", config.base_url.trim_end_matches('/'));
        let payload = ContinueStateRequest {
            user_id: &config.user_id,
            units,
        };

        let response = self.client.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }

        let body: ContinueStateResponse = response.json().await?;
        Ok(body.status)
    }
}

#[derive(Debug, Serialize)]
struct ContinueStateRequest<'a> {
    user_id: &'a str,
    units: &'a [ContinueStateUnit],
}

#[derive(Debug, Deserialize)]
struct ContinueStateResponse {
    status: bool,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
