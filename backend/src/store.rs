use shared::models::{Vote, VoteFields};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::queries::Queries;
use crate::seed;
use crate::utils::now_ms;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Vote not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(String),
    #[error("Cache error: {0}")]
    Cache(String),
}

/// The persistence gateway the routes talk to. Reads and writes go to
/// Postgres while it is reachable; any connectivity failure flips the store
/// offline, after which the local JSON cache (one serialized blob holding the
/// full vote list) absorbs every operation. The next successful database load
/// brings the store back online.
pub struct VoteStore {
    pool: Option<PgPool>,
    cache_path: PathBuf,
    offline: AtomicBool,
    // Serializes the read-modify-write pair on the cache file; without it two
    // concurrent offline mutations can overwrite each other's vote.
    cache_lock: Mutex<()>,
}

impl VoteStore {
    pub fn new(pool: Option<PgPool>, cache_path: PathBuf) -> Self {
        let offline = pool.is_none();
        if offline {
            warn!("no database configured, store starts offline");
        }
        Self {
            pool,
            cache_path,
            offline: AtomicBool::new(offline),
            cache_lock: Mutex::new(()),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }

    fn go_offline(&self, err: &sqlx::Error) {
        if !self.offline.swap(true, Ordering::Relaxed) {
            warn!("database unreachable, switching to local cache: {err}");
        }
    }

    /// Fetches the full vote list. Every database success refreshes the
    /// cache so the offline copy is as fresh as the last good load.
    pub async fn load_all(&self) -> Result<Vec<Vote>, StoreError> {
        if let Some(pool) = &self.pool {
            match Queries::list_votes(pool).await {
                Ok(votes) => {
                    if self.offline.swap(false, Ordering::Relaxed) {
                        info!("database reachable again, store back online");
                    }
                    // Refreshing the offline copy is best effort while the
                    // database is still the store of record.
                    if let Err(err) = self.write_cache(&votes).await {
                        warn!("failed to refresh vote cache: {err}");
                    }
                    return Ok(votes);
                }
                Err(err) => self.go_offline(&err),
            }
        }
        self.read_cache().await
    }

    /// Assigns id and creation timestamp, then persists. Returns the stored
    /// vote so the caller can confirm the assigned fields.
    pub async fn insert(&self, fields: &VoteFields) -> Result<Vote, StoreError> {
        let vote = Vote {
            id: Uuid::new_v4(),
            voter_name: fields.voter_name.trim().to_string(),
            department: fields.department,
            candidate: fields.candidate,
            timestamp_ms: now_ms(),
        };

        if !self.is_offline() {
            if let Some(pool) = &self.pool {
                match Queries::insert_vote(pool, &vote).await {
                    Ok(_) => {
                        debug!(vote_id = %vote.id, "vote inserted");
                        return Ok(vote);
                    }
                    Err(err) => self.go_offline(&err),
                }
            }
        }

        let _guard = self.cache_lock.lock().await;
        let mut votes = self.read_cache().await?;
        votes.push(vote.clone());
        self.write_cache(&votes).await?;
        Ok(vote)
    }

    pub async fn update(&self, id: Uuid, fields: &VoteFields) -> Result<(), StoreError> {
        if !self.is_offline() {
            if let Some(pool) = &self.pool {
                match Queries::update_vote(pool, id, fields).await {
                    Ok(0) => return Err(StoreError::NotFound),
                    Ok(_) => return Ok(()),
                    Err(err) => self.go_offline(&err),
                }
            }
        }

        let _guard = self.cache_lock.lock().await;
        let mut votes = self.read_cache().await?;
        let vote = votes
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound)?;
        vote.voter_name = fields.voter_name.trim().to_string();
        vote.department = fields.department;
        vote.candidate = fields.candidate;
        self.write_cache(&votes).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        if !self.is_offline() {
            if let Some(pool) = &self.pool {
                match Queries::delete_vote(pool, id).await {
                    Ok(0) => return Err(StoreError::NotFound),
                    Ok(_) => return Ok(()),
                    Err(err) => self.go_offline(&err),
                }
            }
        }

        let _guard = self.cache_lock.lock().await;
        let mut votes = self.read_cache().await?;
        let before = votes.len();
        votes.retain(|v| v.id != id);
        if votes.len() == before {
            return Err(StoreError::NotFound);
        }
        self.write_cache(&votes).await?;
        Ok(())
    }

    /// Missing cache file falls through to the seed list so a cold offline
    /// start still has data to show.
    async fn read_cache(&self) -> Result<Vec<Vote>, StoreError> {
        match tokio::fs::read(&self.cache_path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StoreError::Cache(e.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no cache at {:?}, serving seed data", self.cache_path);
                Ok(seed::initial_votes())
            }
            Err(err) => Err(StoreError::Cache(err.to_string())),
        }
    }

    /// Offline, the cache file is the only store, so a failed write here must
    /// reach the caller; a mutation that cannot be persisted is an error, not
    /// a warning. The list is kept newest-first to match the database read
    /// order.
    async fn write_cache(&self, votes: &[Vote]) -> Result<(), StoreError> {
        let mut ordered = votes.to_vec();
        ordered.sort_by(|a, b| {
            b.timestamp_ms
                .cmp(&a.timestamp_ms)
                .then_with(|| a.id.cmp(&b.id))
        });
        let bytes =
            serde_json::to_vec_pretty(&ordered).map_err(|e| StoreError::Cache(e.to_string()))?;
        tokio::fs::write(&self.cache_path, bytes)
            .await
            .map_err(|e| StoreError::Cache(e.to_string()))
    }
}
