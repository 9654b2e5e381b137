//! Storage of finished interview results.
//!
//! The store itself is an opaque key-value collaborator. All results live under
//! one well-known key; `save_results` / `load_results` own the encoding and the
//! tolerant-read policy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::InterviewAnalysis;

pub mod redis_store;

pub use redis_store::RedisResultsStore;

/// Key under which the latest interview results are stored.
pub const RESULTS_KEY: &str = "interviewResults";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("could not encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What a finished session hands to the results collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResults {
    #[serde(flatten)]
    pub analysis: InterviewAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    pub role: String,
    pub completed_at: DateTime<Utc>,
}

#[async_trait]
pub trait ResultsStore: Send + Sync {
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

pub async fn save_results(
    store: &dyn ResultsStore,
    results: &SessionResults,
) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(results)?;
    store.put(RESULTS_KEY, encoded).await?;
    info!(role = %results.role, "stored interview results");
    Ok(())
}

/// Reads the latest results. A missing or unreadable entry is `Ok(None)`;
/// only a failing backend is an error.
pub async fn load_results(store: &dyn ResultsStore) -> Result<Option<SessionResults>, StoreError> {
    let Some(raw) = store.get(RESULTS_KEY).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(results) => Ok(Some(results)),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable stored results");
            Ok(None)
        }
    }
}

/// Process-local store. Results vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResultsStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

#[async_trait]
impl ResultsStore for InMemoryResultsStore {
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("results mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Backend("results mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }
}

/// Picks the backend: Redis when a URL is configured, memory otherwise.
pub async fn connect(redis_url: Option<&str>) -> Result<Arc<dyn ResultsStore>, StoreError> {
    match redis_url {
        Some(url) => {
            let store = RedisResultsStore::connect(url).await?;
            info!("results store: redis");
            Ok(Arc::new(store))
        }
        None => {
            info!("results store: in-memory (set REDIS_URL to persist)");
            Ok(Arc::new(InMemoryResultsStore::default()))
        }
    }
}
