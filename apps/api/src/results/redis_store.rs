use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use super::{ResultsStore, StoreError};

/// Redis-backed results store. The multiplexed connection is cheap to clone,
/// so each call takes its own handle.
#[derive(Clone)]
pub struct RedisResultsStore {
    connection: MultiplexedConnection,
}

impl RedisResultsStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(backend)?;
        let connection = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(backend)?;
        info!("Redis connection established");
        Ok(Self { connection })
    }
}

#[async_trait]
impl ResultsStore for RedisResultsStore {
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(backend)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection.clone();
        conn.get::<_, Option<String>>(key).await.map_err(backend)
    }
}

fn backend(err: redis::RedisError) -> StoreError {
    StoreError::Backend(err.to_string())
}
