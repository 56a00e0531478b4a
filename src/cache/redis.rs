//! Redis-backed [`SharedCache`].
//!
//! Every call crosses the network, so every call is bounded by the
//! configured operation timeout; a timed-out call surfaces as a cache error
//! and is absorbed upstream as a miss.

use std::future::Future;
use std::time::Duration;

use redis::aio::ConnectionManager;

use async_trait::async_trait;

use super::shared::{SharedCache, SharedCacheError};

pub struct RedisSharedCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisSharedCache {
    /// Open a managed connection to the given Redis URL. The connection
    /// manager reconnects on its own after transport failures.
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self, SharedCacheError> {
        let client = redis::Client::open(url).map_err(SharedCacheError::backend)?;
        let conn = tokio::time::timeout(op_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| SharedCacheError::Timeout(op_timeout))?
            .map_err(SharedCacheError::backend)?;
        Ok(Self { conn, op_timeout })
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T, SharedCacheError> {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| SharedCacheError::Timeout(self.op_timeout))?
            .map_err(SharedCacheError::backend)
    }
}

#[async_trait]
impl SharedCache for RedisSharedCache {
    async fn get(&self, key: &str) -> Result<Option<String>, SharedCacheError> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("GET").arg(key).clone();
        self.bounded(async move { cmd.query_async::<Option<String>>(&mut conn).await })
            .await
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), SharedCacheError> {
        let mut conn = self.conn.clone();
        let cmd = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .clone();
        self.bounded(async move { cmd.query_async::<()>(&mut conn).await })
            .await
    }

    async fn delete_matching(
        &self,
        pattern: &str,
        batch_size: usize,
    ) -> Result<u64, SharedCacheError> {
        let batch = batch_size.max(1);
        let mut removed: u64 = 0;
        let mut cursor: u64 = 0;

        // SCAN is resumable and non-blocking; the full keyspace is never
        // assumed to fit in one reply.
        loop {
            let mut conn = self.conn.clone();
            let cmd = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(batch)
                .clone();
            let (next, keys): (u64, Vec<String>) = self
                .bounded(async move { cmd.query_async(&mut conn).await })
                .await?;

            for chunk in keys.chunks(batch) {
                let mut conn = self.conn.clone();
                let cmd = redis::cmd("DEL").arg(chunk).clone();
                let deleted: u64 = self
                    .bounded(async move { cmd.query_async(&mut conn).await })
                    .await?;
                removed += deleted;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(removed)
    }
}
