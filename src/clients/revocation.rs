//! Token revocation whitelist.
//!
//! A token is only honored while a `whiteList:{userId}` entry exists and
//! matches the presented token string. Deleting the entry (or letting it
//! expire) forces re-authentication even though the token itself is still
//! cryptographically valid. Logout-elsewhere and forced revocation produce
//! the same observable outcome.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::info;

fn whitelist_key(user_id: i32) -> String {
    format!("whiteList:{user_id}")
}

#[async_trait]
pub trait RevocationCache: Send + Sync {
    /// Record the last-issued token for a user. Last write wins.
    async fn record(&self, user_id: i32, token: &str, ttl: Duration) -> Result<()>;

    /// Whether the presented token matches the recorded one. Missing and
    /// mismatched entries both reject.
    async fn is_valid(&self, user_id: i32, token: &str) -> Result<bool>;

    /// Drop the entry for a user, revoking their current token.
    async fn invalidate(&self, user_id: i32) -> Result<()>;
}

/// Redis-backed whitelist. Entries expire server-side via TTL.
pub struct RedisRevocationCache {
    connection: ConnectionManager,
}

impl RedisRevocationCache {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Invalid Redis URL")?;
        let connection = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        info!("Redis revocation cache connected");

        Ok(Self { connection })
    }
}

#[async_trait]
impl RevocationCache for RedisRevocationCache {
    async fn record(&self, user_id: i32, token: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .set_ex(whitelist_key(user_id), token, ttl.as_secs())
            .await
            .context("Failed to record token in Redis")?;
        Ok(())
    }

    async fn is_valid(&self, user_id: i32, token: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let stored: Option<String> = conn
            .get(whitelist_key(user_id))
            .await
            .context("Failed to read token from Redis")?;

        Ok(stored.as_deref() == Some(token))
    }

    async fn invalidate(&self, user_id: i32) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .del(whitelist_key(user_id))
            .await
            .context("Failed to delete token from Redis")?;
        Ok(())
    }
}

/// In-process whitelist for redis-less deployments and tests. Expiry is
/// checked lazily on read, which is indistinguishable from server-side TTL
/// to callers.
#[derive(Default)]
pub struct InMemoryRevocationCache {
    entries: RwLock<HashMap<i32, (String, Instant)>>,
}

impl InMemoryRevocationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationCache for InMemoryRevocationCache {
    async fn record(&self, user_id: i32, token: &str, ttl: Duration) -> Result<()> {
        let deadline = Instant::now() + ttl;
        self.entries
            .write()
            .await
            .insert(user_id, (token.to_string(), deadline));
        Ok(())
    }

    async fn is_valid(&self, user_id: i32, token: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(match entries.get(&user_id) {
            Some((stored, deadline)) => *deadline > Instant::now() && stored == token,
            None => false,
        })
    }

    async fn invalidate(&self, user_id: i32) -> Result<()> {
        self.entries.write().await.remove(&user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_entry_rejects() {
        let cache = InMemoryRevocationCache::new();
        assert!(!cache.is_valid(1, "token").await.unwrap());
    }

    #[tokio::test]
    async fn recorded_token_is_valid_until_invalidated() {
        let cache = InMemoryRevocationCache::new();
        cache
            .record(1, "token-a", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.is_valid(1, "token-a").await.unwrap());
        assert!(!cache.is_valid(1, "token-b").await.unwrap());

        cache.invalidate(1).await.unwrap();
        assert!(!cache.is_valid(1, "token-a").await.unwrap());
    }

    #[tokio::test]
    async fn last_write_wins_per_user() {
        let cache = InMemoryRevocationCache::new();
        cache
            .record(1, "first", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .record(1, "second", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(!cache.is_valid(1, "first").await.unwrap());
        assert!(cache.is_valid(1, "second").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entry_rejects_like_invalidation() {
        let cache = InMemoryRevocationCache::new();
        cache
            .record(1, "token", Duration::from_secs(0))
            .await
            .unwrap();

        assert!(!cache.is_valid(1, "token").await.unwrap());
    }
}
