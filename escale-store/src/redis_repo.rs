use async_trait::async_trait;
use escale_core::repository::{FavoritesStore, RateLimiter};
use escale_core::{CoreError, CoreResult};
use redis::{AsyncCommands, RedisResult};
use std::collections::BTreeSet;
use escale_shared::Masked;
use tracing::info;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

fn favorites_key(user_id: &str) -> String {
    format!("favorites:{}", user_id)
}

fn store_error(err: redis::RedisError) -> CoreError {
    CoreError::InternalError(format!("Redis error: {}", err))
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn toggle_favorite(&self, user_id: &str, episode_id: &str) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        // Membership check and flip in one round trip so concurrent toggles cannot interleave.
        let script = redis::Script::new(r#"
            if redis.call("SISMEMBER", KEYS[1], ARGV[1]) == 1 then
                redis.call("SREM", KEYS[1], ARGV[1])
                return 0
            else
                redis.call("SADD", KEYS[1], ARGV[1])
                return 1
            end
        "#);

        let now_favorite: i64 = script
            .key(favorites_key(user_id))
            .arg(episode_id)
            .invoke_async(&mut conn)
            .await?;
        info!("Favorite {} for {}: {}", episode_id, Masked(user_id), now_favorite == 1);
        Ok(now_favorite == 1)
    }

    pub async fn list_favorites(&self, user_id: &str) -> RedisResult<BTreeSet<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.smembers(favorites_key(user_id)).await
    }

    pub async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // Fixed window: the expiry is set by the first hit only.
        let script = redis::Script::new(r#"
            local count = redis.call("INCR", KEYS[1])
            if count == 1 then
                redis.call("EXPIRE", KEYS[1], ARGV[1])
            end
            return count
        "#);

        let count: i64 = script
            .key(key)
            .arg(window_seconds)
            .invoke_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }
}

#[async_trait]
impl FavoritesStore for RedisClient {
    async fn toggle(&self, user_id: &str, episode_id: &str) -> CoreResult<bool> {
        self.toggle_favorite(user_id, episode_id).await.map_err(store_error)
    }

    async fn list(&self, user_id: &str) -> CoreResult<BTreeSet<String>> {
        self.list_favorites(user_id).await.map_err(store_error)
    }
}

#[async_trait]
impl RateLimiter for RedisClient {
    async fn check(&self, key: &str, limit: i64, window_seconds: i64) -> CoreResult<bool> {
        self.check_rate_limit(key, limit, window_seconds).await.map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorites_key_is_per_user() {
        assert_eq!(favorites_key("u-1"), "favorites:u-1");
        assert_ne!(favorites_key("u-1"), favorites_key("u-2"));
    }

    #[test]
    fn test_user_id_is_masked_in_log_output() {
        let line = format!("Favorite {} for {}: {}", "ep-1", Masked("user-42"), true);
        assert!(!line.contains("user-42"));
        assert!(line.contains("ep-1"));
    }

    #[tokio::test]
    async fn test_open_rejects_bad_url() {
        assert!(RedisClient::new("not a redis url").await.is_err());
    }

    // Needs a live server: REDIS_URL=redis://127.0.0.1/ cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_rate_limit_window_is_not_extended_by_later_hits() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
        let redis = RedisClient::new(&url).await.unwrap();
        let key = "ratelimit:test-window";
        let mut conn = redis.client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key).await.unwrap();

        assert!(redis.check_rate_limit(key, 2, 3).await.unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        assert!(redis.check_rate_limit(key, 2, 3).await.unwrap());
        assert!(!redis.check_rate_limit(key, 2, 3).await.unwrap());

        let ttl: i64 = conn.ttl(key).await.unwrap();
        assert!(ttl <= 2, "later hits pushed the expiry back: ttl {}", ttl);

        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
        assert!(redis.check_rate_limit(key, 2, 3).await.unwrap());
        let _: () = conn.del(key).await.unwrap();
    }
}
