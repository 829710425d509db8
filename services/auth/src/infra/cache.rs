use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::RateLimiter;
use crate::error::AuthServiceError;

/// Fixed-window rate limiter on Redis INCR. The window starts at the first
/// hit and the key expires with it; counts are per-instance-agnostic.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pub pool: Pool,
}

impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        key: &str,
        limit: u32,
        window_secs: u64,
    ) -> Result<bool, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;

        let key = format!("ratelimit:{key}");
        let count: u32 = conn
            .incr(&key, 1u32)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| AuthServiceError::Internal(e.into()))?;

        // First hit opens the window.
        if count == 1 {
            let (): () = conn
                .expire(&key, window_secs as i64)
                .await
                .map_err(|e: deadpool_redis::redis::RedisError| {
                    AuthServiceError::Internal(e.into())
                })?;
        }

        Ok(count <= limit)
    }
}
