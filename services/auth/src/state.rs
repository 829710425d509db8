use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::infra::cache::RedisRateLimiter;
use crate::infra::db::{DbMfaFactorRepository, DbUserRepository, DbVerificationCodeRepository};
use crate::infra::turnstile::TurnstileVerifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub http: reqwest::Client,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub turnstile_secret: String,
    pub turnstile_allow_dev_bypass: bool,
    pub internal_token: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn factor_repo(&self) -> DbMfaFactorRepository {
        DbMfaFactorRepository {
            db: self.db.clone(),
        }
    }

    pub fn rate_limiter(&self) -> RedisRateLimiter {
        RedisRateLimiter {
            pool: self.redis.clone(),
        }
    }

    pub fn bot_verifier(&self) -> TurnstileVerifier {
        TurnstileVerifier {
            client: self.http.clone(),
            secret: self.turnstile_secret.clone(),
            allow_dev_bypass: self.turnstile_allow_dev_bypass,
        }
    }
}
