use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use uservault_auth_schema::{mfa_factors, outbox_events, users, verification_codes};

use crate::domain::repository::{MfaFactorRepository, UserRepository, VerificationCodeRepository};
use crate::domain::types::{AuthUser, CodePurpose, MfaFactor, OutboxEvent, VerificationCode};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(i16::from(user.role)),
            banned: Set(user.banned),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(hash.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set password hash")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> AuthUser {
    AuthUser {
        id: model.id,
        email: model.email,
        username: model.username,
        password_hash: model.password_hash,
        role: model.role as u8,
        banned: model.banned,
        created_at: model.created_at,
    }
}

// ── Verification code repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn replace_active(
        &self,
        code: &VerificationCode,
        event: &OutboxEvent,
    ) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                let event = event.clone();
                Box::pin(async move {
                    supersede_active_codes(txn, &code.email, code.purpose).await?;
                    insert_verification_code(txn, &code).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("replace active verification code")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<VerificationCode>, AuthServiceError> {
        let now = Utc::now();
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::Email.eq(email))
            .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(verification_codes::Column::Code.eq(code))
            .filter(verification_codes::Column::UsedAt.is_null())
            .filter(verification_codes::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid verification code")?;
        code_from_model(model).map_err(Into::into)
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        verification_codes::ActiveModel {
            id: Set(id),
            used_at: Set(Some(now)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark verification code used")?;
        Ok(())
    }
}

/// A new code invalidates any still-active code for the same pair, so only
/// the latest one ever redeems.
async fn supersede_active_codes(
    txn: &DatabaseTransaction,
    email: &str,
    purpose: CodePurpose,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    verification_codes::Entity::update_many()
        .col_expr(
            verification_codes::Column::UsedAt,
            sea_orm::sea_query::Expr::value(now),
        )
        .filter(verification_codes::Column::Email.eq(email))
        .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
        .filter(verification_codes::Column::UsedAt.is_null())
        .exec(txn)
        .await?;
    Ok(())
}

async fn insert_verification_code(
    txn: &DatabaseTransaction,
    code: &VerificationCode,
) -> Result<(), sea_orm::DbErr> {
    verification_codes::ActiveModel {
        id: Set(code.id),
        email: Set(code.email.clone()),
        code: Set(code.code.clone()),
        purpose: Set(code.purpose.as_str().to_owned()),
        expires_at: Set(code.expires_at),
        used_at: Set(None),
        created_at: Set(code.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), sea_orm::DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn code_from_model(
    model: Option<verification_codes::Model>,
) -> anyhow::Result<Option<VerificationCode>> {
    let Some(model) = model else {
        return Ok(None);
    };
    let purpose = CodePurpose::from_str(&model.purpose)
        .with_context(|| format!("unknown code purpose {:?}", model.purpose))?;
    Ok(Some(VerificationCode {
        id: model.id,
        email: model.email,
        code: model.code,
        purpose,
        expires_at: model.expires_at,
        used_at: model.used_at,
        created_at: model.created_at,
    }))
}

// ── MFA factor repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMfaFactorRepository {
    pub db: DatabaseConnection,
}

impl MfaFactorRepository for DbMfaFactorRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<MfaFactor>, AuthServiceError> {
        let models = mfa_factors::Entity::find()
            .filter(mfa_factors::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .context("list mfa factors by user")?;
        Ok(models.into_iter().map(factor_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MfaFactor>, AuthServiceError> {
        let model = mfa_factors::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find mfa factor by id")?;
        Ok(model.map(factor_from_model))
    }

    async fn find_verified_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MfaFactor>, AuthServiceError> {
        let model = mfa_factors::Entity::find()
            .filter(mfa_factors::Column::UserId.eq(user_id))
            .filter(mfa_factors::Column::VerifiedAt.is_not_null())
            .one(&self.db)
            .await
            .context("find verified mfa factor")?;
        Ok(model.map(factor_from_model))
    }

    async fn create(&self, factor: &MfaFactor) -> Result<(), AuthServiceError> {
        mfa_factors::ActiveModel {
            id: Set(factor.id),
            user_id: Set(factor.user_id),
            secret: Set(factor.secret.clone()),
            verified_at: Set(factor.verified_at),
            created_at: Set(factor.created_at),
        }
        .insert(&self.db)
        .await
        .context("create mfa factor")?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let now = Utc::now();
        mfa_factors::ActiveModel {
            id: Set(id),
            verified_at: Set(Some(now)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark mfa factor verified")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, AuthServiceError> {
        let result = mfa_factors::Entity::delete_many()
            .filter(mfa_factors::Column::Id.eq(id))
            .filter(mfa_factors::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete mfa factor")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_unverified_by_user(&self, user_id: Uuid) -> Result<u64, AuthServiceError> {
        let result = mfa_factors::Entity::delete_many()
            .filter(mfa_factors::Column::UserId.eq(user_id))
            .filter(mfa_factors::Column::VerifiedAt.is_null())
            .exec(&self.db)
            .await
            .context("delete unverified mfa factors")?;
        Ok(result.rows_affected)
    }
}

fn factor_from_model(model: mfa_factors::Model) -> MfaFactor {
    MfaFactor {
        id: model.id,
        user_id: model.user_id,
        secret: model.secret,
        verified_at: model.verified_at,
        created_at: model.created_at,
    }
}
