use sea_orm::entity::prelude::*;

/// Account record owned by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    /// Lowercase handle, 1-20 chars of `[a-z0-9_]`.
    #[sea_orm(unique)]
    pub username: String,
    /// PBKDF2-HMAC-SHA256, `pbkdf2:sha256:iterations$salt$hash`.
    pub password_hash: String,
    pub role: i16,
    pub banned: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mfa_factors::Entity")]
    MfaFactors,
}

impl Related<super::mfa_factors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MfaFactors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
