use sea_orm::entity::prelude::*;

/// A user's custom-badge request. One row per user at most; `status` is
/// "pending", "approved", or "denied".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "badge_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub badge_name: String,
    pub badge_description: Option<String>,
    pub badge_color: String,
    pub badge_icon_url: Option<String>,
    pub status: String,
    pub denial_reason: Option<String>,
    pub admin_edited_name: Option<String>,
    pub admin_edited_description: Option<String>,
    pub admin_edited_color: Option<String>,
    pub admin_edited_icon_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
