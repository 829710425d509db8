use anyhow::Context as _;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use uservault_badges_schema::{badge_requests, global_badges, user_badges};

use crate::domain::repository::BadgeRequestRepository;
use crate::domain::types::{AdminEdits, BadgeRequest, GlobalBadge, RequestStatus};
use crate::error::BadgesServiceError;

#[derive(Clone)]
pub struct DbBadgeRequestRepository {
    pub db: DatabaseConnection,
}

impl BadgeRequestRepository for DbBadgeRequestRepository {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<BadgeRequest>, BadgesServiceError> {
        let model = badge_requests::Entity::find()
            .filter(badge_requests::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find badge request by user")?;
        request_from_model(model).map_err(Into::into)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BadgeRequest>, BadgesServiceError> {
        let model = badge_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find badge request by id")?;
        request_from_model(model).map_err(Into::into)
    }

    async fn create(&self, request: &BadgeRequest) -> Result<(), BadgesServiceError> {
        badge_requests::ActiveModel {
            id: Set(request.id),
            user_id: Set(request.user_id),
            badge_name: Set(request.badge_name.clone()),
            badge_description: Set(request.badge_description.clone()),
            badge_color: Set(request.badge_color.clone()),
            badge_icon_url: Set(request.badge_icon_url.clone()),
            status: Set(request.status.as_str().to_owned()),
            denial_reason: Set(request.denial_reason.clone()),
            admin_edited_name: Set(request.admin_edited_name.clone()),
            admin_edited_description: Set(request.admin_edited_description.clone()),
            admin_edited_color: Set(request.admin_edited_color.clone()),
            admin_edited_icon_url: Set(request.admin_edited_icon_url.clone()),
            created_at: Set(request.created_at),
            reviewed_at: Set(request.reviewed_at),
        }
        .insert(&self.db)
        .await
        .context("create badge request")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, BadgesServiceError> {
        let result = badge_requests::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete badge request")?;
        Ok(result.rows_affected > 0)
    }

    async fn approve_pending(
        &self,
        id: Uuid,
        edits: &AdminEdits,
        badge: &GlobalBadge,
    ) -> Result<bool, BadgesServiceError> {
        let approved = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let edits = edits.clone();
                let badge = badge.clone();
                Box::pin(async move {
                    // Guarded transition: only one approve can win the
                    // pending -> approved race.
                    let transitioned = transition_from_pending(
                        txn,
                        id,
                        RequestStatus::Approved,
                        |update| {
                            update
                                .col_expr(
                                    badge_requests::Column::AdminEditedName,
                                    Expr::value(edits.name.clone()),
                                )
                                .col_expr(
                                    badge_requests::Column::AdminEditedDescription,
                                    Expr::value(edits.description.clone()),
                                )
                                .col_expr(
                                    badge_requests::Column::AdminEditedColor,
                                    Expr::value(edits.color.clone()),
                                )
                                .col_expr(
                                    badge_requests::Column::AdminEditedIconUrl,
                                    Expr::value(edits.icon_url.clone()),
                                )
                        },
                    )
                    .await?;
                    if !transitioned {
                        return Ok(false);
                    }

                    let user_id = badge_requests::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .map(|m| m.user_id)
                        .ok_or_else(|| {
                            sea_orm::DbErr::RecordNotFound("badge request vanished".to_owned())
                        })?;

                    insert_badge(txn, &badge).await?;
                    insert_assignment(txn, user_id, badge.id).await?;
                    Ok(true)
                })
            })
            .await
            .context("approve badge request")?;
        Ok(approved)
    }

    async fn deny_pending(&self, id: Uuid, reason: &str) -> Result<bool, BadgesServiceError> {
        let now = Utc::now();
        let result = badge_requests::Entity::update_many()
            .col_expr(
                badge_requests::Column::Status,
                Expr::value(RequestStatus::Denied.as_str()),
            )
            .col_expr(
                badge_requests::Column::DenialReason,
                Expr::value(reason.to_owned()),
            )
            .col_expr(badge_requests::Column::ReviewedAt, Expr::value(now))
            .filter(badge_requests::Column::Id.eq(id))
            .filter(badge_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .context("deny badge request")?;
        Ok(result.rows_affected > 0)
    }
}

async fn transition_from_pending<F>(
    txn: &DatabaseTransaction,
    id: Uuid,
    to: RequestStatus,
    extra: F,
) -> Result<bool, sea_orm::DbErr>
where
    F: FnOnce(
        sea_orm::UpdateMany<badge_requests::Entity>,
    ) -> sea_orm::UpdateMany<badge_requests::Entity>,
{
    let now = Utc::now();
    let update = badge_requests::Entity::update_many()
        .col_expr(badge_requests::Column::Status, Expr::value(to.as_str()))
        .col_expr(badge_requests::Column::ReviewedAt, Expr::value(now));
    let result = extra(update)
        .filter(badge_requests::Column::Id.eq(id))
        .filter(badge_requests::Column::Status.eq(RequestStatus::Pending.as_str()))
        .exec(txn)
        .await?;
    Ok(result.rows_affected > 0)
}

async fn insert_badge(txn: &DatabaseTransaction, badge: &GlobalBadge) -> Result<(), sea_orm::DbErr> {
    global_badges::ActiveModel {
        id: Set(badge.id),
        name: Set(badge.name.clone()),
        description: Set(badge.description.clone()),
        color: Set(badge.color.clone()),
        icon_url: Set(badge.icon_url.clone()),
        rarity: Set(badge.rarity.clone()),
        is_limited: Set(badge.is_limited),
        max_claims: Set(badge.max_claims),
        claims_count: Set(badge.claims_count),
        created_at: Set(badge.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_assignment(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    badge_id: Uuid,
) -> Result<(), sea_orm::DbErr> {
    user_badges::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        badge_id: Set(badge_id),
        is_enabled: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn request_from_model(
    model: Option<badge_requests::Model>,
) -> anyhow::Result<Option<BadgeRequest>> {
    let Some(model) = model else {
        return Ok(None);
    };
    let status = RequestStatus::from_str(&model.status)
        .with_context(|| format!("unknown badge request status {:?}", model.status))?;
    Ok(Some(BadgeRequest {
        id: model.id,
        user_id: model.user_id,
        badge_name: model.badge_name,
        badge_description: model.badge_description,
        badge_color: model.badge_color,
        badge_icon_url: model.badge_icon_url,
        status,
        denial_reason: model.denial_reason,
        admin_edited_name: model.admin_edited_name,
        admin_edited_description: model.admin_edited_description,
        admin_edited_color: model.admin_edited_color,
        admin_edited_icon_url: model.admin_edited_icon_url,
        created_at: model.created_at,
        reviewed_at: model.reviewed_at,
    }))
}
