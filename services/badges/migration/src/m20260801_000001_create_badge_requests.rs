use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BadgeRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BadgeRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BadgeRequests::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BadgeRequests::BadgeName).string().not_null())
                    .col(ColumnDef::new(BadgeRequests::BadgeDescription).string())
                    .col(
                        ColumnDef::new(BadgeRequests::BadgeColor)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BadgeRequests::BadgeIconUrl).string())
                    .col(
                        ColumnDef::new(BadgeRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(BadgeRequests::DenialReason).string())
                    .col(ColumnDef::new(BadgeRequests::AdminEditedName).string())
                    .col(ColumnDef::new(BadgeRequests::AdminEditedDescription).string())
                    .col(ColumnDef::new(BadgeRequests::AdminEditedColor).string())
                    .col(ColumnDef::new(BadgeRequests::AdminEditedIconUrl).string())
                    .col(
                        ColumnDef::new(BadgeRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BadgeRequests::ReviewedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(BadgeRequests::Table)
                    .col(BadgeRequests::Status)
                    .name("idx_badge_requests_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BadgeRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BadgeRequests {
    Table,
    Id,
    UserId,
    BadgeName,
    BadgeDescription,
    BadgeColor,
    BadgeIconUrl,
    Status,
    DenialReason,
    AdminEditedName,
    AdminEditedDescription,
    AdminEditedColor,
    AdminEditedIconUrl,
    CreatedAt,
    ReviewedAt,
}
