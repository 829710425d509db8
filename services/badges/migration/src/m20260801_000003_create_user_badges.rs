use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserBadges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBadges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserBadges::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserBadges::BadgeId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserBadges::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UserBadges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserBadges::Table, UserBadges::BadgeId)
                            .to(GlobalBadges::Table, GlobalBadges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UserBadges::Table)
                    .col(UserBadges::UserId)
                    .name("idx_user_badges_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserBadges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserBadges {
    Table,
    Id,
    UserId,
    BadgeId,
    IsEnabled,
    CreatedAt,
}

#[derive(Iden)]
enum GlobalBadges {
    Table,
    Id,
}
