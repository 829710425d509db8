use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GlobalBadges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GlobalBadges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GlobalBadges::Name).string().not_null())
                    .col(ColumnDef::new(GlobalBadges::Description).string())
                    .col(ColumnDef::new(GlobalBadges::Color).string().not_null())
                    .col(ColumnDef::new(GlobalBadges::IconUrl).string())
                    .col(
                        ColumnDef::new(GlobalBadges::Rarity)
                            .string()
                            .not_null()
                            .default("common"),
                    )
                    .col(
                        ColumnDef::new(GlobalBadges::IsLimited)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GlobalBadges::MaxClaims)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(GlobalBadges::ClaimsCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GlobalBadges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GlobalBadges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GlobalBadges {
    Table,
    Id,
    Name,
    Description,
    Color,
    IconUrl,
    Rarity,
    IsLimited,
    MaxClaims,
    ClaimsCount,
    CreatedAt,
}
