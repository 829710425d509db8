use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MfaFactors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MfaFactors::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MfaFactors::UserId).uuid().not_null())
                    .col(ColumnDef::new(MfaFactors::Secret).binary().not_null())
                    .col(ColumnDef::new(MfaFactors::VerifiedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(MfaFactors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MfaFactors::Table, MfaFactors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(MfaFactors::Table)
                    .col(MfaFactors::UserId)
                    .name("idx_mfa_factors_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MfaFactors::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MfaFactors {
    Table,
    Id,
    UserId,
    Secret,
    VerifiedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
