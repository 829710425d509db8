use sea_orm_migration::prelude::*;

mod m20260801_000001_create_badge_requests;
mod m20260801_000002_create_global_badges;
mod m20260801_000003_create_user_badges;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_badge_requests::Migration),
            Box::new(m20260801_000002_create_global_badges::Migration),
            Box::new(m20260801_000003_create_user_badges::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
