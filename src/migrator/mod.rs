use sea_orm_migration::prelude::*;

mod m20260807_000001_create_actors;
mod m20260807_000002_create_alerts;
mod m20260807_000003_create_alert_responders;
mod m20260807_000004_create_session_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260807_000001_create_actors::Migration),
            Box::new(m20260807_000002_create_alerts::Migration),
            Box::new(m20260807_000003_create_alert_responders::Migration),
            Box::new(m20260807_000004_create_session_tokens::Migration),
        ]
    }
}
