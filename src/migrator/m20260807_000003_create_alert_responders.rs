use sea_orm_migration::prelude::*;

use super::m20260807_000001_create_actors::Actors;
use super::m20260807_000002_create_alerts::Alerts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertResponders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AlertResponders::AlertId).uuid().not_null())
                    .col(ColumnDef::new(AlertResponders::ActorId).uuid().not_null())
                    .col(
                        ColumnDef::new(AlertResponders::AssignedAt)
                            .date_time()
                            .not_null(),
                    )
                    // Composite key: one membership row per (alert, actor).
                    .primary_key(
                        Index::create()
                            .col(AlertResponders::AlertId)
                            .col(AlertResponders::ActorId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_responders_alert")
                            .from(AlertResponders::Table, AlertResponders::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_responders_actor")
                            .from(AlertResponders::Table, AlertResponders::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertResponders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AlertResponders {
    Table,
    AlertId,
    ActorId,
    AssignedAt,
}
