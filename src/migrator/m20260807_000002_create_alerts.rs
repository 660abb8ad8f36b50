use sea_orm_migration::prelude::*;

use super::m20260807_000001_create_actors::Actors;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Alerts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Alerts::ReporterId).uuid().not_null())
                    .col(ColumnDef::new(Alerts::EmergencyType).string().not_null())
                    .col(ColumnDef::new(Alerts::Description).text())
                    .col(ColumnDef::new(Alerts::Latitude).double().not_null())
                    .col(ColumnDef::new(Alerts::Longitude).double().not_null())
                    .col(ColumnDef::new(Alerts::Address).string())
                    .col(ColumnDef::new(Alerts::Priority).string().not_null())
                    .col(ColumnDef::new(Alerts::Status).string().not_null())
                    .col(ColumnDef::new(Alerts::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Alerts::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alerts_reporter")
                            .from(Alerts::Table, Alerts::ReporterId)
                            .to(Actors::Table, Actors::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The active roster filters on status and sorts newest-first.
        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_status_created_at")
                    .table(Alerts::Table)
                    .col(Alerts::Status)
                    .col(Alerts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_reporter_id")
                    .table(Alerts::Table)
                    .col(Alerts::ReporterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Alerts {
    Table,
    Id,
    ReporterId,
    EmergencyType,
    Description,
    Latitude,
    Longitude,
    Address,
    Priority,
    Status,
    CreatedAt,
    UpdatedAt,
}
