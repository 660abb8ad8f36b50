use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Actors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Actors::Name).string().not_null())
                    .col(ColumnDef::new(Actors::Phone).string().not_null())
                    .col(
                        ColumnDef::new(Actors::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Actors::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Actors::Role).string().not_null())
                    .col(ColumnDef::new(Actors::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Actors::UpdatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Actors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Actors {
    Table,
    Id,
    Name,
    Phone,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}
