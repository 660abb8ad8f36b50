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
                    .table(SessionTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionTokens::Token)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SessionTokens::ActorId).uuid().not_null())
                    .col(
                        ColumnDef::new(SessionTokens::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_tokens_actor")
                            .from(SessionTokens::Table, SessionTokens::ActorId)
                            .to(Actors::Table, Actors::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_session_tokens_actor_id")
                    .table(SessionTokens::Table)
                    .col(SessionTokens::ActorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionTokens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SessionTokens {
    Table,
    Token,
    ActorId,
    CreatedAt,
}
