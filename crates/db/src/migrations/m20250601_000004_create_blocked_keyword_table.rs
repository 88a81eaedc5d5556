//! Create blocked_keyword table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlockedKeyword::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockedKeyword::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BlockedKeyword::Keyword)
                            .string_len(512)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlockedKeyword::PatternType)
                            .string_len(16)
                            .not_null()
                            .default("contains"),
                    )
                    .col(
                        ColumnDef::new(BlockedKeyword::Severity)
                            .string_len(16)
                            .not_null()
                            .default("warning"),
                    )
                    .col(
                        ColumnDef::new(BlockedKeyword::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(BlockedKeyword::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on enabled for the evaluation read path
        manager
            .create_index(
                Index::create()
                    .name("idx_blocked_keyword_enabled")
                    .table(BlockedKeyword::Table)
                    .col(BlockedKeyword::Enabled)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlockedKeyword::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BlockedKeyword {
    Table,
    Id,
    Keyword,
    PatternType,
    Severity,
    Enabled,
    CreatedAt,
}
