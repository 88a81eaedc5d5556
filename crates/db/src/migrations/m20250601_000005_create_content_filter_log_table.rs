//! Create content_filter_log table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentFilterLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentFilterLog::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentFilterLog::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentFilterLog::ContentType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContentFilterLog::ContentId).string_len(32))
                    .col(
                        ColumnDef::new(ContentFilterLog::MatchedKeywordId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentFilterLog::ActionTaken)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentFilterLog::ContentPreview)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentFilterLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_filter_log_keyword")
                            .from(
                                ContentFilterLog::Table,
                                ContentFilterLog::MatchedKeywordId,
                            )
                            .to(BlockedKeyword::Table, BlockedKeyword::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_filter_log_user_id")
                    .table(ContentFilterLog::Table)
                    .col(ContentFilterLog::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentFilterLog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentFilterLog {
    Table,
    Id,
    UserId,
    ContentType,
    ContentId,
    MatchedKeywordId,
    ActionTaken,
    ContentPreview,
    CreatedAt,
}

#[derive(Iden)]
enum BlockedKeyword {
    Table,
    Id,
}
