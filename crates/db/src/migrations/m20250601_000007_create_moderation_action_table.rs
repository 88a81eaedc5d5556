//! Create moderation_action table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModerationAction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModerationAction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::ModeratorId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::ActionType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::TargetType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModerationAction::TargetId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ModerationAction::ReportId).string_len(32))
                    .col(ColumnDef::new(ModerationAction::Notes).text())
                    .col(
                        ColumnDef::new(ModerationAction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_moderation_action_report")
                            .from(ModerationAction::Table, ModerationAction::ReportId)
                            .to(Report::Table, Report::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_action_report_id")
                    .table(ModerationAction::Table)
                    .col(ModerationAction::ReportId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_moderation_action_moderator_id")
                    .table(ModerationAction::Table)
                    .col(ModerationAction::ModeratorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModerationAction::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ModerationAction {
    Table,
    Id,
    ModeratorId,
    ActionType,
    TargetType,
    TargetId,
    ReportId,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
}
