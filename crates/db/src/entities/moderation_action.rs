//! Moderation action audit entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::report::TargetType;

/// Remediation applied by a moderator (or by the escalation sweep).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[sea_orm(string_value = "remove_content")]
    RemoveContent,
    #[sea_orm(string_value = "ban_user")]
    BanUser,
    #[sea_orm(string_value = "dismiss_report")]
    DismissReport,
    #[sea_orm(string_value = "warn_user")]
    WarnUser,
}

/// Append-only audit trail entry. One row per executed remediation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_action")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Acting moderator, or the system identity for automatic escalation.
    #[sea_orm(indexed)]
    pub moderator_id: String,

    pub action_type: ActionType,

    pub target_type: TargetType,

    pub target_id: String,

    /// The report that justified this action, when there is one.
    #[sea_orm(nullable, indexed)]
    pub report_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id"
    )]
    Report,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
