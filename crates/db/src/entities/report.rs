//! User report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of entity a report or moderation action targets.
///
/// The reference is polymorphic: `(target_type, target_id)` points into
/// whichever table owns that kind, with no foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "item")]
    Item,
    #[sea_orm(string_value = "message")]
    Message,
    #[sea_orm(string_value = "comment")]
    Comment,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Report status.
///
/// `Resolved` and `Dismissed` are terminal: once reached, no further
/// transition is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "in_review")]
    InReview,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
}

impl ReportStatus {
    /// Whether this status accepts further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }
}

/// User-submitted report against a target entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who submitted the report.
    #[sea_orm(indexed)]
    pub reporter_id: String,

    pub target_type: TargetType,

    /// Identifier of the target in its owning table.
    pub target_id: String,

    /// Report category, lower-cased and trimmed at intake.
    pub category: String,

    /// Free-form reporter comment.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Arbitrary client-supplied context.
    #[sea_orm(nullable)]
    pub metadata: Option<Json>,

    pub status: ReportStatus,

    pub created_at: DateTimeWithTimeZone,

    /// SLA deadline: the report must receive moderator attention by this
    /// time or automatic escalation applies.
    pub needs_action_by: DateTimeWithTimeZone,

    /// Set the first time the report leaves `pending`, never overwritten.
    #[sea_orm(nullable)]
    pub first_response_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,

    /// Moderator who resolved the report.
    #[sea_orm(nullable)]
    pub resolved_by: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_notes: Option<String>,

    /// Flipped to true at most once by the escalation sweep, never reset.
    #[sea_orm(default_value = false)]
    pub auto_escalated: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
