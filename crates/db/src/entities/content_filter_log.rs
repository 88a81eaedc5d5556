//! Content filter audit log entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of user content submitted for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[sea_orm(string_value = "item_title")]
    ItemTitle,
    #[sea_orm(string_value = "item_description")]
    ItemDescription,
    #[sea_orm(string_value = "message")]
    Message,
}

/// Action the filter took on the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    #[sea_orm(string_value = "blocked")]
    Blocked,
    #[sea_orm(string_value = "warned")]
    Warned,
    #[sea_orm(string_value = "allowed")]
    Allowed,
}

/// Append-only record of a filter decision. Written exactly once per
/// filtering call that matched at least one keyword, referencing the
/// first matched rule. Never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_filter_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author of the filtered content.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// What kind of content was filtered.
    pub content_type: ContentType,

    /// Identifier of the content in its owning store, when known.
    #[sea_orm(nullable)]
    pub content_id: Option<String>,

    /// The first rule that matched.
    pub matched_keyword_id: String,

    pub action_taken: FilterAction,

    /// Truncated copy of the offending content (at most 200 chars).
    pub content_preview: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blocked_keyword::Entity",
        from = "Column::MatchedKeywordId",
        to = "super::blocked_keyword::Column::Id"
    )]
    BlockedKeyword,
}

impl Related<super::blocked_keyword::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlockedKeyword.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
