//! Blocked keyword entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a blocked keyword is matched against content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Normalized content must equal the normalized keyword.
    #[sea_orm(string_value = "exact")]
    Exact,
    /// Normalized content must contain the normalized keyword.
    #[sea_orm(string_value = "contains")]
    Contains,
    /// Keyword is compiled as a case-insensitive regular expression.
    #[sea_orm(string_value = "regex")]
    Regex,
}

/// Severity of a keyword match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Flag the content but let it through.
    #[sea_orm(string_value = "warning")]
    Warning,
    /// Reject the content outright.
    #[sea_orm(string_value = "block")]
    Block,
}

/// Blocked keyword rule, owned by moderation admins and read-only to the
/// filter engine.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blocked_keyword")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The word, phrase, or pattern to match.
    pub keyword: String,

    /// Matching semantics for this rule.
    pub pattern_type: PatternType,

    /// Whether a match warns or blocks.
    pub severity: Severity,

    /// Disabled rules do not participate in evaluation.
    #[sea_orm(default_value = true)]
    pub enabled: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
