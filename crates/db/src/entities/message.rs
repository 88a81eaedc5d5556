//! Direct message entity.
//!
//! Owned by the messaging domain; the moderation core only flips the
//! `removed` flag and reads previews.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub sender_id: String,

    #[sea_orm(indexed)]
    pub recipient_id: String,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// Set when moderation removes the message.
    #[sea_orm(default_value = false)]
    pub removed: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
