//! Database entities.

#![allow(missing_docs)]

pub mod blocked_keyword;
pub mod content_filter_log;
pub mod item;
pub mod message;
pub mod moderation_action;
pub mod report;
pub mod user;

pub use blocked_keyword::Entity as BlockedKeyword;
pub use content_filter_log::Entity as ContentFilterLog;
pub use item::Entity as Item;
pub use message::Entity as Message;
pub use moderation_action::Entity as ModerationAction;
pub use report::Entity as Report;
pub use user::Entity as User;
