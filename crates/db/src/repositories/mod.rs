//! Database repositories.

mod content;
mod filter_log;
mod keyword;
mod moderation;
mod report;
mod user;

pub use content::ContentRepository;
pub use filter_log::FilterLogRepository;
pub use keyword::KeywordRepository;
pub use moderation::{ModerationRepository, Remediation};
pub use report::ReportRepository;
pub use user::UserRepository;
