//! Business logic services.

pub mod content_filter;
pub mod escalation;
pub mod moderation;
pub mod notifier;
pub mod report;

pub use content_filter::{ContentFilterService, FilterVerdict};
pub use escalation::{EscalationService, SweepAction, SweepOutcome};
pub use moderation::{ModerationService, SYSTEM_MODERATOR_ID};
pub use notifier::{LogNotifier, ModeratorNotifier, WebhookNotifier};
pub use report::ReportService;
