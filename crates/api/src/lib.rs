//! HTTP API layer for tradepost-rs.
//!
//! This crate provides the moderation REST API:
//!
//! - **Endpoints**: content filter, report intake, moderator actions,
//!   escalation trigger
//! - **Extractors**: bearer authentication, moderator gating
//! - **Middleware**: token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
