//! Core business logic for the tradepost moderation pipeline.

pub mod services;
