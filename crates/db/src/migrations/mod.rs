//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_item_table;
mod m20250601_000003_create_message_table;
mod m20250601_000004_create_blocked_keyword_table;
mod m20250601_000005_create_content_filter_log_table;
mod m20250601_000006_create_report_table;
mod m20250601_000007_create_moderation_action_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_item_table::Migration),
            Box::new(m20250601_000003_create_message_table::Migration),
            Box::new(m20250601_000004_create_blocked_keyword_table::Migration),
            Box::new(m20250601_000005_create_content_filter_log_table::Migration),
            Box::new(m20250601_000006_create_report_table::Migration),
            Box::new(m20250601_000007_create_moderation_action_table::Migration),
        ]
    }
}
