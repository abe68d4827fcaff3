//! Database migrations.
//!
//! Initial schema for users, prompts, tags and the vote ledger.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user_table;
mod m20250101_000002_create_prompt_table;
mod m20250101_000003_create_tag_tables;
mod m20250101_000004_create_vote_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user_table::Migration),
            Box::new(m20250101_000002_create_prompt_table::Migration),
            Box::new(m20250101_000003_create_tag_tables::Migration),
            Box::new(m20250101_000004_create_vote_table::Migration),
        ]
    }
}
