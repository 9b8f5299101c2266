//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{category, transaction, user},
    entities::{self, CategoryKind},
    errors::Result,
    money::Money,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date from its parts.
#[allow(clippy::unwrap_used)]
pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test user with sensible defaults.
///
/// # Defaults
/// * `username`: "Test User"
/// * `password_hash`: "test-hash"
pub async fn create_test_user(
    db: &DatabaseConnection,
    email: &str,
) -> Result<entities::user::Model> {
    user::register_user(
        db,
        "Test User".to_string(),
        email.to_string(),
        "test-hash".to_string(),
    )
    .await
}

/// Creates a test category for the given user.
pub async fn create_test_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    kind: CategoryKind,
) -> Result<entities::category::Model> {
    category::create_category(db, user_id, name.to_string(), kind).await
}

/// Creates a test transaction without a comment.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount_cents: i64,
    date: NaiveDate,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        user_id,
        category_id,
        Money::from_cents(amount_cents),
        date,
        None,
    )
    .await
}

/// Sets up a complete test environment with one registered user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "user@example.com").await?;
    Ok((db, user))
}

/// Sets up a test environment with one user plus one income ("Salary") and
/// one expense ("Groceries") category.
/// Returns (db, user, income, expense) for reporting tests.
pub async fn setup_with_categories() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::category::Model,
    entities::category::Model,
)> {
    let (db, user) = setup_with_user().await?;
    let income = create_test_category(&db, user.id, "Salary", CategoryKind::Income).await?;
    let expense = create_test_category(&db, user.id, "Groceries", CategoryKind::Expense).await?;
    Ok((db, user, income, expense))
}
