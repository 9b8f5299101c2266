//! Category business logic - Handles all category-related operations.
//!
//! Provides functions for creating, retrieving and deleting the categories
//! a user files transactions under. Category names are unique per user, and
//! a category that still has transactions cannot be deleted. All functions
//! are async and return Result types for error handling.

use crate::{
    config::categories::Config,
    entities::{Category, CategoryKind, Transaction, category, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new category for a user, performing input validation.
///
/// The name is trimmed and must be non-empty and unique among the user's
/// categories. The kind is fixed at creation; a category never switches
/// between income and expense.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: String,
    kind: CategoryKind,
) -> Result<category::Model> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let existing = Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(name.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateCategory { name });
    }

    let category = category::ActiveModel {
        user_id: Set(user_id),
        name: Set(name),
        kind: Set(kind),
        ..Default::default()
    };

    let result = category.insert(db).await?;
    Ok(result)
}

/// Retrieves all of a user's categories, ordered alphabetically by name.
pub async fn get_categories_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a user's categories of one kind, ordered alphabetically.
pub async fn get_categories_by_kind(
    db: &DatabaseConnection,
    user_id: i64,
    kind: CategoryKind,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Kind.eq(kind))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its unique ID, returning None if it does not exist.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a category after verifying ownership.
///
/// Refuses with [`Error::CategoryInUse`] while any transaction still
/// references the category, so transaction rows can never lose their
/// classification.
pub async fn delete_category(db: &DatabaseConnection, user_id: i64, category_id: i64) -> Result<()> {
    let category = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    if category.user_id != user_id {
        return Err(Error::AccessDenied);
    }

    let references = Transaction::find()
        .filter(transaction::Column::CategoryId.eq(category_id))
        .count(db)
        .await?;
    if references > 0 {
        return Err(Error::CategoryInUse { id: category_id });
    }

    category.delete(db).await?;
    Ok(())
}

/// Seeds the default category set from config.toml for a newly registered
/// user, skipping any name the user already has. Returns the categories
/// that were created.
pub async fn seed_default_categories(
    db: &DatabaseConnection,
    user_id: i64,
    config: &Config,
) -> Result<Vec<category::Model>> {
    let existing: Vec<String> = get_categories_for_user(db, user_id)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    let mut created = Vec::new();
    for default in &config.categories {
        if existing.iter().any(|name| name == &default.name) {
            continue;
        }
        created.push(create_category(db, user_id, default.name.clone(), default.kind).await?);
    }

    Ok(created)
}
