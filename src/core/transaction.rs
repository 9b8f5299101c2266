//! Transaction business logic - Handles all transaction-related operations.
//!
//! This module provides functions for creating, retrieving, updating and
//! deleting the income/expense records a user files under their categories,
//! plus the range query the reporting core is built on. Every operation
//! takes an explicit user ID and checks ownership before touching a row.
//! All functions are async and return Result types for error handling.

use crate::{
    entities::{Category, Transaction, category, transaction},
    errors::{Error, Result},
    money::Money,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Longest comment a transaction may carry, in characters.
pub const MAX_COMMENT_LENGTH: usize = 255;

/// A transaction as returned by queries: the row plus its category, resolved
/// by the store so downstream consumers never re-resolve it themselves.
pub type ResolvedTransaction = (transaction::Model, Option<category::Model>);

/// Partial update for an existing transaction. `None` fields are left
/// untouched; `comment: Some(None)` clears the comment.
#[derive(Debug, Default, Clone)]
pub struct TransactionChanges {
    /// New category, which must belong to the same user
    pub category_id: Option<i64>,
    /// New amount, strictly positive
    pub amount: Option<Money>,
    /// New calendar date
    pub date: Option<NaiveDate>,
    /// New comment, or `Some(None)` to clear it
    pub comment: Option<Option<String>>,
}

fn validate_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(Error::InvalidAmount {
            cents: amount.cents(),
        });
    }
    Ok(())
}

fn validate_comment(comment: Option<&String>) -> Result<()> {
    if let Some(text) = comment {
        let length = text.chars().count();
        if length > MAX_COMMENT_LENGTH {
            return Err(Error::CommentTooLong { length });
        }
    }
    Ok(())
}

/// Looks up a category and verifies it belongs to the given user.
async fn resolve_owned_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<category::Model> {
    let category = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    if category.user_id != user_id {
        return Err(Error::AccessDenied);
    }

    Ok(category)
}

/// Creates a new transaction for a user, performing input validation.
///
/// The amount must be strictly positive (the direction of the money flow
/// comes from the category's kind, not from a sign), the comment is capped
/// at 255 characters, and the category must exist and belong to the same
/// user.
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount: Money,
    date: NaiveDate,
    comment: Option<String>,
) -> Result<transaction::Model> {
    validate_amount(amount)?;
    validate_comment(comment.as_ref())?;
    resolve_owned_category(db, user_id, category_id).await?;

    let transaction = transaction::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        amount_cents: Set(amount.cents()),
        date: Set(date),
        comment: Set(comment),
        ..Default::default()
    };

    let result = transaction.insert(db).await?;
    Ok(result)
}

/// Retrieves all of a user's transactions with categories resolved, ordered
/// by date (newest first).
pub async fn get_transactions_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<ResolvedTransaction>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .find_also_related(Category)
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one user's transactions inside an inclusive date range, with
/// categories resolved, ordered by date ascending.
///
/// This is the store contract the report service is built on: both boundary
/// dates are included, and every returned row carries its category so the
/// aggregation engine never queries the database itself.
pub async fn get_transactions_in_range(
    db: &DatabaseConnection,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ResolvedTransaction>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Date.between(from, to))
        .find_also_related(Category)
        .order_by_asc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific transaction with its category, verifying ownership.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<ResolvedTransaction> {
    let row = Transaction::find_by_id(transaction_id)
        .find_also_related(Category)
        .one(db)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;

    if row.0.user_id != user_id {
        return Err(Error::AccessDenied);
    }

    Ok(row)
}

/// Applies a partial update to a transaction after verifying ownership.
///
/// Changed fields go through the same validation as creation; moving the
/// transaction to another category requires that category to belong to the
/// same user.
pub async fn update_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
    changes: TransactionChanges,
) -> Result<transaction::Model> {
    let (existing, _) = get_transaction_by_id(db, user_id, transaction_id).await?;

    if let Some(amount) = changes.amount {
        validate_amount(amount)?;
    }
    if let Some(comment) = &changes.comment {
        validate_comment(comment.as_ref())?;
    }
    if let Some(category_id) = changes.category_id {
        resolve_owned_category(db, user_id, category_id).await?;
    }

    let mut active: transaction::ActiveModel = existing.into();
    if let Some(category_id) = changes.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(amount) = changes.amount {
        active.amount_cents = Set(amount.cents());
    }
    if let Some(date) = changes.date {
        active.date = Set(date);
    }
    if let Some(comment) = changes.comment {
        active.comment = Set(comment);
    }

    let result = active.update(db).await?;
    Ok(result)
}

/// Deletes a transaction after verifying ownership.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    user_id: i64,
    transaction_id: i64,
) -> Result<()> {
    let (existing, _) = get_transaction_by_id(db, user_id, transaction_id).await?;
    existing.delete(db).await?;
    Ok(())
}
