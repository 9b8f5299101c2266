//! Unified error type and result alias for the crate.
//!
//! Services and the aggregation engine return typed errors and never retry;
//! translating them into user-facing responses is the transport layer's job.

use chrono::NaiveDate;
use thiserror::Error;

/// All failures the tracker can surface to its callers.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problem: missing file, bad TOML, invalid value.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what is wrong
        message: String,
    },

    /// Any error bubbling up from the database layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error while reading configuration or similar.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or malformed.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A report range where `from` lies after `to`.
    #[error("Invalid report range: {from} is after {to}")]
    InvalidRange {
        /// Requested start of the period
        from: NaiveDate,
        /// Requested end of the period
        to: NaiveDate,
    },

    /// A transaction amount that is not strictly positive.
    #[error("Invalid transaction amount: {cents} cents")]
    InvalidAmount {
        /// The offending amount in cents
        cents: i64,
    },

    /// A transaction comment exceeding the 255-character limit.
    #[error("Comment is {length} characters, the maximum is 255")]
    CommentTooLong {
        /// Length of the rejected comment
        length: usize,
    },

    /// A transaction handed to the aggregation engine without a resolved
    /// category. Signals a data-integrity fault upstream, never skipped.
    #[error("Transaction {transaction_id} has no resolvable category")]
    UnresolvedCategory {
        /// ID of the orphaned transaction
        transaction_id: i64,
    },

    /// No user with the given ID.
    #[error("User {id} not found")]
    UserNotFound {
        /// The missing user ID
        id: i64,
    },

    /// No category with the given ID.
    #[error("Category {id} not found")]
    CategoryNotFound {
        /// The missing category ID
        id: i64,
    },

    /// No transaction with the given ID.
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// The missing transaction ID
        id: i64,
    },

    /// No report with the given ID.
    #[error("Report {id} not found")]
    ReportNotFound {
        /// The missing report ID
        id: i64,
    },

    /// The resource exists but belongs to a different user.
    #[error("Access denied")]
    AccessDenied,

    /// Registration attempted with an email that is already taken.
    #[error("Email {email} is already registered")]
    EmailTaken {
        /// The conflicting email address
        email: String,
    },

    /// A category name that already exists for this user.
    #[error("Category \"{name}\" already exists for this user")]
    DuplicateCategory {
        /// The conflicting category name
        name: String,
    },

    /// A category that still has transactions cannot be deleted.
    #[error("Category {id} still has transactions")]
    CategoryInUse {
        /// ID of the referenced category
        id: i64,
    },
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
