//! User business logic - Registration and account lookups.
//!
//! Registration validates the basics and rejects duplicate emails; the
//! password hash arrives pre-computed from the authentication layer, which
//! owns all credential mechanics. All functions are async and return Result
//! types for error handling.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Registers a new account.
///
/// The email is normalized to lowercase and must not already be registered.
/// `password_hash` is stored as-is; this crate never sees the plaintext
/// credential.
///
/// # Arguments
/// * `db` - Database connection
/// * `username` - Display name, must be non-empty
/// * `email` - Login email, unique across users
/// * `password_hash` - Opaque hash produced by the authentication layer
pub async fn register_user(
    db: &DatabaseConnection,
    username: String,
    email: String,
    password_hash: String,
) -> Result<user::Model> {
    if username.trim().is_empty() {
        return Err(Error::Config {
            message: "Username cannot be empty".to_string(),
        });
    }

    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(Error::Config {
            message: "Email cannot be empty".to_string(),
        });
    }

    let existing = User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(Error::EmailTaken { email });
    }

    let now = chrono::Utc::now();
    let user = user::ActiveModel {
        username: Set(username.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        created_at: Set(now),
        ..Default::default()
    };

    let result = user.insert(db).await?;
    Ok(result)
}

/// Finds a user by their unique ID, returning None if not registered.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by email, the lookup the login flow starts from.
///
/// The email is lowercased before comparison to match the normalization
/// applied at registration.
pub async fn get_user_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_user() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(
            &db,
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        )
        .await?;

        assert_eq!(user.username, "Alice");
        assert_eq!(user.email, "alice@example.com");

        let found = get_user_by_id(&db, user.id).await?;
        assert_eq!(found, Some(user));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_normalizes_email() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(
            &db,
            "Bob".to_string(),
            "  Bob@Example.COM ".to_string(),
            "hash".to_string(),
        )
        .await?;

        assert_eq!(user.email, "bob@example.com");

        let found = get_user_by_email(&db, "BOB@example.com").await?;
        assert!(found.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_duplicate_email() -> Result<()> {
        let db = setup_test_db().await?;

        register_user(
            &db,
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        )
        .await?;

        let result = register_user(
            &db,
            "Impostor".to_string(),
            "ALICE@example.com".to_string(),
            "other-hash".to_string(),
        )
        .await;

        assert!(matches!(result, Err(Error::EmailTaken { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_user_empty_username() -> Result<()> {
        let db = setup_test_db().await?;

        let result = register_user(
            &db,
            "   ".to_string(),
            "someone@example.com".to_string(),
            "hash".to_string(),
        )
        .await;

        assert!(matches!(result, Err(Error::Config { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_by_id_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let found = get_user_by_id(&db, 999).await?;
        assert!(found.is_none());

        Ok(())
    }
}
