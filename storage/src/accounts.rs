//! Accounts and sessions.
//!
//! Passwords are stored as argon2id PHC strings. A session is an opaque
//! random token with an expiry. Expired sessions are deleted when presented
//! and swept on every sign in.

use manga_reader_common::models;
use manga_reader_common::utils::password;

use crate::error::is_unique_violation;
use crate::{new_id, now, Result, StoreError, Storage};

const USER_COLUMNS: &str = "id, email, is_admin, created_at";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

// Hashing runs on the blocking pool.
async fn hash_password(plain: &str) -> Result<String> {
    let plain = plain.to_string();
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

async fn verify_password(plain: &str, stored: String) -> Result<bool> {
    let plain = plain.to_string();
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored))
        .await
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

impl Storage {
    pub async fn sign_up(&self, email: &str, password: &str, is_admin: bool) -> Result<models::User> {
        let email = normalize_email(email);
        let user_id = new_id();
        let password_hash = hash_password(password).await?;
        let created_at = now();

        let inserted = sqlx::query(
            "INSERT INTO users (id, email, password_hash, is_admin, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user_id)
        .bind(&email)
        .bind(&password_hash)
        .bind(is_admin)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(StoreError::EmailTaken),
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Registered user {} ({})", email, user_id);
        Ok(models::User {
            id: user_id,
            email,
            is_admin,
            created_at,
        })
    }

    /// Checks the password and opens a session valid for `ttl_secs`.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        ttl_secs: i64,
    ) -> Result<(models::User, models::Session)> {
        let email = normalize_email(email);
        let stored_hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE email = ?")
                .bind(&email)
                .fetch_optional(&self.pool)
                .await?;

        let Some(stored_hash) = stored_hash else {
            return Err(StoreError::InvalidCredentials);
        };
        if !verify_password(password, stored_hash).await? {
            return Err(StoreError::InvalidCredentials);
        }

        let user = sqlx::query_as::<_, models::User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(&email)
        .fetch_one(&self.pool)
        .await?;

        self.purge_expired_sessions().await?;

        let created_at = now();
        let session = models::Session {
            token: new_token(),
            user_id: user.id.clone(),
            created_at,
            expires_at: created_at + ttl_secs,
        };

        sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
            .bind(&session.token)
            .bind(&session.user_id)
            .bind(session.created_at)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;

        Ok((user, session))
    }

    /// Deletes every session past its expiry. Returns how many were removed.
    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            tracing::debug!("Purged {} expired sessions", result.rows_affected());
        }
        Ok(result.rows_affected())
    }

    /// Returns whether a session was closed.
    pub async fn sign_out(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolves a bearer token to its user.
    pub async fn user_for_session(&self, token: &str) -> Result<Option<models::User>> {
        let session = sqlx::query_as::<_, models::Session>("SELECT * FROM sessions WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        let Some(session) = session else {
            return Ok(None);
        };
        if session.expires_at <= now() {
            tracing::debug!("Session for user {} expired", session.user_id);
            self.sign_out(token).await?;
            return Ok(None);
        }

        self.get_user(&session.user_id).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<models::User>> {
        let user = sqlx::query_as::<_, models::User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Grants the admin flag. Returns false when no account has that email.
    pub async fn promote_admin(&self, email: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_admin = 1 WHERE email = ?")
            .bind(normalize_email(email))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    const DAY: i64 = 24 * 60 * 60;

    #[tokio::test]
    async fn sign_in_opens_a_session() {
        let storage = test_support::storage().await;
        let user = storage.sign_up("Reader@Example.com", "password1", false).await.unwrap();
        assert_eq!(user.email, "reader@example.com");

        let (signed_in, session) = storage
            .sign_in("reader@example.com", "password1", DAY)
            .await
            .unwrap();
        assert_eq!(signed_in, user);
        assert_eq!(session.token.len(), 64);

        let resolved = storage.user_for_session(&session.token).await.unwrap();
        assert_eq!(resolved, Some(user));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let storage = test_support::storage().await;
        test_support::user(&storage, "a@example.com").await;

        assert!(matches!(
            storage.sign_in("a@example.com", "nope-nope", DAY).await,
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            storage.sign_in("ghost@example.com", "password1", DAY).await,
            Err(StoreError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let storage = test_support::storage().await;
        test_support::user(&storage, "dup@example.com").await;

        let err = storage
            .sign_up("DUP@example.com", "password2", false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));
    }

    #[tokio::test]
    async fn sign_out_ends_session() {
        let storage = test_support::storage().await;
        test_support::user(&storage, "b@example.com").await;
        let (_, session) = storage.sign_in("b@example.com", "password1", DAY).await.unwrap();

        assert!(storage.sign_out(&session.token).await.unwrap());
        assert!(!storage.sign_out(&session.token).await.unwrap());
        assert_eq!(storage.user_for_session(&session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_session_is_dropped() {
        let storage = test_support::storage().await;
        test_support::user(&storage, "c@example.com").await;
        let (_, session) = storage.sign_in("c@example.com", "password1", -1).await.unwrap();

        assert_eq!(storage.user_for_session(&session.token).await.unwrap(), None);
        assert!(!storage.sign_out(&session.token).await.unwrap());
    }

    #[tokio::test]
    async fn sign_in_sweeps_abandoned_sessions() {
        let storage = test_support::storage().await;
        test_support::user(&storage, "d@example.com").await;
        for _ in 0..5 {
            storage.sign_in("d@example.com", "password1", -1).await.unwrap();
        }

        let (_, live) = storage.sign_in("d@example.com", "password1", DAY).await.unwrap();

        let tokens: Vec<String> = sqlx::query_scalar("SELECT token FROM sessions")
            .fetch_all(&storage.pool)
            .await
            .unwrap();
        assert_eq!(tokens, vec![live.token]);
        assert_eq!(storage.purge_expired_sessions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn password_is_not_stored_in_plain_text() {
        let storage = test_support::storage().await;
        test_support::user(&storage, "e@example.com").await;

        let stored: String =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE email = 'e@example.com'")
                .fetch_one(&storage.pool)
                .await
                .unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("password1"));
    }

    #[tokio::test]
    async fn promote_sets_admin_flag() {
        let storage = test_support::storage().await;
        let user = test_support::user(&storage, "boss@example.com").await;
        assert!(!user.is_admin);

        assert!(storage.promote_admin("Boss@example.com").await.unwrap());
        assert!(!storage.promote_admin("nobody@example.com").await.unwrap());
        assert!(storage.get_user(&user.id).await.unwrap().unwrap().is_admin);
    }
}
