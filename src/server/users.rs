//! Accounts and sessions for the authentication endpoints.
//!
//! Passwords are stored as argon2 PHC strings. A session is an opaque
//! random token tied to one user; signing out deletes it.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::User;

const MIN_PASSWORD_LEN: usize = 6;

/// Errors from account operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("an account already exists for this email")]
    EmailInUse,
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidInput(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(sqlx::FromRow)]
struct UserRow {
    uid: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            uid: row.uid,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers a new account. Emails are compared case-insensitively.
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(UserError::InvalidInput(
                "email address is badly formatted".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(UserError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let uid = Uuid::new_v4().to_string();
        let hash = hash_password(password)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (uid, email, first_name, last_name, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&uid)
        .bind(&email)
        .bind(first_name.trim())
        .bind(last_name.trim())
        .bind(&hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(User {
                uid,
                email,
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
            }),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(UserError::EmailInUse),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks a password. Unknown emails and wrong passwords are
    /// indistinguishable to the caller.
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, UserError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) if verify_password(password, &row.password_hash)? => Ok(row.into()),
            _ => Err(UserError::InvalidCredentials),
        }
    }

    /// Issues a new session token for the user.
    pub async fn create_session(&self, uid: &str) -> Result<String, sqlx::Error> {
        let token = random_token(32);
        sqlx::query("INSERT INTO sessions (token, uid, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(uid)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(token)
    }

    /// Resolves a session token to its user.
    pub async fn user_for_token(&self, token: &str) -> Result<Option<User>, sqlx::Error> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT users.* FROM sessions JOIN users ON users.uid = sessions.uid WHERE sessions.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    /// Ends a session. Returns false when the token was unknown.
    pub async fn delete_session(&self, token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, UserError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Random bytes encoded as base64url (no padding).
fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill(bytes.as_mut_slice());
    URL_SAFE_NO_PAD.encode(bytes)
}
