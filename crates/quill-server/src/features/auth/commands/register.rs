//! Register command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::password::{hash_password, PasswordError};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Command to register a new user
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response from registering a user
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
}

/// Errors that can occur when registering
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Username is required and cannot be empty")]
    UsernameRequired,
    #[error("Email is required and cannot be empty")]
    EmailRequired,
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,
    #[error("Username or email already taken")]
    AlreadyTaken,
    #[error("Failed to hash password")]
    Hash(#[from] PasswordError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RegisterCommand {
    pub fn validate(&self) -> Result<(), RegisterError> {
        if self.username.trim().is_empty() {
            return Err(RegisterError::UsernameRequired);
        }
        if self.email.trim().is_empty() {
            return Err(RegisterError::EmailRequired);
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(RegisterError::PasswordTooShort);
        }
        Ok(())
    }
}

/// Create a user with a hashed password
#[tracing::instrument(skip(pool, command), fields(username = %command.username))]
pub async fn handle(
    pool: PgPool,
    command: RegisterCommand,
) -> Result<RegisterResponse, RegisterError> {
    command.validate()?;

    let password_hash = hash_password(&command.password)?;

    let result = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&command.username)
    .bind(&command.email)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await;

    let id = match result {
        Ok(id) => id,
        Err(sqlx::Error::Database(err)) if err.code().as_deref() == Some("23505") => {
            return Err(RegisterError::AlreadyTaken);
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(user_id = id, "User registered");

    Ok(RegisterResponse {
        id,
        username: command.username,
    })
}
