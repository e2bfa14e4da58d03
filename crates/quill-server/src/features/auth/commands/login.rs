//! Login command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::password::verify_password;
use crate::auth::token::{TokenCodec, TokenError};

/// Command to log in with a username and password
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Response from a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Errors that can occur when logging in
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Unknown username and wrong password are deliberately the same error
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Failed to issue token")]
    Token(#[from] TokenError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Verify credentials and issue a bearer token
#[tracing::instrument(skip(pool, codec, command), fields(username = %command.username))]
pub async fn handle(
    pool: PgPool,
    codec: &TokenCodec,
    command: LoginCommand,
) -> Result<LoginResponse, LoginError> {
    let row = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, password_hash FROM users WHERE username = $1",
    )
    .bind(&command.username)
    .fetch_optional(&pool)
    .await?
    .ok_or(LoginError::InvalidCredentials)?;

    let (user_id, password_hash) = row;

    if !verify_password(&command.password, &password_hash) {
        return Err(LoginError::InvalidCredentials);
    }

    let token = codec.issue(user_id)?;

    tracing::info!(user_id, "User logged in");

    Ok(LoginResponse { token })
}
