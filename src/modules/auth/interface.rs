use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{PasswordReset, User};

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

pub type Result<T> = std::result::Result<T, AuthError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with EmailAlreadyExists when the email is taken.
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_profile(&self, user: &User) -> Result<()>;
    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<()>;
    async fn set_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<()>;
}

#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    async fn create(&self, reset: &PasswordReset) -> Result<()>;

    /// Latest unused, unexpired record for the email, if any.
    async fn find_active_by_email(&self, email: &str) -> Result<Option<PasswordReset>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PasswordReset>>;

    /// Serialized per row: bumps the attempt counter, flipping `is_used` in
    /// the same step when the budget is exhausted. Returns the new count.
    async fn register_failed_attempt(&self, id: &str) -> Result<i32>;

    /// Marks the record used, guarded on it being unused; false means a
    /// concurrent verify got there first.
    async fn mark_used(&self, id: &str) -> Result<bool>;

    /// Deletes the record, guarded on existence; the single-use gate for
    /// reset credentials. False means it was already consumed.
    async fn consume(&self, id: &str) -> Result<bool>;

    /// Clears unused records and expired leftovers for the email so at most
    /// one active code exists per account.
    async fn purge_for_email(&self, email: &str) -> Result<u64>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid or expired OTP")]
    InvalidOrExpiredOtp,

    #[error("Invalid OTP")]
    OtpMismatch { attempts_remaining: i32 },

    #[error("Too many failed attempts, request a new code")]
    TooManyAttempts,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("New password must be different from the current password")]
    SamePassword,

    #[error("Missing or invalid authorization token")]
    Unauthorized,

    #[error("Email dispatch failed: {0}")]
    EmailDispatch(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),
}

impl AuthError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AccountDeactivated => StatusCode::UNAUTHORIZED,
            Self::EmailAlreadyExists => StatusCode::CONFLICT,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::InvalidOrExpiredOtp => StatusCode::BAD_REQUEST,
            Self::OtpMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::TooManyAttempts => StatusCode::BAD_REQUEST,
            Self::InvalidResetToken => StatusCode::BAD_REQUEST,
            Self::SamePassword => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::EmailDispatch(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
