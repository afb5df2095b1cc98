use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::DbPool;
use crate::modules::auth::interface::{
    AuthError, PasswordResetRepository, Result, UserRepository,
};
use crate::modules::auth::model::{PasswordReset, User};
use crate::services::otp::OTP_MAX_ATTEMPTS;

// =============================================================================
// USERS
// =============================================================================

pub struct UserCrud {
    pool: DbPool,
}

impl UserCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for UserCrud {
    async fn create(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role,
                               phone, address, date_of_birth, is_active, last_login,
                               created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.date_of_birth)
        .bind(user.is_active)
        .bind(user.last_login)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::EmailAlreadyExists)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_profile(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = ?, last_name = ?, phone = ?, address = ?,
                date_of_birth = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.date_of_birth)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_last_login(&self, user_id: &str, at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(at)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// =============================================================================
// PASSWORD RESETS
// =============================================================================

pub struct PasswordResetCrud {
    pool: DbPool,
}

impl PasswordResetCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasswordResetRepository for PasswordResetCrud {
    async fn create(&self, reset: &PasswordReset) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO password_resets (id, email, otp, expires_at, is_used, attempts, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reset.id)
        .bind(&reset.email)
        .bind(&reset.otp)
        .bind(reset.expires_at)
        .bind(reset.is_used)
        .bind(reset.attempts)
        .bind(reset.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<PasswordReset>> {
        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            SELECT * FROM password_resets
            WHERE email = ? AND is_used = FALSE AND expires_at > ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(reset)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PasswordReset>> {
        let reset = sqlx::query_as::<_, PasswordReset>("SELECT * FROM password_resets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reset)
    }

    async fn register_failed_attempt(&self, id: &str) -> Result<i32> {
        // is_used is computed from the pre-increment value so the flip and
        // the bump land in one statement.
        sqlx::query(
            r#"
            UPDATE password_resets
            SET is_used = IF(attempts + 1 >= ?, TRUE, is_used),
                attempts = attempts + 1
            WHERE id = ? AND is_used = FALSE
            "#,
        )
        .bind(OTP_MAX_ATTEMPTS)
        .bind(id)
        .execute(&self.pool)
        .await?;

        let attempts: Option<i32> =
            sqlx::query_scalar("SELECT attempts FROM password_resets WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        // A vanished record reads as exhausted; the flow rejects either way.
        Ok(attempts.unwrap_or(OTP_MAX_ATTEMPTS))
    }

    async fn mark_used(&self, id: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE password_resets SET is_used = TRUE WHERE id = ? AND is_used = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn consume(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM password_resets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_for_email(&self, email: &str) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM password_resets WHERE email = ? AND (is_used = FALSE OR expires_at < ?)",
        )
        .bind(email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
