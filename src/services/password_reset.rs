use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::modules::auth::interface::{
    AuthError, PasswordResetRepository, Result, UserRepository,
};
use crate::modules::auth::model::PasswordReset;
use crate::services::hashing;
use crate::services::jwt::JwtService;
use crate::services::mailer::{Mailer, OutboundEmail};
use crate::services::otp;

/// OTP password-reset state machine: request issues a fresh single active
/// code per email, verify burns attempts and turns a matching code into a
/// short-lived reset credential, reset consumes that credential exactly
/// once. Unknown emails get the same success response as known ones.
pub struct PasswordResetFlow<'a> {
    users: Arc<dyn UserRepository>,
    resets: Arc<dyn PasswordResetRepository>,
    mailer: Arc<dyn Mailer>,
    jwt_service: &'a JwtService,
}

impl<'a> PasswordResetFlow<'a> {
    pub fn new(
        users: Arc<dyn UserRepository>,
        resets: Arc<dyn PasswordResetRepository>,
        mailer: Arc<dyn Mailer>,
        jwt_service: &'a JwtService,
    ) -> Self {
        Self {
            users,
            resets,
            mailer,
            jwt_service,
        }
    }

    /// Ok(()) for unknown emails too; only a failed dispatch for a known
    /// account surfaces, as EmailDispatch.
    pub async fn request_otp(&self, email: &str) -> Result<()> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("password reset requested for unknown account");
            return Ok(());
        };

        // One active code per email: clear unused records and expired
        // leftovers before inserting the replacement.
        self.resets.purge_for_email(&user.email).await?;

        let now = Utc::now();
        let reset = PasswordReset {
            id: Uuid::new_v4().to_string(),
            email: user.email.clone(),
            otp: otp::generate_otp(),
            expires_at: otp::otp_expiry(now),
            is_used: false,
            attempts: 0,
            created_at: now,
        };
        self.resets.create(&reset).await?;

        let message = OutboundEmail::password_reset_otp(
            &user.email,
            &user.first_name,
            &reset.otp,
            otp::OTP_TTL_MINUTES,
        );
        self.mailer
            .send(message)
            .await
            .map_err(|e| AuthError::EmailDispatch(e.to_string()))?;

        tracing::info!(user_id = %user.id, "password reset OTP issued");
        Ok(())
    }

    pub async fn resend_otp(&self, email: &str) -> Result<()> {
        self.request_otp(email).await
    }

    /// A matching code within budget yields the reset credential. Mismatches
    /// burn an attempt; the third one kills the record, and from then on the
    /// email has no active record so the uniform invalid-or-expired answer
    /// applies.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<String> {
        let record = self
            .resets
            .find_active_by_email(email)
            .await?
            .ok_or(AuthError::InvalidOrExpiredOtp)?;

        if record.attempts >= otp::OTP_MAX_ATTEMPTS {
            return Err(AuthError::TooManyAttempts);
        }

        if record.otp != code {
            let attempts = self.resets.register_failed_attempt(&record.id).await?;
            if attempts >= otp::OTP_MAX_ATTEMPTS {
                tracing::info!(reset_id = %record.id, "OTP attempt budget exhausted");
                return Err(AuthError::TooManyAttempts);
            }
            return Err(AuthError::OtpMismatch {
                attempts_remaining: otp::OTP_MAX_ATTEMPTS - attempts,
            });
        }

        // Only the request that flips is_used wins the credential; a racing
        // duplicate falls through to the uniform rejection.
        if !self.resets.mark_used(&record.id).await? {
            return Err(AuthError::InvalidOrExpiredOtp);
        }

        let token = self
            .jwt_service
            .create_reset_token(email, &record.id)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        tracing::info!(reset_id = %record.id, "OTP verified, reset credential issued");
        Ok(token)
    }

    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<()> {
        let claims = self
            .jwt_service
            .verify_reset_token(reset_token)
            .map_err(|_| AuthError::InvalidResetToken)?;

        let record = self
            .resets
            .find_by_id(&claims.jti)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        // The record must be the one this credential was minted from and
        // must have passed verification.
        if !record.is_used || record.email != claims.sub {
            return Err(AuthError::InvalidResetToken);
        }

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let same = hashing::verify_password(new_password, &user.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if same {
            return Err(AuthError::SamePassword);
        }

        // Consume before rewriting the hash so a replayed credential can
        // never observe a success.
        if !self.resets.consume(&record.id).await? {
            return Err(AuthError::InvalidResetToken);
        }

        let password_hash = hashing::hash_password(new_password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        self.users.update_password(&user.id, &password_hash).await?;

        tracing::info!(user_id = %user.id, "password reset completed");

        let notice = OutboundEmail::password_changed(&user.email, &user.first_name);
        if let Err(err) = self.mailer.send(notice).await {
            tracing::warn!(user_id = %user.id, "password-changed email failed: {}", err);
        }

        Ok(())
    }
}
