use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claim values that scope a token to the password-reset flow. A reset
/// credential presented with the wrong purpose or type is rejected even
/// when the signature is valid.
pub const PASSWORD_RESET_PURPOSE: &str = "password_reset";
pub const RESET_TOKEN_TYPE: &str = "reset";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // user id
    pub email: String,
    pub exp: i64,           // expiration time
    pub iat: i64,           // issued at
    pub jti: String,        // unique token id
}

/// Claims for the short-lived credential issued after a successful OTP
/// verification. `jti` carries the password-reset record id so the
/// credential can be consumed exactly once.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: String,        // account email
    pub purpose: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,        // password-reset record id
}

#[derive(Clone)]
pub struct JwtService {
    secret: String,
    access_token_duration: Duration,
    reset_token_duration: Duration,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            access_token_duration: Duration::days(7),
            reset_token_duration: Duration::minutes(10),
        }
    }

    pub fn create_access_token(&self, user_id: &str, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + self.access_token_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn create_reset_token(&self, email: &str, reset_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + self.reset_token_duration;

        let claims = ResetClaims {
            sub: email.to_string(),
            purpose: PASSWORD_RESET_PURPOSE.to_string(),
            token_type: RESET_TOKEN_TYPE.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: reset_id.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn verify_access_token(&self, token: &str) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
    }

    /// Verifies signature and expiry, then checks the purpose and type
    /// claims so an access token can never stand in for a reset credential.
    pub fn verify_reset_token(&self, token: &str) -> Result<ResetClaims, jsonwebtoken::errors::Error> {
        let data = decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        if data.claims.purpose != PASSWORD_RESET_PURPOSE
            || data.claims.token_type != RESET_TOKEN_TYPE
        {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }

        Ok(data.claims)
    }

    pub fn get_access_token_duration_secs(&self) -> i64 {
        self.access_token_duration.num_seconds()
    }

    pub fn get_reset_token_duration_secs(&self) -> i64 {
        self.reset_token_duration.num_seconds()
    }
}
