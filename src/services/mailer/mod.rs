pub mod http;
pub mod template;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpMailer;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Template error: {0}")]
    Template(String),
}

/// A rendered-to-be email: template name plus the variables it needs.
/// Rendering happens at dispatch time so test doubles can capture the
/// variables (the OTP code in particular) without parsing HTML.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub vars: HashMap<String, String>,
}

impl OutboundEmail {
    fn new(to: &str, subject: &str, template: &str, vars: HashMap<String, String>) -> Self {
        Self {
            to: to.to_string(),
            subject: subject.to_string(),
            template: template.to_string(),
            vars,
        }
    }

    pub fn password_reset_otp(to: &str, name: &str, otp: &str, expiry_minutes: i64) -> Self {
        let vars = HashMap::from([
            ("name".to_string(), name.to_string()),
            ("otp".to_string(), otp.to_string()),
            ("expiry_minutes".to_string(), expiry_minutes.to_string()),
        ]);
        Self::new(
            to,
            "Password Reset Code - Travel Booking",
            template::PASSWORD_RESET_OTP,
            vars,
        )
    }

    pub fn password_changed(to: &str, name: &str) -> Self {
        let vars = HashMap::from([("name".to_string(), name.to_string())]);
        Self::new(
            to,
            "Password Changed - Travel Booking",
            template::PASSWORD_CHANGED,
            vars,
        )
    }

    pub fn welcome(to: &str, name: &str, login_url: &str) -> Self {
        let vars = HashMap::from([
            ("name".to_string(), name.to_string()),
            ("login_url".to_string(), login_url.to_string()),
        ]);
        Self::new(to, "Welcome to Travel Booking", template::WELCOME, vars)
    }

    pub fn booking_confirmation(
        to: &str,
        name: &str,
        booking_reference: &str,
        booking_type: &str,
        final_amount: &str,
        currency: &str,
    ) -> Self {
        let vars = HashMap::from([
            ("name".to_string(), name.to_string()),
            ("booking_reference".to_string(), booking_reference.to_string()),
            ("booking_type".to_string(), booking_type.to_string()),
            ("final_amount".to_string(), final_amount.to_string()),
            ("currency".to_string(), currency.to_string()),
        ]);
        Self::new(
            to,
            "Booking Confirmation - Travel Booking",
            template::BOOKING_CONFIRMATION,
            vars,
        )
    }

    pub fn booking_cancellation(
        to: &str,
        name: &str,
        booking_reference: &str,
        reason: &str,
    ) -> Self {
        let vars = HashMap::from([
            ("name".to_string(), name.to_string()),
            ("booking_reference".to_string(), booking_reference.to_string()),
            ("reason".to_string(), reason.to_string()),
        ]);
        Self::new(
            to,
            "Booking Cancellation - Travel Booking",
            template::BOOKING_CANCELLATION,
            vars,
        )
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailerError>;
}
