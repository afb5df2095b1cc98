pub mod hashing;
pub mod jwt;
pub mod mailer;
pub mod metrics;
pub mod otp;
pub mod password_reset;
pub mod rate_limit;
pub mod reservation;
pub mod security;
