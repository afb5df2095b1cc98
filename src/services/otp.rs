use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Codes are numeric-only so they survive voice readout and SMS relays.
pub const OTP_LENGTH: usize = 6;
pub const OTP_TTL_MINUTES: i64 = 3;
pub const OTP_MAX_ATTEMPTS: i32 = 3;

/// Uniformly random 6-digit code, zero-padded ("004217" is valid).
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    let code: u32 = rng.random_range(0..1_000_000);
    format!("{:06}", code)
}

pub fn otp_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(OTP_TTL_MINUTES)
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
