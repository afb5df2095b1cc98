use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::MailerError;

pub const PASSWORD_RESET_OTP: &str = "password_reset_otp";
pub const PASSWORD_CHANGED: &str = "password_changed";
pub const WELCOME: &str = "welcome";
pub const BOOKING_CONFIRMATION: &str = "booking_confirmation";
pub const BOOKING_CANCELLATION: &str = "booking_cancellation";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

const PASSWORD_RESET_OTP_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Password Reset Request</h2>
  <p>Hello {{name}},</p>
  <p>We received a request to reset your password. Use the code below to continue:</p>
  <p style="font-size: 28px; letter-spacing: 6px; font-weight: bold;">{{otp}}</p>
  <p>The code expires in {{expiry_minutes}} minutes. If you did not request a
  reset, you can ignore this email.</p>
  <p>Travel Booking Support<br>support@travelbooking.com</p>
</body>
</html>"#;

const PASSWORD_CHANGED_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Your password was changed</h2>
  <p>Hello {{name}},</p>
  <p>This is a confirmation that the password for your Travel Booking account
  was just changed. If this was not you, contact support immediately.</p>
  <p>Travel Booking Support<br>support@travelbooking.com</p>
</body>
</html>"#;

const WELCOME_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Welcome to Travel Booking!</h2>
  <p>Hello {{name}},</p>
  <p>Your account has been created. Sign in any time at
  <a href="{{login_url}}">{{login_url}}</a> to plan your next trip.</p>
  <p>Travel Booking Support<br>support@travelbooking.com</p>
</body>
</html>"#;

const BOOKING_CONFIRMATION_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Booking Confirmed</h2>
  <p>Hello {{name}},</p>
  <p>Your {{booking_type}} booking is confirmed.</p>
  <table cellpadding="4">
    <tr><td>Reference</td><td><strong>{{booking_reference}}</strong></td></tr>
    <tr><td>Total</td><td>{{final_amount}} {{currency}}</td></tr>
  </table>
  <p>Keep the reference handy for any changes or questions.</p>
  <p>Travel Booking Support<br>support@travelbooking.com</p>
</body>
</html>"#;

const BOOKING_CANCELLATION_HTML: &str = r#"<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Booking Cancelled</h2>
  <p>Hello {{name}},</p>
  <p>Your booking <strong>{{booking_reference}}</strong> has been cancelled.</p>
  <p>Reason: {{reason}}</p>
  <p>Travel Booking Support<br>support@travelbooking.com</p>
</body>
</html>"#;

fn template_body(name: &str) -> Option<&'static str> {
    match name {
        PASSWORD_RESET_OTP => Some(PASSWORD_RESET_OTP_HTML),
        PASSWORD_CHANGED => Some(PASSWORD_CHANGED_HTML),
        WELCOME => Some(WELCOME_HTML),
        BOOKING_CONFIRMATION => Some(BOOKING_CONFIRMATION_HTML),
        BOOKING_CANCELLATION => Some(BOOKING_CANCELLATION_HTML),
        _ => None,
    }
}

/// Substitutes `{{var}}` placeholders. A placeholder left unfilled after
/// substitution means the caller built the variable map wrong, so it is an
/// error rather than mail with literal braces in it.
pub fn render(template: &str, vars: &HashMap<String, String>) -> Result<String, MailerError> {
    let body = template_body(template)
        .ok_or_else(|| MailerError::Template(format!("Unknown template '{}'", template)))?;

    let mut rendered = body.to_string();
    for (key, value) in vars {
        rendered = rendered.replace(&format!("{{{{{}}}}}", key), value);
    }

    if let Some(leftover) = PLACEHOLDER_RE.find(&rendered) {
        return Err(MailerError::Template(format!(
            "Missing variable {} for template '{}'",
            leftover.as_str(),
            template
        )));
    }

    Ok(rendered)
}
