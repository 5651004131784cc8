use askama::Template;

pub const VERIFICATION_EMAIL_SUBJECT: &str = "Your verification code";
pub const PASSWORD_RESET_EMAIL_SUBJECT: &str = "Reset your password";

/// One-time passcode email, rendered to HTML for delivery.
#[derive(Template)]
#[template(path = "verification_email.html")]
pub struct VerificationEmail<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub ttl_minutes: i64,
}

/// Password-reset email carrying the plaintext reset token.
#[derive(Template)]
#[template(path = "password_reset_email.html")]
pub struct PasswordResetEmail<'a> {
    pub name: &'a str,
    pub token: &'a str,
    pub ttl_minutes: i64,
}
