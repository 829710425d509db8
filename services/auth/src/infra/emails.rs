//! Email templates for verification codes.

use uservault_mailer::EmailMessage;

use crate::domain::types::CodePurpose;

/// Render the email for a verification code. `public_origin` is the
/// user-facing site (for the reset deep link).
pub fn render_code_email(
    to: &str,
    purpose: CodePurpose,
    code: &str,
    public_origin: &str,
) -> EmailMessage {
    let (subject, html) = match purpose {
        CodePurpose::Signup => (
            "Confirm your email".to_owned(),
            format!(
                "<p>Your confirmation code is <strong>{code}</strong>.</p>\
                 <p>It expires in 15 minutes. If you didn't sign up, ignore this email.</p>"
            ),
        ),
        CodePurpose::PasswordReset => (
            "Reset your password".to_owned(),
            format!(
                "<p>Your password reset code is <strong>{code}</strong>.</p>\
                 <p><a href=\"{public_origin}/reset-password?email={to}&code={code}\">\
                 Reset your password</a> (link valid for 1 hour).</p>\
                 <p>If you didn't request this, ignore this email.</p>"
            ),
        ),
        CodePurpose::MfaEmail => (
            "Your login code".to_owned(),
            format!(
                "<p>Your one-time login code is <strong>{code}</strong>.</p>\
                 <p>It expires in 10 minutes. If this wasn't you, change your password.</p>"
            ),
        ),
        CodePurpose::AccountDeletion => (
            "Confirm account deletion".to_owned(),
            format!(
                "<p>Your account deletion code is <strong>{code}</strong>.</p>\
                 <p>It expires in 15 minutes. Deletion is permanent.</p>"
            ),
        ),
    };

    EmailMessage {
        to: to.to_owned(),
        subject,
        html,
    }
}
