//! Password policy and PBKDF2-HMAC-SHA256 hashing.
//!
//! Stored format: `pbkdf2:sha256:iterations$salt$hash` with URL-safe
//! unpadded base64 for salt and hash.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::RngExt;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Symbols accepted by the signup password policy.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Minimum length for signup passwords.
pub const SIGNUP_PASSWORD_MIN_LEN: usize = 8;

/// Minimum length accepted at login and password reset. Weaker than the
/// signup rule; preserved as-is from the original product.
pub const LOGIN_PASSWORD_MIN_LEN: usize = 6;

/// Validate a new password against the signup policy. Returns the first
/// violated requirement, suitable for direct display.
pub fn check_signup_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < SIGNUP_PASSWORD_MIN_LEN {
        return Err("password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("password must contain a digit");
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err("password must contain a symbol");
    }
    Ok(())
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);

    let mut key = [0u8; KEY_LEN];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, ITERATIONS, &mut key)
        .map_err(|e| anyhow::anyhow!("pbkdf2: {e}"))?;

    Ok(format!(
        "pbkdf2:sha256:{}${}${}",
        ITERATIONS,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(key)
    ))
}

/// Verify a password against a stored hash. A malformed stored hash is an
/// error; a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, stored: &str) -> anyhow::Result<bool> {
    let mut parts = stored.split('$');
    let header = parts.next().unwrap_or_default();
    let (salt_b64, hash_b64) = match (parts.next(), parts.next(), parts.next()) {
        (Some(salt), Some(hash), None) => (salt, hash),
        _ => anyhow::bail!("malformed password hash"),
    };

    let iterations = header
        .strip_prefix("pbkdf2:sha256:")
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| anyhow::anyhow!("malformed password hash header"))?;

    let salt = URL_SAFE_NO_PAD.decode(salt_b64)?;
    let expected = URL_SAFE_NO_PAD.decode(hash_b64)?;

    let mut computed = vec![0u8; expected.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| anyhow::anyhow!("pbkdf2: {e}"))?;

    Ok(computed == expected)
}
