//! RFC 6238 time-based one-time passwords (HMAC-SHA1, 30s step, 6 digits),
//! compatible with standard authenticator apps.

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// TOTP time step in seconds.
pub const TOTP_STEP_SECS: u64 = 30;

/// Accepted clock skew, in steps, on either side of now.
pub const TOTP_SKEW_STEPS: u64 = 1;

const DIGITS: u32 = 1_000_000;

/// RFC 4226 HOTP value for a counter, truncated to 6 digits.
fn hotp(secret: &[u8], counter: u64) -> u32 {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let bin = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    bin % DIGITS
}

/// The 6-digit code for a secret at a given unix time.
pub fn totp_at(secret: &[u8], unix_secs: u64) -> String {
    format!("{:06}", hotp(secret, unix_secs / TOTP_STEP_SECS))
}

/// Check a submitted code against the secret, allowing ±1 step of skew.
pub fn verify_totp(secret: &[u8], code: &str, unix_secs: u64) -> bool {
    if !is_six_digits(code) {
        return false;
    }
    let step = unix_secs / TOTP_STEP_SECS;
    (step.saturating_sub(TOTP_SKEW_STEPS)..=step + TOTP_SKEW_STEPS)
        .any(|s| format!("{:06}", hotp(secret, s)) == code)
}

/// `^\d{6}$` without pulling in a regex engine.
pub fn is_six_digits(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// RFC 4648 base32 (no padding), the encoding authenticator apps expect.
pub fn base32_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
    let mut out = String::with_capacity(data.len().div_ceil(5) * 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for &byte in data {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 31) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 31) as usize] as char);
    }
    out
}

/// Provisioning URI for authenticator apps.
pub fn otpauth_uri(issuer: &str, account: &str, secret: &[u8]) -> String {
    format!(
        "otpauth://totp/{issuer}:{account}?secret={}&issuer={issuer}&digits=6&period={TOTP_STEP_SECS}",
        base32_encode(secret)
    )
}
