//! HMAC verification for moderation-bot webhooks.
//!
//! The bot signs `"{timestamp}.{raw_body}"` with HMAC-SHA256 and sends the
//! hex digest in `x-signature` plus the unix timestamp in `x-timestamp`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::BadgesServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Accepted clock skew between bot and server, in seconds.
pub const TIMESTAMP_WINDOW_SECS: i64 = 300;

/// Verify a signed webhook request. Timestamp freshness is checked before
/// the signature so an expired request is rejected even when correctly
/// signed (replay window).
pub fn verify_webhook(
    secret: &str,
    body: &[u8],
    signature_hex: Option<&str>,
    timestamp: Option<&str>,
    now_unix: i64,
) -> Result<(), BadgesServiceError> {
    let (signature_hex, timestamp) = match (signature_hex, timestamp) {
        (Some(s), Some(t)) => (s, t),
        _ => return Err(BadgesServiceError::MissingSignature),
    };

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| BadgesServiceError::InvalidSignature)?;
    if (now_unix - ts).abs() > TIMESTAMP_WINDOW_SECS {
        return Err(BadgesServiceError::StaleTimestamp);
    }

    let signature = hex::decode(signature_hex).map_err(|_| BadgesServiceError::InvalidSignature)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);
    // Constant-time compare.
    mac.verify_slice(&signature)
        .map_err(|_| BadgesServiceError::InvalidSignature)
}

/// Sign a body the way the bot does. Used by tests and by the bot SDK.
pub fn sign_webhook(secret: &str, body: &[u8], timestamp: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
