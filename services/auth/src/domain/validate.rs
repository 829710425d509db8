//! Email and username normalization and validation.

/// Lowercase and trim an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Minimal structural check: one `@`, non-empty local part, domain with a
/// dot. Deliverability is proven by the verification code, not the syntax.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((head, tail)) = domain.rsplit_once('.') else {
        return false;
    };
    !head.is_empty() && !tail.is_empty()
}

/// Lowercase and trim a username.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_ascii_lowercase()
}

/// 1-20 chars of `[a-z0-9_]` after normalization.
pub fn validate_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 20
        && username
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}
