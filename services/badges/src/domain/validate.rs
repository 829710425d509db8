//! Badge request field validation.

/// 1-50 characters after trimming.
pub fn validate_badge_name(name: &str) -> bool {
    let len = name.trim().chars().count();
    (1..=50).contains(&len)
}

/// `#rrggbb`, lowercase or uppercase hex.
pub fn validate_badge_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}
