//! Password policy checks.

/// A new password must be at least 8 characters long and contain at least
/// one digit, one lowercase letter, and one uppercase letter.
#[must_use]
pub fn satisfies_policy(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
}
