//! Password strength scoring — pure criteria counting.
//!
//! The score is the single source of truth; the label and color class are
//! derived from it and never stored independently. Strength is advisory:
//! a weak password never blocks a step on its own.

use serde::Serialize;

/// Number of scored criteria (and therefore the maximum score).
pub const MAX_SCORE: u8 = 5;

/// Count the satisfied complexity criteria for a candidate password.
///
/// One point each for: length ≥ 8, a lowercase letter, an uppercase
/// letter, a digit, and a symbol.
pub fn score(password: &str) -> u8 {
    let mut score = 0;
    if password.chars().count() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
    {
        score += 1;
    }
    score
}

/// Derived strength value shown next to the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: &'static str,
    pub color_class: &'static str,
}

impl PasswordStrength {
    /// Score a password and derive the display label and color class.
    pub fn from_password(password: &str) -> Self {
        let score = score(password);
        let (label, color_class) = match score {
            0 | 1 => ("Weak", "strength-weak"),
            2 | 3 => ("Medium", "strength-medium"),
            4 => ("Good", "strength-good"),
            _ => ("Strong", "strength-strong"),
        };
        Self {
            score,
            label,
            color_class,
        }
    }
}
