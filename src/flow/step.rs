//! Onboarding step machine — tracks which step the user is on.

use serde::{Deserialize, Serialize};

/// The steps of the onboarding sequence.
///
/// Progresses strictly linearly: Role → Account → Verification → Complete.
/// Skipping or reordering steps is never permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Role,
    Account,
    Verification,
    Complete,
}

impl Step {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: Step) -> bool {
        use Step::*;
        matches!(
            (self, target),
            (Role, Account) | (Account, Verification) | (Verification, Complete)
        )
    }

    /// Whether this step is terminal (the workflow is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<Step> {
        use Step::*;
        match self {
            Role => Some(Account),
            Account => Some(Verification),
            Verification => Some(Complete),
            Complete => None,
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Role
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Role => "role",
            Self::Account => "account",
            Self::Verification => "verification",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}
