//! Verification challenge state.

use serde::{Deserialize, Serialize};

/// Phase of the verification challenge.
///
/// `Idle → Sent → Verifying → Accepted`; a rejected code drops back from
/// `Verifying` to `Sent` with an inline error, so rejection is an outcome,
/// not a resting phase. Resends re-enter `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengePhase {
    Idle,
    Sent,
    Verifying,
    Accepted,
}

impl Default for ChallengePhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for ChallengePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Sent => "sent",
            Self::Verifying => "verifying",
            Self::Accepted => "accepted",
        };
        write!(f, "{s}")
    }
}

/// Observable state of the verification step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationState {
    /// Current challenge phase.
    pub phase: ChallengePhase,
    /// The code input as typed so far (digits only, length-capped).
    pub code_input: String,
    /// Seconds until a resend becomes permitted.
    pub cooldown_remaining: u64,
    /// Whether a code has been dispatched at least once.
    pub sent: bool,
    /// Whether a verification attempt is currently outstanding.
    pub verifying: bool,
    /// Inline message from the last rejected attempt, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
