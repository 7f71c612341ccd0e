//! Email-verification challenge — cooldown timing and code acceptance.

pub mod challenge;
pub mod state;

pub use challenge::{CodeDecision, VerificationChallenge, spawn_cooldown_ticker};
pub use state::{ChallengePhase, VerificationState};
