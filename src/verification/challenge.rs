//! Verification challenge — resend cooldown and code acceptance policy.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::collaborators::CodeDispatcher;
use crate::config::FlowConfig;
use crate::flow::events::FlowEvent;

use super::state::{ChallengePhase, VerificationState};

/// Outcome of a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeDecision {
    Accepted,
    Rejected,
}

/// Owns the verification step: cooldown timing, code input, and the
/// accept/reject decision. All mutation goes through `&self` methods over
/// the locked state; rejection never costs the user an attempt.
pub struct VerificationChallenge {
    state: RwLock<VerificationState>,
    recipient: RwLock<String>,
    dispatcher: Arc<dyn CodeDispatcher>,
    tx: broadcast::Sender<FlowEvent>,
    cooldown_secs: u64,
    code_length: usize,
    bypass_token: String,
    verify_delay_ms: u64,
}

impl VerificationChallenge {
    pub fn new(
        config: &FlowConfig,
        dispatcher: Arc<dyn CodeDispatcher>,
        tx: broadcast::Sender<FlowEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(VerificationState::default()),
            recipient: RwLock::new(String::new()),
            dispatcher,
            tx,
            cooldown_secs: config.cooldown_secs,
            code_length: config.code_length,
            bypass_token: config.bypass_token.clone(),
            verify_delay_ms: config.verify_delay_ms,
        })
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> VerificationState {
        self.state.read().await.clone()
    }

    /// Enter the verification step: dispatch the first code and arm the
    /// cooldown. No-op if the challenge already started.
    pub async fn start(&self, recipient: &str) {
        {
            let mut state = self.state.write().await;
            if state.phase != ChallengePhase::Idle {
                warn!(phase = %state.phase, "Challenge already started");
                return;
            }
            state.phase = ChallengePhase::Sent;
            state.sent = true;
            state.cooldown_remaining = self.cooldown_secs;
        }
        *self.recipient.write().await = recipient.to_string();

        info!(recipient = %recipient, "Verification challenge started");
        self.dispatch(recipient.to_string(), false);
    }

    /// One elapsed second of cooldown. Saturates at zero; at zero the
    /// resend action becomes permitted.
    pub async fn tick(&self) {
        let remaining = {
            let mut state = self.state.write().await;
            if state.cooldown_remaining == 0 {
                return;
            }
            state.cooldown_remaining -= 1;
            state.cooldown_remaining
        };
        let _ = self.tx.send(FlowEvent::CooldownTick { remaining });
    }

    /// Re-dispatch a code. Permitted only once the cooldown has elapsed;
    /// clears the code input and re-arms the cooldown.
    pub async fn resend(&self) -> bool {
        {
            let mut state = self.state.write().await;
            if state.phase != ChallengePhase::Sent {
                warn!(phase = %state.phase, "Cannot resend outside Sent");
                return false;
            }
            if state.cooldown_remaining > 0 {
                debug!(
                    remaining = state.cooldown_remaining,
                    "Resend requested during cooldown"
                );
                return false;
            }
            state.code_input.clear();
            state.error = None;
            state.cooldown_remaining = self.cooldown_secs;
        }

        let recipient = self.recipient.read().await.clone();
        info!(recipient = %recipient, "Verification code resent");
        self.dispatch(recipient, true);
        true
    }

    /// Record code-input edits: digits only, capped at the code length.
    /// Editing clears any inline rejection message.
    pub async fn set_code_input(&self, raw: &str) {
        let mut state = self.state.write().await;
        state.code_input = raw
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(self.code_length)
            .collect();
        state.error = None;
    }

    /// Decide a submitted code.
    ///
    /// Returns `None` when the action is not invokable: blank code, wrong
    /// phase, or an attempt already outstanding (re-entry gate). Rejection
    /// drops back to `Sent` with an inline message and no penalty.
    pub async fn verify(&self, code: &str) -> Option<CodeDecision> {
        let trimmed = code.trim().to_string();
        if trimmed.is_empty() {
            debug!("Ignoring verify with blank code");
            return None;
        }

        {
            let mut state = self.state.write().await;
            if state.phase != ChallengePhase::Sent {
                warn!(phase = %state.phase, "Cannot verify outside Sent");
                return None;
            }
            if state.verifying {
                debug!("Verify already in flight, ignoring");
                return None;
            }
            state.phase = ChallengePhase::Verifying;
            state.verifying = true;
            state.error = None;
        }

        // Simulated out-of-band check latency.
        if self.verify_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.verify_delay_ms)).await;
        }

        let accepted = trimmed.chars().count() >= self.code_length || trimmed == self.bypass_token;

        let mut state = self.state.write().await;
        state.verifying = false;
        if accepted {
            state.phase = ChallengePhase::Accepted;
            info!("Verification code accepted");
            Some(CodeDecision::Accepted)
        } else {
            state.phase = ChallengePhase::Sent;
            let message = "Invalid verification code, please try again".to_string();
            state.error = Some(message.clone());
            drop(state);
            info!("Verification code rejected");
            let _ = self.tx.send(FlowEvent::VerifyRejected { message });
            Some(CodeDecision::Rejected)
        }
    }

    /// Drop back from `Accepted` to `Sent` so the user can retry after a
    /// failed account-creation handoff.
    pub(crate) async fn reopen(&self) {
        let mut state = self.state.write().await;
        if state.phase == ChallengePhase::Accepted {
            state.phase = ChallengePhase::Sent;
        } else {
            warn!(phase = %state.phase, "Reopen outside Accepted ignored");
        }
    }

    /// Generate and dispatch a fresh code without awaiting delivery.
    fn dispatch(&self, recipient: String, resend: bool) {
        let code = generate_code(self.code_length);
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move {
            if let Err(e) = dispatcher.dispatch_code(&recipient, &code).await {
                warn!(recipient = %recipient, "Code dispatch failed: {e}");
            }
        });
        let _ = self.tx.send(FlowEvent::CodeSent { resend });
    }
}

/// Random numeric code of the configured length.
fn generate_code(len: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Spawn the one-second cooldown ticker for a challenge.
///
/// The returned handle is held by the controller and aborted on abandon or
/// completion; no two ticks are ever in flight at once.
pub fn spawn_cooldown_ticker(challenge: Arc<VerificationChallenge>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first interval tick completes immediately; consume it so the
        // first decrement lands a full second after arming.
        interval.tick().await;
        loop {
            interval.tick().await;
            challenge.tick().await;
        }
    })
}
