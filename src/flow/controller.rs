//! StepController — coordinates the linear onboarding flow.
//!
//! Owns the form, the validation errors, and the current step; delegates
//! verification timing to `VerificationChallenge` and account finalization
//! to the `AccountCreator` collaborator. All mutation flows through the
//! methods here, never ad hoc.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock, broadcast};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::collaborators::{AccountCreator, CodeDispatcher};
use crate::config::FlowConfig;
use crate::form::model::{Field, FormState, ValidationErrors};
use crate::form::strength::PasswordStrength;
use crate::form::validator::validate_step;
use crate::verification::challenge::{
    CodeDecision, VerificationChallenge, spawn_cooldown_ticker,
};

use super::events::{FlowEvent, Snapshot};
use super::step::Step;

/// Controller-level outcome of a verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code accepted and the account was created; the flow is Complete.
    Completed,
    /// Code accepted but account creation failed; banner is showing and
    /// the user may retry from the verification step.
    AccountFailed,
    /// Code rejected; inline message is showing.
    Rejected,
}

/// Drives the Role → Account → Verification → Complete sequence.
pub struct StepController {
    flow_id: Uuid,
    step: RwLock<Step>,
    form: RwLock<FormState>,
    errors: RwLock<ValidationErrors>,
    general_error: RwLock<Option<String>>,
    completed_at: RwLock<Option<DateTime<Utc>>>,
    challenge: Arc<VerificationChallenge>,
    accounts: Arc<dyn AccountCreator>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    tx: broadcast::Sender<FlowEvent>,
}

impl StepController {
    pub fn new(
        config: &FlowConfig,
        accounts: Arc<dyn AccountCreator>,
        dispatcher: Arc<dyn CodeDispatcher>,
    ) -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(config.broadcast_capacity);
        let challenge = VerificationChallenge::new(config, dispatcher, tx.clone());
        Arc::new(Self {
            flow_id: Uuid::new_v4(),
            step: RwLock::new(Step::default()),
            form: RwLock::new(FormState::default()),
            errors: RwLock::new(ValidationErrors::new()),
            general_error: RwLock::new(None),
            completed_at: RwLock::new(None),
            challenge,
            accounts,
            ticker: Mutex::new(None),
            tx,
        })
    }

    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    /// Subscribe to workflow events. Each observer calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.tx.subscribe()
    }

    pub async fn step(&self) -> Step {
        *self.step.read().await
    }

    /// Read-only aggregate for observers. Strength is recomputed from the
    /// current password on every call.
    pub async fn snapshot(&self) -> Snapshot {
        let form = self.form.read().await.clone();
        Snapshot {
            flow_id: self.flow_id,
            step: *self.step.read().await,
            strength: PasswordStrength::from_password(&form.password),
            errors: self.errors.read().await.clone(),
            verification: self.challenge.state().await,
            general_error: self.general_error.read().await.clone(),
            completed_at: *self.completed_at.read().await,
            form,
        }
    }

    /// Apply a single field edit and clear that field's stale error.
    pub async fn update_field(&self, field: Field, value: &str) {
        self.form.write().await.set(field, value);
        self.errors.write().await.remove(&field);
        let _ = self.tx.send(FlowEvent::FieldUpdated { field });
    }

    /// Attempt to leave the current step.
    ///
    /// On validation failure the errors surface and the step stays put; on
    /// success the flow moves to the strictly-next step. Entering
    /// Verification starts the challenge and arms the cooldown ticker.
    /// The Verification step itself completes through `verify`, not here.
    pub async fn advance(&self) -> Result<Step, ValidationErrors> {
        let current = *self.step.read().await;
        let Some(next) = current.next() else {
            warn!("Advance ignored at terminal step");
            return Ok(current);
        };
        if current == Step::Verification {
            warn!("Verification completes through verify, not advance");
            return Ok(current);
        }

        let form = self.form.read().await.clone();
        let errors = validate_step(current, &form);
        if !errors.is_empty() {
            info!(step = %current, count = errors.len(), "Validation blocked advance");
            *self.errors.write().await = errors.clone();
            let _ = self.tx.send(FlowEvent::ValidationFailed {
                step: current,
                errors: errors.clone(),
            });
            return Err(errors);
        }

        self.errors.write().await.clear();
        *self.step.write().await = next;
        info!(step = %next, "Advanced to step");
        let _ = self.tx.send(FlowEvent::StepChanged { step: next });

        if next == Step::Verification {
            self.challenge.start(&form.email).await;
            let handle = spawn_cooldown_ticker(Arc::clone(&self.challenge));
            *self.ticker.lock().await = Some(handle);
        }

        Ok(next)
    }

    /// Record code-input edits on the verification step.
    pub async fn set_code_input(&self, raw: &str) {
        self.challenge.set_code_input(raw).await;
    }

    /// Request a code resend; permitted only once the cooldown elapsed.
    pub async fn resend(&self) -> bool {
        self.challenge.resend().await
    }

    /// Submit a verification code.
    ///
    /// Returns `None` when the action is not invokable (wrong step, blank
    /// code, or an attempt already in flight). Acceptance hands the form
    /// to the account collaborator exactly once; its failure surfaces as
    /// the general banner and reopens the challenge for retry.
    pub async fn verify(&self, code: &str) -> Option<VerifyOutcome> {
        let step = *self.step.read().await;
        if step != Step::Verification {
            warn!(step = %step, "Verify outside the verification step");
            return None;
        }
        *self.general_error.write().await = None;

        let decision = self.challenge.verify(code).await?;
        match decision {
            CodeDecision::Rejected => Some(VerifyOutcome::Rejected),
            CodeDecision::Accepted => {
                let form = self.form.read().await.clone();
                match self.accounts.create_account(self.flow_id, &form).await {
                    Ok(()) => {
                        let completed_at = Utc::now();
                        *self.completed_at.write().await = Some(completed_at);
                        *self.step.write().await = Step::Complete;
                        self.stop_ticker().await;

                        info!(flow_id = %self.flow_id, "Onboarding complete");
                        let _ = self.tx.send(FlowEvent::StepChanged {
                            step: Step::Complete,
                        });
                        let _ = self.tx.send(FlowEvent::Finished {
                            flow_id: self.flow_id,
                            completed_at,
                        });
                        Some(VerifyOutcome::Completed)
                    }
                    Err(e) => {
                        warn!(flow_id = %self.flow_id, "Account creation failed: {e}");
                        let message = e.to_string();
                        *self.general_error.write().await = Some(message.clone());
                        self.challenge.reopen().await;
                        let _ = self.tx.send(FlowEvent::GeneralError { message });
                        Some(VerifyOutcome::AccountFailed)
                    }
                }
            }
        }
    }

    /// Abandon the workflow: cancel the cooldown ticker so no tick lands
    /// on torn-down state. Safe to call at any step.
    pub async fn abandon(&self) {
        self.stop_ticker().await;
        let step = *self.step.read().await;
        if !step.is_terminal() {
            info!(flow_id = %self.flow_id, step = %step, "Workflow abandoned");
            let _ = self.tx.send(FlowEvent::Abandoned {
                flow_id: self.flow_id,
            });
        }
    }

    /// Abort the ticker and wait out the cancellation.
    async fn stop_ticker(&self) {
        let handle = self.ticker.lock().await.take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for StepController {
    fn drop(&mut self) {
        // Last-resort cancellation; uncontended because Drop only runs
        // once no other reference can call into the controller.
        if let Ok(mut guard) = self.ticker.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
