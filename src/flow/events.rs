//! Workflow snapshots and broadcast events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::form::model::{Field, FormState, ValidationErrors};
use crate::form::strength::PasswordStrength;
use crate::verification::state::VerificationState;

use super::step::Step;

/// Read-only aggregate handed to observers (HTTP layer, demo UI, tests).
///
/// Strength is recomputed from the current password on every snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub flow_id: Uuid,
    pub step: Step,
    pub form: FormState,
    pub errors: ValidationErrors,
    pub strength: PasswordStrength,
    pub verification: VerificationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Events broadcast on every workflow state change.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowEvent {
    /// A form field was edited.
    FieldUpdated { field: Field },
    /// An advance attempt failed validation.
    ValidationFailed { step: Step, errors: ValidationErrors },
    /// The workflow moved to a new step.
    StepChanged { step: Step },
    /// A verification code was dispatched.
    CodeSent { resend: bool },
    /// One second elapsed on the resend cooldown.
    CooldownTick { remaining: u64 },
    /// A submitted code was rejected.
    VerifyRejected { message: String },
    /// Account creation failed; the banner is showing.
    GeneralError { message: String },
    /// The workflow reached Complete.
    Finished {
        flow_id: Uuid,
        completed_at: DateTime<Utc>,
    },
    /// The workflow was abandoned before completion.
    Abandoned { flow_id: Uuid },
}
