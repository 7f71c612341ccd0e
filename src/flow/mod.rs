//! Step orchestration — the linear onboarding sequence.
//!
//! The controller drives Role → Account → Verification → Complete, gating
//! each transition on field validation and delegating the verification
//! step to the challenge.

pub mod controller;
pub mod events;
pub mod routes;
pub mod step;

pub use controller::{StepController, VerifyOutcome};
pub use events::{FlowEvent, Snapshot};
pub use routes::{FlowRouteState, flow_routes};
pub use step::Step;
