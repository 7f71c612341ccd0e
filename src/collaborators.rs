//! External collaborator seams — account creation and code dispatch.
//!
//! The core only ever holds these as `Arc<dyn …>`. Real deployments plug
//! in service-backed implementations; the demo binary and the tests use
//! the logging stubs below.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AccountError, DispatchError};
use crate::form::model::FormState;

/// Finalizes an account from a completed form.
///
/// Invoked once per accepted verification. A failure surfaces as a general
/// banner; the workflow stays on the verification step for a retry.
#[async_trait]
pub trait AccountCreator: Send + Sync {
    async fn create_account(&self, flow_id: Uuid, form: &FormState) -> Result<(), AccountError>;
}

/// Dispatches a verification code out-of-band (email, SMS, …).
///
/// Fire-and-forget from the core's perspective: the workflow never awaits
/// delivery and never verifies it happened.
#[async_trait]
pub trait CodeDispatcher: Send + Sync {
    async fn dispatch_code(&self, recipient: &str, code: &str) -> Result<(), DispatchError>;
}

/// Stub creator that logs the handoff and succeeds.
pub struct LoggingAccountCreator;

#[async_trait]
impl AccountCreator for LoggingAccountCreator {
    async fn create_account(&self, flow_id: Uuid, form: &FormState) -> Result<(), AccountError> {
        tracing::info!(
            flow_id = %flow_id,
            email = %form.email,
            role = ?form.role,
            "Account creation requested"
        );
        Ok(())
    }
}

/// Stub dispatcher that logs the code instead of sending it.
pub struct LoggingCodeDispatcher;

#[async_trait]
impl CodeDispatcher for LoggingCodeDispatcher {
    async fn dispatch_code(&self, recipient: &str, code: &str) -> Result<(), DispatchError> {
        tracing::info!(recipient = %recipient, code = %code, "Verification code dispatched");
        Ok(())
    }
}
