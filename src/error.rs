//! Error types for the onboarding workflow.
//!
//! Field-level validation problems are NOT errors in this taxonomy — they
//! travel as `ValidationErrors` data returned to the controller. The enums
//! here cover configuration and collaborator failures only.

/// Top-level error type for the workflow service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Account creation error: {0}")]
    Account(#[from] AccountError),

    #[error("Code dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },
}

/// Failures from the account-creation collaborator.
///
/// Surfaced to the user as a general banner on the verification step; the
/// workflow never regresses to an earlier step because of one.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account creation rejected: {reason}")]
    Rejected { reason: String },

    #[error("Account service unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Failures from the notification-dispatch collaborator.
///
/// Dispatch is fire-and-forget; these are logged, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Dispatch service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Invalid recipient address: {recipient}")]
    BadRecipient { recipient: String },
}

/// Result type alias for the workflow service.
pub type Result<T> = std::result::Result<T, Error>;
