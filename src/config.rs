//! Configuration types.

use crate::error::ConfigError;

/// Workflow configuration.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Seconds a user must wait before a verification code may be resent.
    pub cooldown_secs: u64,
    /// Length of dispatched verification codes (digits).
    pub code_length: usize,
    /// Literal token accepted in place of a real code (demo policy).
    pub bypass_token: String,
    /// Simulated verification latency in milliseconds (0 disables).
    pub verify_delay_ms: u64,
    /// Capacity of the workflow event broadcast channel.
    pub broadcast_capacity: usize,
    /// Port the demo HTTP server binds to.
    pub http_port: u16,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 60,
            code_length: 6,
            bypass_token: "skip".to_string(),
            verify_delay_ms: 400,
            broadcast_capacity: 256,
            http_port: 8080,
        }
    }
}

impl FlowConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Unparsable values are rejected rather than silently ignored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let cooldown_secs = parse_var("ENROLL_COOLDOWN_SECS", defaults.cooldown_secs)?;
        let code_length = parse_var("ENROLL_CODE_LENGTH", defaults.code_length)?;
        let verify_delay_ms = parse_var("ENROLL_VERIFY_DELAY_MS", defaults.verify_delay_ms)?;
        let http_port = parse_var("ENROLL_HTTP_PORT", defaults.http_port)?;

        let bypass_token =
            std::env::var("ENROLL_BYPASS_TOKEN").unwrap_or(defaults.bypass_token);

        if code_length == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ENROLL_CODE_LENGTH".to_string(),
                message: "code length must be at least 1".to_string(),
            });
        }

        Ok(Self {
            cooldown_secs,
            code_length,
            bypass_token,
            verify_delay_ms,
            http_port,
            broadcast_capacity: defaults.broadcast_capacity,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
