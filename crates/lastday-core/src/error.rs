use thiserror::Error;

/// Errors raised while building domain values from untrusted input.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid deadline {hour:02}:{minute:02}: hour must be 0-23 and minute 0-59")]
    InvalidDeadline { hour: u32, minute: u32 },

    #[error("spot field `{field}` is missing")]
    MissingSpotField { field: &'static str },

    #[error("spot field `{field}` has unparseable value \"{value}\"")]
    InvalidSpotField { field: &'static str, value: String },
}

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
