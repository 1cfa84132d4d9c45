use std::fmt::Write as _;
use thiserror::Error;

/// A single field-level message from a 422 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Typed error hierarchy for the AgriBid client.
///
/// Use at module boundaries (API calls, session store, config validation).
/// Internal/leaf functions can continue using `anyhow::Result`; the `Internal`
/// variant allows seamless conversion via the `?` operator.
#[derive(Debug, Error)]
pub enum AgriBidError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not signed in: no stored session token")]
    MissingCredentials,

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Validation failed: {}", format_fields(.fields))]
    Validation { fields: Vec<FieldError> },

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response from server: {0}")]
    Decode(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience alias for results using `AgriBidError`.
pub type AgriBidResult<T> = std::result::Result<T, AgriBidError>;

fn format_fields(fields: &[FieldError]) -> String {
    if fields.is_empty() {
        return "no details".to_string();
    }
    let mut out = String::new();
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        let _ = write!(out, "{}: {}", f.field, f.message);
    }
    out
}

impl AgriBidError {
    /// Whether the user has to (re)authenticate before retrying.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            AgriBidError::MissingCredentials | AgriBidError::Unauthorized
        )
    }
}

impl From<reqwest::Error> for AgriBidError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AgriBidError::Decode(e.to_string())
        } else {
            AgriBidError::Transport(e.to_string())
        }
    }
}
