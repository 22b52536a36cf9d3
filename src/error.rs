//! Error taxonomy for session operations.
//!
//! ERROR HANDLING
//! ==============
//! Gateways and validators return [`AuthError`]. The session store never
//! hands these back to callers; it folds them into the `error` field and a
//! notification. The codes exist so log lines stay greppable.

// =============================================================================
// VALIDATION
// =============================================================================

/// Caller-supplied input that fails the form rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("invalid email")]
    InvalidEmail,

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("no user is signed in")]
    NoActiveSession,
}

// =============================================================================
// AUTH ERROR
// =============================================================================

/// Failure of an operation that goes through the auth gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The credential pair was rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Input failed validation before reaching the gateway.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Network or backend-reported failure. The message may be empty when
    /// the backend gave nothing usable.
    #[error("{0}")]
    Gateway(String),

    /// A bearer token was rejected by an authenticated call.
    #[error("Session expired")]
    Unauthorized,
}

impl AuthError {
    /// Stable code for log fields.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "E_INVALID_CREDENTIALS",
            Self::Validation(_) => "E_VALIDATION",
            Self::Gateway(_) => "E_GATEWAY",
            Self::Unauthorized => "E_UNAUTHORIZED",
        }
    }

    /// User-facing message, or `None` when the error carries no text and the
    /// caller should fall back to its own default.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        let message = self.to_string();
        let trimmed = message.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
