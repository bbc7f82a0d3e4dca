//! Transport and provider error types

use thiserror::Error;

/// Errors surfaced by the API client collaborator.
///
/// The scripting bridge passes these through verbatim as exception
/// messages; it never classifies provider status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP exchange itself failed (connect, timeout, body decode).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status. `message` is the
    /// provider's own error text, passed along untouched.
    #[error("{message}")]
    Provider { status: u16, message: String },
}

impl ApiError {
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        ApiError::Provider { status, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_displays_message_verbatim() {
        let err = ApiError::provider(403, "You are not authorized to perform this operation");
        assert_eq!(err.to_string(), "You are not authorized to perform this operation");
    }
}
