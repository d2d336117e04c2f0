//! Module error types.

use spyglass_core::TargetType;
use std::time::Duration;
use thiserror::Error;

/// Errors a lookup module can surface during registration or execution.
///
/// Execution errors never abort a scan; the orchestrator folds them into
/// the module's outcome and siblings continue.
#[derive(Error, Debug)]
pub enum ModuleError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service rate limit exhausted after retries
    #[error("rate limited{}", retry_after.map(|d| format!(" (retry after {d:?})")).unwrap_or_default())]
    RateLimited {
        /// Server-suggested wait, from `Retry-After` when present
        retry_after: Option<Duration>,
    },

    /// Service returned a status the module cannot interpret
    #[error("unexpected status {status} from {service}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Service name for context
        service: String,
    },

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A required credential is missing from the store
    #[error("missing credential: {key_name}")]
    MissingCredential {
        /// Service key the credential is stored under
        key_name: String,
    },

    /// Module invoked for a target type it does not declare
    #[error("module {module} does not support target type {target_type}")]
    UnsupportedTarget {
        /// Module name
        module: String,
        /// The offending type
        target_type: TargetType,
    },

    /// Descriptor failed validation at registration time
    #[error("invalid descriptor for {name}: {reason}")]
    InvalidDescriptor {
        /// Module name (may be empty, which is itself the problem)
        name: String,
        /// Why validation rejected it
        reason: String,
    },
}

/// Result type alias for module operations.
pub type ModuleResult<T> = std::result::Result<T, ModuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModuleError::MissingCredential {
            key_name: "hibp".to_string(),
        };
        assert_eq!(err.to_string(), "missing credential: hibp");

        let err = ModuleError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "rate limited");

        let err = ModuleError::UnexpectedStatus {
            status: 503,
            service: "wigle".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 503 from wigle");
    }
}
