//! Scan orchestration errors.

use spyglass_core::TargetType;
use thiserror::Error;

/// Errors surfaced at the scan boundary.
///
/// Module failures never appear here; they are folded into per-module
/// outcomes. These variants cover problems that prevent a scan from
/// starting at all.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The target could not be classified and carried no explicit prefix
    #[error("{message}")]
    AmbiguousTarget {
        /// Actionable message enumerating one explicit form per type
        message: String,
    },

    /// A structured query failed validation
    #[error("invalid query: {}", errors.join("; "))]
    InvalidQuery {
        /// Problems collected by the parser
        errors: Vec<String>,
    },

    /// The shared HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] spyglass_core::ConfigError),
}

impl ScanError {
    /// Build the ambiguous-target error for an unclassifiable input.
    ///
    /// The message lists one explicit query form per target type so the
    /// user can immediately retry with a prefix.
    #[must_use]
    pub fn ambiguous(target: &str) -> Self {
        let examples: Vec<&str> = TargetType::ALL
            .iter()
            .map(TargetType::prefix_example)
            .collect();

        Self::AmbiguousTarget {
            message: format!(
                "could not determine the target type of '{target}'; \
                 use an explicit prefix, e.g. {}",
                examples.join(", ")
            ),
        }
    }
}

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
