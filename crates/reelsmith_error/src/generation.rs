//! Errors raised by text generators.

/// Specific failure conditions of an external text-generation call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No generator is configured for this pipeline
    #[display("No text generator available: {}", _0)]
    Unavailable(String),
    /// The request could not be completed (network, auth, quota)
    #[display("Generation request failed: {}", _0)]
    Request(String),
    /// The provider answered with a non-success status
    #[display("Provider returned HTTP {}: {}", status_code, message)]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Response body or message
        message: String,
    },
    /// The provider answered but produced no text
    #[display("Generation returned an empty response")]
    EmptyResponse,
}

impl GenerationErrorKind {
    /// Whether a caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::Status { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GenerationErrorKind::EmptyResponse => true,
            _ => false,
        }
    }
}

/// Error type for text-generation calls.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::EmptyResponse);
/// assert!(format!("{}", err).contains("empty"));
/// assert!(err.kind.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
