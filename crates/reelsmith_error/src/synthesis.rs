//! Storyboard synthesis error types.

/// Specific error conditions for prompt synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SynthesisErrorKind {
    /// The external call failed for the given scope (batch or clip id)
    #[display("Generation failed for {}: {}", scope, message)]
    GenerationFailed {
        /// `batch` or the clip id
        scope: String,
        /// Underlying failure
        message: String,
    },
    /// The reply could not be turned into visual descriptions
    #[display("Unparseable reply for {}: {}", scope, preview)]
    UnparseableResponse {
        /// `batch` or the clip id
        scope: String,
        /// Truncated raw reply
        preview: String,
    },
    /// Batched reply length did not match the clip count (strict mode)
    #[display("Batch returned {} descriptions for {} clips", received, expected)]
    LengthMismatch {
        /// Number of clips sent
        expected: usize,
        /// Number of descriptions received
        received: usize,
    },
    /// Script episode has no clips to storyboard
    #[display("Episode {} has no script clips", _0)]
    EmptyEpisode(u32),
    /// Job state has no script to storyboard
    #[display("Script is required before generating a storyboard")]
    MissingScript,
}

/// Error type for synthesis operations.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{SynthesisError, SynthesisErrorKind};
///
/// let err = SynthesisError::new(SynthesisErrorKind::LengthMismatch {
///     expected: 6,
///     received: 5,
/// });
/// assert!(format!("{}", err).contains("5 descriptions for 6 clips"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Synthesis Error: {} at line {} in {}", kind, line, file)]
pub struct SynthesisError {
    /// The specific error condition
    pub kind: SynthesisErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SynthesisError {
    /// Create a new SynthesisError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SynthesisErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
