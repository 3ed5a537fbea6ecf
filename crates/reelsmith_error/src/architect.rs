//! Episode architecture error types.

/// Specific error conditions for architecture operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ArchitectErrorKind {
    /// Episode number does not exist in the architecture
    #[display("Episode {} not found", _0)]
    EpisodeNotFound(u32),
    /// The job has no story bible to architect from
    #[display("Story bible is required before generating an architecture")]
    MissingStoryBible,
    /// An adjustment referenced events that are not in the story bible
    #[display("Adjustment for episode {} references unknown events: {}", episode, events)]
    UnknownEvents {
        /// Episode being adjusted
        episode: u32,
        /// Comma-separated unknown ids
        events: String,
    },
}

/// Error type for architecture operations.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ArchitectError, ArchitectErrorKind};
///
/// let err = ArchitectError::new(ArchitectErrorKind::EpisodeNotFound(7));
/// assert!(format!("{}", err).contains("Episode 7"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Architect Error: {} at line {} in {}", kind, line, file)]
pub struct ArchitectError {
    /// The specific error condition
    pub kind: ArchitectErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ArchitectError {
    /// Create a new ArchitectError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ArchitectErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
