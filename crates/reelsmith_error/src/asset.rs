//! Asset sheet error types.

/// Specific error conditions for asset sheet generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetErrorKind {
    /// The job has no story bible to take characters and places from
    #[display("Story bible is required before designing assets")]
    MissingStoryBible,
    /// A generated sheet had no usable image prompt
    #[display("Generated sheet for {} has no image prompts", _0)]
    EmptySheet(String),
}

/// Error type for asset sheet operations.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{AssetError, AssetErrorKind};
///
/// let err = AssetError::new(AssetErrorKind::EmptySheet("林默".to_string()));
/// assert!(format!("{}", err).contains("sheet for 林默"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The specific error condition
    pub kind: AssetErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl AssetError {
    /// Create a new AssetError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
