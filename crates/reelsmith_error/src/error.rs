//! Top-level error wrapper types.

use crate::{
    ArchitectError, AssetError, BackendError, BuilderError, ConfigError, GenerationError, JsonError,
    SynthesisError,
};

/// Every error family the pipeline can raise.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithError, JsonError};
///
/// let json_err = JsonError::new("trailing garbage");
/// let err: ReelsmithError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReelsmithErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Generic backend error
    #[from(BackendError)]
    Backend(BackendError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// External text-generation failure
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Episode architecture error
    #[from(ArchitectError)]
    Architect(ArchitectError),
    /// Storyboard synthesis error
    #[from(SynthesisError)]
    Synthesis(SynthesisError),
    /// Asset sheet error
    #[from(AssetError)]
    Asset(AssetError),
}

/// Reelsmith error with kind discrimination.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithResult, ConfigError};
///
/// fn might_fail() -> ReelsmithResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reelsmith Error: {}", _0)]
pub struct ReelsmithError(Box<ReelsmithErrorKind>);

impl ReelsmithError {
    /// Create a new error from a kind.
    pub fn new(kind: ReelsmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelsmithErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ReelsmithErrorKind
impl<T> From<T> for ReelsmithError
where
    T: Into<ReelsmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Reelsmith operations.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithResult, BackendError};
///
/// fn load_job() -> ReelsmithResult<String> {
///     Err(BackendError::new("job.json not found"))?
/// }
/// ```
pub type ReelsmithResult<T> = std::result::Result<T, ReelsmithError>;
