//! Errors that carry only a message and the location that raised them.

macro_rules! message_error {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
        #[display("{}: {} at line {} in {}", $label, message, line, file)]
        pub struct $name {
            /// What went wrong
            pub message: String,
            /// Line that raised the error
            pub line: u32,
            /// File that raised the error
            pub file: &'static str,
        }

        impl $name {
            /// Record `message` at the caller's location.
            #[track_caller]
            pub fn new(message: impl Into<String>) -> Self {
                let location = std::panic::Location::caller();
                Self {
                    message: message.into(),
                    line: location.line(),
                    file: location.file(),
                }
            }
        }
    };
}

message_error!(
    /// A model reply or job file held no usable JSON, or output failed to serialize.
    ///
    /// ```
    /// use reelsmith_error::JsonError;
    ///
    /// let err = JsonError::new("Model reply contained no JSON");
    /// assert!(err.to_string().starts_with("JSON Error: Model reply"));
    /// ```
    JsonError,
    "JSON Error"
);

message_error!(
    /// I/O around the pipeline: reading job files and writing results.
    BackendError,
    "Backend Error"
);

message_error!(
    /// Configuration could not be loaded or violates a bound.
    ConfigError,
    "Configuration Error"
);

message_error!(
    /// A generation request was missing a required field.
    BuilderError,
    "Builder Error"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_points_at_caller() {
        let err = ConfigError::new("min_episodes exceeds max_episodes");
        assert!(err.file.ends_with("message.rs"));
        assert!(err.to_string().contains("Configuration Error: min_episodes"));
    }
}
