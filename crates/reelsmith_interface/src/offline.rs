//! Generator used when no model is configured.

use crate::TextGenerator;
use async_trait::async_trait;
use reelsmith_core::{GenerateRequest, GenerateResponse};
use reelsmith_error::{GenerationError, GenerationErrorKind, ReelsmithResult};

/// A generator that refuses every request.
///
/// Stages that can fall back (architecture, storyboard) do so on the first
/// call, which makes this the natural backend for template-only runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl TextGenerator for OfflineGenerator {
    #[tracing::instrument(skip_all)]
    async fn generate(&self, _req: &GenerateRequest) -> ReelsmithResult<GenerateResponse> {
        tracing::debug!("Offline generator refused request");
        Err(GenerationError::new(GenerationErrorKind::Unavailable("offline mode".to_string())).into())
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_error::ReelsmithErrorKind;

    #[tokio::test]
    async fn offline_generator_is_unavailable() {
        let generator = OfflineGenerator;
        let request = GenerateRequest::builder().prompt("hi").build().unwrap();
        let err = generator.generate(&request).await.unwrap_err();
        match err.kind() {
            ReelsmithErrorKind::Generation(e) => {
                assert!(matches!(e.kind, GenerationErrorKind::Unavailable(_)))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
