//! Trait definition for text generation backends.

use async_trait::async_trait;
use reelsmith_core::{GenerateRequest, GenerateResponse};
use reelsmith_error::ReelsmithResult;

/// Core trait that every text generation backend implements.
///
/// Replies are untrusted text; callers parse them tolerantly.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for the request.
    async fn generate(&self, req: &GenerateRequest) -> ReelsmithResult<GenerateResponse>;

    /// Provider name (e.g., "gemini", "offline").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    async fn generate(&self, req: &GenerateRequest) -> ReelsmithResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    async fn generate(&self, req: &GenerateRequest) -> ReelsmithResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
