//! Generator that replays a fixed sequence of replies.

use crate::TextGenerator;
use async_trait::async_trait;
use reelsmith_core::{GenerateRequest, GenerateResponse};
use reelsmith_error::{GenerationError, GenerationErrorKind, ReelsmithResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays queued replies in order and records every prompt it receives.
///
/// When the queue runs dry every further call fails with
/// [`GenerationErrorKind::EmptyResponse`].
///
/// # Examples
///
/// ```
/// use reelsmith_interface::ScriptedGenerator;
///
/// let generator = ScriptedGenerator::new(vec!["[]".to_string()]);
/// assert_eq!(generator.remaining(), 1);
/// assert_eq!(generator.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    replies: Arc<Mutex<VecDeque<Result<String, GenerationErrorKind>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    /// Generator that answers with each reply in turn.
    pub fn new(replies: Vec<String>) -> Self {
        Self::with_results(replies.into_iter().map(Ok).collect())
    }

    /// Generator that answers with each reply or failure in turn.
    pub fn with_results(results: Vec<Result<String, GenerationErrorKind>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(results.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue another reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Ok(reply.into()));
        }
    }

    /// Queue a failure.
    pub fn push_error(&self, kind: GenerationErrorKind) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(Err(kind));
        }
    }

    /// Number of `generate` calls so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    #[tracing::instrument(skip_all, fields(remaining = self.remaining()))]
    async fn generate(&self, req: &GenerateRequest) -> ReelsmithResult<GenerateResponse> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(req.prompt_text());
        }
        let next = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        match next {
            Some(Ok(text)) => Ok(GenerateResponse::text_only(text)),
            Some(Err(kind)) => Err(GenerationError::new(kind).into()),
            None => Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "replay"
    }
}
