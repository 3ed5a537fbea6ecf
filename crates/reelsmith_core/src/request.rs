//! Request and response types for text generation.

use serde::{Deserialize, Serialize};

/// Roles of conversation participants.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum MessageRole {
    /// System instructions
    System,
    /// Prompt text
    User,
    /// Model reply
    Assistant,
}

/// One message of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender role
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl Message {
    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Generic generation request.
///
/// # Examples
///
/// ```
/// use reelsmith_core::GenerateRequest;
///
/// let request = GenerateRequest::builder()
///     .prompt("Describe the clip")
///     .max_tokens(Some(1024))
///     .temperature(Some(0.7))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 1);
/// assert_eq!(request.max_tokens(), &Some(1024));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    #[builder(setter(custom))]
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0)
    temperature: Option<f32>,
    /// Model identifier to use
    model: Option<String>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Concatenated text of every user message.
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl GenerateRequestBuilder {
    /// Append a user message.
    pub fn prompt(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages
            .get_or_insert_with(Vec::new)
            .push(Message::user(text));
        self
    }

    /// Append an arbitrary message.
    pub fn message(&mut self, message: Message) -> &mut Self {
        self.messages.get_or_insert_with(Vec::new).push(message);
        self
    }
}

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// Plain text output
    Text(String),
    /// Structured JSON output
    Json(serde_json::Value),
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![Output::Text("[]".to_string())],
/// };
/// assert_eq!(response.text(), "[]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Response holding a single text output.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            outputs: vec![Output::Text(text.into())],
        }
    }

    /// All outputs rendered as text and concatenated.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .map(|o| match o {
                Output::Text(t) => t.clone(),
                Output::Json(v) => v.to_string(),
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
