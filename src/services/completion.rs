//! Chat-completion collaborator: request and response types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ContentEvaluator;
use crate::error::Result;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions for the model
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
}

/// A message sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: ChatRole,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling options for a completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature
    pub temperature: f32,

    /// Number of choices to generate
    pub num_generations: u32,
}

impl CompletionOptions {
    /// Create options with defaults (temperature 1.0, one generation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the number of generations.
    pub fn with_generations(mut self, n: u32) -> Self {
        self.num_generations = n.max(1);
        self
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            num_generations: 1,
        }
    }
}

/// Structured-output schema requested from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Schema name
    pub name: String,

    /// JSON schema the response must satisfy
    pub schema: Value,
}

impl ResponseFormat {
    /// Create a response format.
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// One generated answer, reduced to what callers use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text (absent when the model produced none)
    pub content: Option<String>,

    /// Why generation stopped ("stop", "length", ...)
    pub finish_reason: String,

    /// Token counters (prompt, completion, total)
    pub usages: BTreeMap<String, u64>,
}

impl LlmResponse {
    /// Sum of all token counters.
    pub fn token_usages(&self) -> u64 {
        self.usages.values().sum()
    }
}

/// A language-model service.
///
/// Implementations wrap a remote endpoint and are expected to screen every
/// response with a [`ContentEvaluator`], typically via [`collect_responses`].
pub trait ChatCompletionService: Send + Sync {
    /// Name of the deployed model.
    fn deployed_model_name(&self) -> &str;

    /// Run a completion.
    fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Vec<LlmResponse>>;

    /// Run a completion constrained to a structured response format.
    fn chat_completion_with_format(
        &self,
        messages: &[ChatMessage],
        response_format: &ResponseFormat,
        options: &CompletionOptions,
    ) -> Result<Vec<LlmResponse>>;
}

/// Raw completion response as the service returns it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Response identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Model that served the request
    #[serde(default)]
    pub model: Option<String>,

    /// Generated choices
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage; nested detail objects are kept but not counted
    #[serde(default)]
    pub usage: Option<Map<String, Value>>,

    /// Filter results for the prompt
    #[serde(default)]
    pub prompt_filter_results: Vec<PromptFilterResult>,
}

/// One generated choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Choice {
    /// Choice index
    #[serde(default)]
    pub index: u32,

    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,

    /// Generated message
    #[serde(default)]
    pub message: Option<ResponseMessage>,

    /// Per-category filter results for this choice
    #[serde(default)]
    pub content_filter_results: Map<String, Value>,
}

/// Message inside a choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Message author
    #[serde(default)]
    pub role: Option<ChatRole>,

    /// Message text
    #[serde(default)]
    pub content: Option<String>,
}

/// Filter results for one prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptFilterResult {
    /// Index of the prompt in the request
    #[serde(default)]
    pub prompt_index: u32,

    /// Per-category filter results
    #[serde(default)]
    pub content_filter_results: Map<String, Value>,
}

/// Screen a completion and reduce it to one [`LlmResponse`] per choice.
///
/// Only integer usage counters are kept. `completion_tokens` is split evenly
/// across the generations so each response reports its own share.
pub fn collect_responses(
    completion: &ChatCompletion,
    num_generations: u32,
    evaluator: &dyn ContentEvaluator,
) -> Result<Vec<LlmResponse>> {
    evaluator.content_safety_check(completion)?;

    let mut usages: BTreeMap<String, u64> = completion
        .usage
        .iter()
        .flatten()
        .filter_map(|(key, value)| value.as_u64().map(|n| (key.clone(), n)))
        .collect();
    let completion_tokens = usages.get("completion_tokens").copied().unwrap_or(0);
    usages.insert(
        "completion_tokens".to_string(),
        completion_tokens / u64::from(num_generations.max(1)),
    );

    Ok(completion
        .choices
        .iter()
        .map(|choice| LlmResponse {
            content: match &choice.message {
                Some(message) => message.content.clone(),
                None => Some(String::new()),
            },
            finish_reason: choice.finish_reason.clone().unwrap_or_default(),
            usages: usages.clone(),
        })
        .collect())
}
