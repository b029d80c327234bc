//! Interfaces to the external services around the linearizer.
//!
//! The linearizer itself never talks to a service. Callers obtain an
//! [`AnalyzeResult`](crate::model::AnalyzeResult) from a [`DocumentAnalyzer`],
//! linearize it, and may hand the text to a [`ChatCompletionService`] whose
//! responses are screened by a [`ContentEvaluator`]. Each collaborator is a
//! narrow trait passed in explicitly; there is no global registry.

mod analyzer;
mod completion;
mod safety;

pub use analyzer::{DocumentAnalyzer, JsonFileAnalyzer};
pub use completion::{
    collect_responses, ChatCompletion, ChatCompletionService, ChatMessage, ChatRole, Choice,
    CompletionOptions, LlmResponse, PromptFilterResult, ResponseFormat, ResponseMessage,
};
pub use safety::{ContentEvaluator, ContentSafetyEvaluator, Severity};
