//! Integration tests for the collaborator seams.

use std::path::Path;

use docweave::services::{
    collect_responses, ChatCompletion, ChatCompletionService, ChatMessage, CompletionOptions,
    ContentSafetyEvaluator, DocumentAnalyzer, LlmResponse, ResponseFormat, Severity,
};
use docweave::{analyze_and_parse, AnalyzeResult, Error, Paragraph, Result, TableFormat};

/// Analyzer that returns a canned result for any path.
struct CannedAnalyzer {
    result: AnalyzeResult,
}

impl DocumentAnalyzer for CannedAnalyzer {
    fn name(&self) -> &str {
        "canned"
    }

    fn analyze_document(&self, _path: &Path) -> Result<AnalyzeResult> {
        Ok(self.result.clone())
    }
}

/// Completion service that replays a saved raw response.
struct ReplayService {
    raw: &'static str,
    evaluator: ContentSafetyEvaluator,
}

impl ReplayService {
    fn new(raw: &'static str) -> Self {
        Self {
            raw,
            evaluator: ContentSafetyEvaluator::new(),
        }
    }
}

impl ChatCompletionService for ReplayService {
    fn deployed_model_name(&self) -> &str {
        "replay-model"
    }

    fn chat_completion(
        &self,
        _messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Vec<LlmResponse>> {
        let completion: ChatCompletion = serde_json::from_str(self.raw)?;
        collect_responses(&completion, options.num_generations, &self.evaluator)
    }

    fn chat_completion_with_format(
        &self,
        messages: &[ChatMessage],
        _response_format: &ResponseFormat,
        options: &CompletionOptions,
    ) -> Result<Vec<LlmResponse>> {
        self.chat_completion(messages, options)
    }
}

const TWO_CHOICES: &str = r#"{
    "id": "chatcmpl-42",
    "model": "replay-model",
    "choices": [
        {"index": 0, "finish_reason": "stop", "message": {"role": "assistant", "content": "Summary A"},
         "content_filter_results": {"hate": {"filtered": false, "severity": "safe"}}},
        {"index": 1, "finish_reason": "stop", "message": {"role": "assistant", "content": "Summary B"},
         "content_filter_results": {"hate": {"filtered": false, "severity": "low"}}}
    ],
    "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160},
    "prompt_filter_results": [
        {"prompt_index": 0, "content_filter_results": {"violence": {"filtered": false, "severity": "safe"}}}
    ]
}"#;

const FILTERED: &str = r#"{
    "choices": [
        {"index": 0, "finish_reason": "content_filter", "message": {"role": "assistant", "content": null},
         "content_filter_results": {"self_harm": {"filtered": true, "severity": "medium"}}}
    ],
    "usage": {"prompt_tokens": 5, "completion_tokens": 0, "total_tokens": 5}
}"#;

#[test]
fn test_analyzer_feeds_linearizer() {
    let mut result = AnalyzeResult::new();
    result.add_paragraph(Paragraph::new("from the service", 1, 0));
    let analyzer = CannedAnalyzer { result };

    let blocks =
        analyze_and_parse(&analyzer, Path::new("report.pdf"), TableFormat::Delimited).unwrap();
    assert_eq!(blocks, vec!["from the service"]);
}

#[test]
fn test_linearized_text_sent_to_completion_service() {
    let mut result = AnalyzeResult::new();
    result.add_paragraph(Paragraph::new("Quarterly revenue grew.", 1, 0));
    let text = docweave::to_text(&result, TableFormat::Delimited).unwrap();

    let service = ReplayService::new(TWO_CHOICES);
    let messages = vec![
        ChatMessage::system("Summarize the document."),
        ChatMessage::user(text),
    ];
    let options = CompletionOptions::new().with_generations(2);

    let responses = service.chat_completion(&messages, &options).unwrap();
    assert_eq!(service.deployed_model_name(), "replay-model");
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].content.as_deref(), Some("Summary A"));
    assert_eq!(responses[1].content.as_deref(), Some("Summary B"));
    assert_eq!(responses[0].usages["completion_tokens"], 20);
    assert_eq!(responses[0].token_usages(), 120 + 20 + 160);
}

#[test]
fn test_structured_output_goes_through_safety_check() {
    let service = ReplayService::new(FILTERED);
    let format = ResponseFormat::new("summary", serde_json::json!({"type": "object"}));

    let err = service
        .chat_completion_with_format(&[ChatMessage::user("hi")], &format, &CompletionOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::ContentSafety(ref m) if m.contains("self_harm")));
}

#[test]
fn test_strict_threshold_rejects_low_severity() {
    let service = ReplayService {
        raw: TWO_CHOICES,
        evaluator: ContentSafetyEvaluator::new().with_threshold(Severity::Low),
    };

    let err = service
        .chat_completion(&[ChatMessage::user("hi")], &CompletionOptions::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Content safety check failed: Category: hate. Severity: low."
    );
}

#[test]
fn test_invalid_completion_json() {
    let service = ReplayService::new("{\"choices\": 3}");
    let err = service
        .chat_completion(&[], &CompletionOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
