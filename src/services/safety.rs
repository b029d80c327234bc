//! Content-safety screening of chat completions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ChatCompletion;
use crate::error::{Error, Result};

/// Severity reported by a content filter, in increasing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing found
    Safe,
    /// Low severity
    Low,
    /// Medium severity
    Medium,
    /// High severity
    #[default]
    High,
}

impl Severity {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Whether a finding of this severity fails a check at `threshold`.
    ///
    /// `Safe` never trips; anything else trips at or above the threshold.
    pub fn trips(self, threshold: Severity) -> bool {
        self != Severity::Safe && self >= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Severity::Safe),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(Error::Other(format!("Unknown severity: {}", other))),
        }
    }
}

/// Screens completion responses for filtered content.
pub trait ContentEvaluator: Send + Sync {
    /// Fail with [`Error::ContentSafety`] if the response must not be used.
    fn content_safety_check(&self, response: &ChatCompletion) -> Result<()>;
}

/// Evaluator over the filter annotations the completion service attaches.
///
/// Both the prompt's and every choice's filter results are inspected. A
/// category fails the check when it was filtered, when something was
/// detected, or when its severity reaches the threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSafetyEvaluator {
    threshold: Severity,
}

impl ContentSafetyEvaluator {
    /// Create an evaluator with the default threshold (`High`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold and return self.
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    /// Current threshold.
    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Validate one set of per-category filter results.
    pub fn validate(&self, results: &Map<String, Value>) -> Result<()> {
        for (category, value) in results {
            let flag = |key: &str| value.get(key).and_then(Value::as_bool) == Some(true);

            if flag("filtered") || flag("detected") {
                return Err(Error::ContentSafety(format!("Category: {}.", category)));
            }

            let severity = value
                .get("severity")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<Severity>().ok());
            if let Some(severity) = severity {
                if severity.trips(self.threshold) {
                    return Err(Error::ContentSafety(format!(
                        "Category: {}. Severity: {}.",
                        category, severity
                    )));
                }
            }
        }
        Ok(())
    }
}

impl ContentEvaluator for ContentSafetyEvaluator {
    fn content_safety_check(&self, response: &ChatCompletion) -> Result<()> {
        log::debug!("[BEGIN] content_safety_check");

        if let Some(prompt) = response.prompt_filter_results.first() {
            self.validate(&prompt.content_filter_results)?;
        }
        for choice in &response.choices {
            self.validate(&choice.content_filter_results)?;
        }

        log::debug!("[COMPLETED] content_safety_check");
        Ok(())
    }
}
