//! The `AiResponse` wire contract and its schema validation.
//!
//! `AiResponse` is the one externally-visible data shape: field names and
//! types are fixed, and any provider output that does not satisfy them is
//! rejected with a tagged [`SchemaViolation`] naming the exact reason. The
//! checker walks the JSON explicitly rather than relying on a blind
//! deserialize, so each rejection reason is testable on its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intent::Intent;

/// The subset of intents a provider may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseIntent {
    Urgent,
    Priority,
    Summary,
    Unknown,
}

impl ResponseIntent {
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "URGENT" => Some(Self::Urgent),
            "PRIORITY" => Some(Self::Priority),
            "SUMMARY" => Some(Self::Summary),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl From<Intent> for ResponseIntent {
    /// Intents outside the provider vocabulary fold to `Unknown`.
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Urgent => Self::Urgent,
            Intent::Priority => Self::Priority,
            Intent::Summary => Self::Summary,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ResponseIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Urgent => "URGENT",
            Self::Priority => "PRIORITY",
            Self::Summary => "SUMMARY",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Structured response returned by the orchestrator on every path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub intent: ResponseIntent,
    pub confidence: f64,
    pub answer: String,
    pub actions: Vec<String>,
    pub warnings: Vec<String>,
}

/// Why a provider's output was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("output is not valid JSON: {message}")]
    NotJson { message: String },

    #[error("output is not a JSON object")]
    NotAnObject,

    #[error("missing required field \"{field}\"")]
    MissingField { field: &'static str },

    #[error("intent \"{value}\" is not one of URGENT, PRIORITY, SUMMARY, UNKNOWN")]
    InvalidIntent { value: String },

    #[error("confidence must be a number in [0, 1], got {value}")]
    InvalidConfidence { value: String },

    #[error("answer must be a string")]
    InvalidAnswer,

    #[error("\"{field}\" must be an array of strings")]
    InvalidStringList { field: &'static str },
}

fn string_list(
    obj: &serde_json::Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<Vec<String>, SchemaViolation> {
    let value = obj
        .get(field)
        .ok_or(SchemaViolation::MissingField { field })?;
    let items = value
        .as_array()
        .ok_or(SchemaViolation::InvalidStringList { field })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(SchemaViolation::InvalidStringList { field })
        })
        .collect()
}

/// Check raw provider text against the `AiResponse` contract.
pub fn parse_ai_response(raw: &str) -> Result<AiResponse, SchemaViolation> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| SchemaViolation::NotJson {
            message: e.to_string(),
        })?;
    let obj = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

    let intent_label = obj
        .get("intent")
        .ok_or(SchemaViolation::MissingField { field: "intent" })?
        .as_str()
        .ok_or_else(|| SchemaViolation::InvalidIntent {
            value: obj["intent"].to_string(),
        })?;
    let intent = ResponseIntent::from_label(intent_label).ok_or_else(|| {
        SchemaViolation::InvalidIntent {
            value: intent_label.to_string(),
        }
    })?;

    let confidence_value = obj
        .get("confidence")
        .ok_or(SchemaViolation::MissingField {
            field: "confidence",
        })?;
    let confidence = confidence_value
        .as_f64()
        .filter(|c| (0.0..=1.0).contains(c))
        .ok_or_else(|| SchemaViolation::InvalidConfidence {
            value: confidence_value.to_string(),
        })?;

    let answer = obj
        .get("answer")
        .ok_or(SchemaViolation::MissingField { field: "answer" })?
        .as_str()
        .ok_or(SchemaViolation::InvalidAnswer)?
        .to_string();

    let actions = string_list(obj, "actions")?;
    let warnings = string_list(obj, "warnings")?;

    Ok(AiResponse {
        intent,
        confidence,
        answer,
        actions,
        warnings,
    })
}
