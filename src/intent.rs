//! Intent classification for user messages.
//!
//! Keyword-based classification that works without an LLM: case-insensitive
//! substring checks in a fixed order, first match wins. The order matters —
//! trigger phrases can co-occur ("overdue and blocked" resolves to
//! [`Intent::Overdue`] because it is checked first) and must not be
//! rearranged.

use serde::{Deserialize, Serialize};

/// Discrete classification of a user's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Summary,
    Blocked,
    DueToday,
    ListAll,
    Overdue,
    Urgent,
    Priority,
    Unknown,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Summary => "SUMMARY",
            Self::Blocked => "BLOCKED",
            Self::DueToday => "DUE_TODAY",
            Self::ListAll => "LIST_ALL",
            Self::Overdue => "OVERDUE",
            Self::Urgent => "URGENT",
            Self::Priority => "PRIORITY",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Classify a user message into an [`Intent`].
///
/// Pure and deterministic. Checks run in precedence order; the first
/// matching trigger phrase wins.
pub fn detect_intent(message: &str) -> Intent {
    let lower = message.to_lowercase();

    if lower.contains("due today") {
        return Intent::DueToday;
    }
    if lower.contains("overdue") {
        return Intent::Overdue;
    }
    if lower.contains("blocked") {
        return Intent::Blocked;
    }
    if lower.contains("prioritize") || lower.contains("priority") || lower.contains("work on first")
    {
        return Intent::Priority;
    }
    if lower.contains("urgent") {
        return Intent::Urgent;
    }
    if lower.contains("summarize") || lower.contains("summary") {
        return Intent::Summary;
    }
    if lower.contains("all tasks") || lower.contains("list") {
        return Intent::ListAll;
    }
    Intent::Unknown
}
