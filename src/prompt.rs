//! Prompt builder.
//!
//! Serializes intent, normalized task context, and the user's message into a
//! single provider-agnostic instruction string. The header is the response
//! contract: the provider must answer with JSON matching the `AiResponse`
//! schema and nothing else. Pure string assembly; the engine never interprets
//! the output itself.

use crate::context::NormalizedTask;
use crate::intent::Intent;

/// Build the instruction payload sent to an external provider.
pub fn build_prompt(intent: Intent, normalized_tasks: &[NormalizedTask], user_message: &str) -> String {
    let contract = [
        "You must respond ONLY with valid JSON matching this schema:",
        "{",
        "  \"intent\": \"URGENT\" | \"PRIORITY\" | \"SUMMARY\" | \"UNKNOWN\",",
        "  \"confidence\": number (0 to 1),",
        "  \"answer\": string,",
        "  \"actions\": string[],",
        "  \"warnings\": string[]",
        "}",
        "No markdown, no commentary, no prose. actions and warnings must be arrays.",
    ]
    .join("\n");

    let task_lines: Vec<String> = normalized_tasks
        .iter()
        .map(|task| {
            let due = if task.due_date.is_empty() {
                "no due date"
            } else {
                task.due_date.as_str()
            };
            format!(
                "- {} | {} | {} | overdue={}",
                task.title, task.status, due, task.is_overdue
            )
        })
        .collect();

    let tasks_block = if task_lines.is_empty() {
        "- none".to_string()
    } else {
        task_lines.join("\n")
    };

    [
        contract,
        format!("Intent: {intent}"),
        format!("User: {user_message}"),
        "Tasks:".to_string(),
        tasks_block,
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn normalized(title: &str, status: TaskStatus, due: &str, overdue: bool) -> NormalizedTask {
        NormalizedTask {
            id: title.to_lowercase(),
            title: title.into(),
            status,
            due_date: due.into(),
            is_overdue: overdue,
        }
    }

    #[test]
    fn prompt_carries_contract_intent_and_message() {
        let prompt = build_prompt(Intent::Priority, &[], "what first?");
        assert!(prompt.starts_with("You must respond ONLY with valid JSON matching this schema:"));
        assert!(prompt.contains("\"confidence\": number (0 to 1),"));
        assert!(prompt.contains("No markdown, no commentary, no prose."));
        assert!(prompt.contains("Intent: PRIORITY"));
        assert!(prompt.contains("User: what first?"));
    }

    #[test]
    fn one_line_per_task() {
        let tasks = vec![
            normalized("Pay invoices", TaskStatus::Todo, "2026-01-22", true),
            normalized("Untracked chore", TaskStatus::Doing, "", false),
        ];
        let prompt = build_prompt(Intent::Urgent, &tasks, "urgent?");
        assert!(prompt.contains("- Pay invoices | todo | 2026-01-22 | overdue=true"));
        assert!(prompt.contains("- Untracked chore | doing | no due date | overdue=false"));
    }

    #[test]
    fn empty_context_gets_placeholder_line() {
        let prompt = build_prompt(Intent::Summary, &[], "summary");
        assert!(prompt.ends_with("Tasks:\n- none"));
    }
}
