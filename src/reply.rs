//! Deterministic reply engine.
//!
//! Produces natural-language answers from a task snapshot with no external
//! calls: per-intent replies, a fixed-format summary, and a stable urgency
//! ranking shared by the urgent and priority paths. This is also the
//! fallback target whenever a provider call fails or violates the response
//! contract.

use chrono::NaiveDate;

use crate::context::StatusCounts;
use crate::intent::Intent;
use crate::task::{Task, TaskStatus};

/// Bucketed view of a task snapshot relative to a reference date.
#[derive(Debug, Clone)]
pub struct TaskSummary<'a> {
    pub today: &'a str,
    pub counts: StatusCounts,
    pub due_today: Vec<&'a Task>,
    pub overdue: Vec<&'a Task>,
    pub blocked: Vec<&'a Task>,
}

/// Bucket tasks into due-today / overdue / blocked sets and count statuses.
pub fn summarize_tasks<'a>(tasks: &'a [Task], today: &'a str) -> TaskSummary<'a> {
    let mut counts = StatusCounts::default();
    for task in tasks {
        counts.record(task.status);
    }
    TaskSummary {
        today,
        counts,
        due_today: tasks.iter().filter(|t| t.due_date == today).collect(),
        overdue: tasks
            .iter()
            .filter(|t| t.due_date.as_str() < today && t.status != TaskStatus::Done)
            .collect(),
        blocked: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Blocked)
            .collect(),
    }
}

/// Urgency rank key: lower is more urgent.
///
/// 0 overdue, 1 due exactly today, 2 in progress, 3 queued, 4 anything else.
fn urgency_rank(task: &Task, today: &str) -> u8 {
    if !task.due_date.is_empty() && task.due_date.as_str() < today {
        return 0;
    }
    if !task.due_date.is_empty() && task.due_date == today {
        return 1;
    }
    match task.status {
        TaskStatus::Doing => 2,
        TaskStatus::Todo => 3,
        _ => 4,
    }
}

/// Rank eligible tasks (status not done, not blocked) by urgency.
///
/// The sort is stable: tasks with the same rank key keep their original
/// relative order, which is the only tiebreak.
pub fn rank_urgent_tasks<'a>(tasks: &'a [Task], today: &str) -> Vec<&'a Task> {
    let mut eligible: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status != TaskStatus::Done && t.status != TaskStatus::Blocked)
        .collect();
    eligible.sort_by_key(|t| urgency_rank(t, today));
    eligible
}

/// Day after `today`, if `today` parses as a calendar date.
fn next_day_iso(today: &str) -> Option<String> {
    NaiveDate::parse_from_str(today, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.succ_opt())
        .map(|d| d.format("%Y-%m-%d").to_string())
}

/// Relative due-date phrase for a task.
fn format_due_text(task: &Task, today: &str) -> String {
    if task.due_date.is_empty() {
        return "no due date".into();
    }
    if task.due_date == today {
        return "due today".into();
    }
    if next_day_iso(today).is_some_and(|tomorrow| task.due_date == tomorrow) {
        return "due tomorrow".into();
    }
    format!("due {}", task.due_date)
}

/// Short-circuit message for degenerate snapshots, or `None` to proceed.
///
/// Checked in order: no tasks at all, no non-done tasks, no unblocked tasks.
fn edge_case_message(tasks: &[Task]) -> Option<&'static str> {
    if tasks.is_empty() {
        return Some("You have no tasks yet.");
    }
    let active: Vec<&Task> = tasks.iter().filter(|t| t.status != TaskStatus::Done).collect();
    if active.is_empty() {
        return Some("All tasks are completed 🎉");
    }
    if active.iter().all(|t| t.status == TaskStatus::Blocked) {
        return Some("All remaining tasks are blocked.");
    }
    None
}

fn join_titles(tasks: &[&Task]) -> String {
    tasks
        .iter()
        .map(|t| t.title.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fixed-format counts line.
pub fn build_summary_response(tasks: &[Task], today: &str) -> String {
    let summary = summarize_tasks(tasks, today);
    format!(
        "Summary: {} total — {} todo, {} doing, {} blocked, {} done. Overdue: {}.",
        summary.counts.total(),
        summary.counts.todo,
        summary.counts.doing,
        summary.counts.blocked,
        summary.counts.done,
        summary.overdue.len()
    )
}

/// Numbered list of the top five urgent tasks, most urgent first.
pub fn build_urgent_ranked_response(tasks: &[Task], today: &str) -> String {
    if let Some(msg) = edge_case_message(tasks) {
        return msg.into();
    }
    let ranked = rank_urgent_tasks(tasks, today);
    if ranked.is_empty() {
        return "No urgent tasks right now.".into();
    }
    ranked
        .iter()
        .take(5)
        .enumerate()
        .map(|(i, task)| {
            format!(
                "{}. {} — {} — {}",
                i + 1,
                task.title,
                task.status,
                format_due_text(task, today)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single recommendation: the rank-1 task plus why it ranked first.
///
/// Unlike the urgent path this goes straight to ranking with no degenerate-
/// snapshot pre-check; an empty ranking answers the same either way.
pub fn build_priority_response(tasks: &[Task], today: &str) -> String {
    let ranked = rank_urgent_tasks(tasks, today);
    let Some(top) = ranked.first() else {
        return "No urgent tasks right now.".into();
    };
    let due_text = format_due_text(top, today);
    let reason = if !top.due_date.is_empty() && top.due_date.as_str() < today {
        "It is overdue.".to_string()
    } else if top.due_date == today {
        "It is due today.".to_string()
    } else if top.status == TaskStatus::Doing {
        "It is currently in progress.".to_string()
    } else if top.status == TaskStatus::Todo {
        "It is next in your queue.".to_string()
    } else {
        format!("It is {due_text}.")
    };
    format!("You should work on: {}.\nReason: {}", top.title, reason)
}

/// Deterministic reply for a classified intent.
///
/// `message` is only consulted on the unknown/freeform path.
pub fn build_reply_for_intent(
    intent: Intent,
    message: &str,
    tasks: &[Task],
    today: &str,
) -> String {
    let summary = summarize_tasks(tasks, today);

    match intent {
        Intent::DueToday => {
            if summary.due_today.is_empty() {
                "No tasks are due today.".into()
            } else {
                format!("Tasks due today: {}.", join_titles(&summary.due_today))
            }
        }
        Intent::Overdue => {
            if summary.overdue.is_empty() {
                "You have no overdue tasks.".into()
            } else {
                format!(
                    "Overdue tasks ({}): {}.",
                    summary.overdue.len(),
                    join_titles(&summary.overdue)
                )
            }
        }
        Intent::Blocked => {
            if summary.blocked.is_empty() {
                "No tasks are currently blocked.".into()
            } else {
                format!(
                    "Blocked tasks ({}): {}.",
                    summary.blocked.len(),
                    join_titles(&summary.blocked)
                )
            }
        }
        Intent::ListAll => {
            if tasks.is_empty() {
                "You have no tasks yet.".into()
            } else {
                let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
                format!("All tasks ({}): {}.", tasks.len(), titles.join("; "))
            }
        }
        Intent::Summary => build_summary_response(tasks, today),
        Intent::Urgent => build_urgent_ranked_response(tasks, today),
        Intent::Priority => build_priority_response(tasks, today),
        Intent::Unknown => build_freeform_reply(message, tasks, today),
    }
}

/// Keyword-matched reply for freeform messages.
///
/// Re-applies the trigger phrases defensively over the raw text before
/// defaulting to a generic counts sentence. Note the summary variant here
/// deliberately omits the overdue tail.
pub fn build_freeform_reply(message: &str, tasks: &[Task], today: &str) -> String {
    let lower = message.to_lowercase();
    let summary = summarize_tasks(tasks, today);

    if lower.contains("due today") {
        return if summary.due_today.is_empty() {
            "No tasks are due today.".into()
        } else {
            format!("Tasks due today: {}.", join_titles(&summary.due_today))
        };
    }

    if lower.contains("overdue") {
        return if summary.overdue.is_empty() {
            "You have no overdue tasks.".into()
        } else {
            format!(
                "Overdue tasks ({}): {}.",
                summary.overdue.len(),
                join_titles(&summary.overdue)
            )
        };
    }

    if lower.contains("blocked") {
        return if summary.blocked.is_empty() {
            "No tasks are currently blocked.".into()
        } else {
            format!(
                "Blocked tasks ({}): {}.",
                summary.blocked.len(),
                join_titles(&summary.blocked)
            )
        };
    }

    if lower.contains("summarize") || lower.contains("summary") {
        return format!(
            "Summary: {} total — {} todo, {} doing, {} blocked, {} done.",
            summary.counts.total(),
            summary.counts.todo,
            summary.counts.doing,
            summary.counts.blocked,
            summary.counts.done
        );
    }

    format!(
        "You have {} tasks. {} blocked, {} overdue, {} done.",
        summary.counts.total(),
        summary.counts.blocked,
        summary.overdue.len(),
        summary.counts.done
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, status: TaskStatus, due: &str) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            status,
            due_date: due.into(),
        }
    }

    fn scenario() -> Vec<Task> {
        vec![
            task("t1", "Finish report", TaskStatus::Doing, "2026-01-23"),
            task("t2", "Pay invoices", TaskStatus::Todo, "2026-01-22"),
            task("t3", "Prep client demo", TaskStatus::Todo, "2026-01-24"),
        ]
    }

    const TODAY: &str = "2026-01-23";

    #[test]
    fn urgent_ranking_orders_overdue_then_due_today() {
        let reply = build_urgent_ranked_response(&scenario(), TODAY);
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines[0], "1. Pay invoices — todo — due 2026-01-22");
        assert_eq!(lines[1], "2. Finish report — doing — due today");
        assert_eq!(lines[2], "3. Prep client demo — todo — due tomorrow");
    }

    #[test]
    fn priority_recommends_overdue_task_with_reason() {
        let reply = build_priority_response(&scenario(), TODAY);
        assert_eq!(reply, "You should work on: Pay invoices.\nReason: It is overdue.");
    }

    #[test]
    fn priority_reason_for_in_progress_task() {
        let tasks = vec![
            task("a", "Refactor parser", TaskStatus::Doing, "2026-02-10"),
            task("b", "Write docs", TaskStatus::Todo, "2026-02-11"),
        ];
        let reply = build_priority_response(&tasks, TODAY);
        assert_eq!(
            reply,
            "You should work on: Refactor parser.\nReason: It is currently in progress."
        );
    }

    #[test]
    fn priority_skips_edge_case_precheck() {
        // Empty snapshot: the urgent path answers with its edge-case message,
        // the priority path goes through ranking and finds nothing.
        assert_eq!(build_urgent_ranked_response(&[], TODAY), "You have no tasks yet.");
        assert_eq!(build_priority_response(&[], TODAY), "No urgent tasks right now.");
        let all_done = vec![task("a", "Shipped", TaskStatus::Done, "2026-01-20")];
        assert_eq!(
            build_urgent_ranked_response(&all_done, TODAY),
            "All tasks are completed 🎉"
        );
        assert_eq!(
            build_priority_response(&all_done, TODAY),
            "No urgent tasks right now."
        );
    }

    #[test]
    fn urgent_edge_case_all_blocked() {
        let tasks = vec![
            task("a", "Waiting on legal", TaskStatus::Blocked, "2026-01-20"),
            task("b", "Shipped", TaskStatus::Done, "2026-01-10"),
        ];
        assert_eq!(
            build_urgent_ranked_response(&tasks, TODAY),
            "All remaining tasks are blocked."
        );
    }

    #[test]
    fn urgent_list_caps_at_five() {
        let tasks: Vec<Task> = (0..8)
            .map(|i| task(&format!("t{i}"), &format!("Task {i}"), TaskStatus::Todo, ""))
            .collect();
        let reply = build_urgent_ranked_response(&tasks, TODAY);
        assert_eq!(reply.lines().count(), 5);
    }

    #[test]
    fn ranking_is_stable_within_a_rank() {
        // Four undated todo tasks all share rank 3; original order holds.
        let tasks: Vec<Task> = ["first", "second", "third", "fourth"]
            .iter()
            .map(|name| task(name, name, TaskStatus::Todo, ""))
            .collect();
        let ranked = rank_urgent_tasks(&tasks, TODAY);
        let ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn ranking_excludes_done_and_blocked() {
        let tasks = vec![
            task("a", "Done one", TaskStatus::Done, "2026-01-01"),
            task("b", "Blocked one", TaskStatus::Blocked, "2026-01-01"),
            task("c", "Live one", TaskStatus::Todo, "2026-01-01"),
        ];
        let ranked = rank_urgent_tasks(&tasks, TODAY);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "c");
    }

    #[test]
    fn summary_on_empty_snapshot() {
        assert_eq!(
            build_summary_response(&[], TODAY),
            "Summary: 0 total — 0 todo, 0 doing, 0 blocked, 0 done. Overdue: 0."
        );
    }

    #[test]
    fn summary_counts_overdue() {
        assert_eq!(
            build_summary_response(&scenario(), TODAY),
            "Summary: 3 total — 2 todo, 1 doing, 0 blocked, 0 done. Overdue: 1."
        );
    }

    #[test]
    fn due_today_reply_lists_titles() {
        assert_eq!(
            build_reply_for_intent(Intent::DueToday, "", &scenario(), TODAY),
            "Tasks due today: Finish report."
        );
        assert_eq!(
            build_reply_for_intent(Intent::DueToday, "", &[], TODAY),
            "No tasks are due today."
        );
    }

    #[test]
    fn overdue_reply_includes_count() {
        assert_eq!(
            build_reply_for_intent(Intent::Overdue, "", &scenario(), TODAY),
            "Overdue tasks (1): Pay invoices."
        );
        assert_eq!(
            build_reply_for_intent(Intent::Overdue, "", &[], TODAY),
            "You have no overdue tasks."
        );
    }

    #[test]
    fn blocked_reply_includes_count() {
        let tasks = vec![
            task("a", "Vendor review", TaskStatus::Blocked, ""),
            task("b", "Other work", TaskStatus::Todo, ""),
        ];
        assert_eq!(
            build_reply_for_intent(Intent::Blocked, "", &tasks, TODAY),
            "Blocked tasks (1): Vendor review."
        );
        assert_eq!(
            build_reply_for_intent(Intent::Blocked, "", &[], TODAY),
            "No tasks are currently blocked."
        );
    }

    #[test]
    fn list_all_reply() {
        assert_eq!(
            build_reply_for_intent(Intent::ListAll, "", &scenario(), TODAY),
            "All tasks (3): Finish report; Pay invoices; Prep client demo."
        );
        assert_eq!(
            build_reply_for_intent(Intent::ListAll, "", &[], TODAY),
            "You have no tasks yet."
        );
    }

    #[test]
    fn freeform_rematches_keywords() {
        let reply = build_reply_for_intent(Intent::Unknown, "anything overdue?", &scenario(), TODAY);
        assert_eq!(reply, "Overdue tasks (1): Pay invoices.");
    }

    #[test]
    fn freeform_summary_omits_overdue_tail() {
        let reply = build_freeform_reply("summary please", &scenario(), TODAY);
        assert_eq!(reply, "Summary: 3 total — 2 todo, 1 doing, 0 blocked, 0 done.");
    }

    #[test]
    fn freeform_default_counts_sentence() {
        let reply = build_freeform_reply("hello", &scenario(), TODAY);
        assert_eq!(reply, "You have 3 tasks. 0 blocked, 1 overdue, 0 done.");
    }

    #[test]
    fn due_text_phrases() {
        assert_eq!(
            format_due_text(&task("a", "A", TaskStatus::Todo, ""), TODAY),
            "no due date"
        );
        assert_eq!(
            format_due_text(&task("a", "A", TaskStatus::Todo, "2026-01-23"), TODAY),
            "due today"
        );
        assert_eq!(
            format_due_text(&task("a", "A", TaskStatus::Todo, "2026-01-24"), TODAY),
            "due tomorrow"
        );
        assert_eq!(
            format_due_text(&task("a", "A", TaskStatus::Todo, "2026-03-01"), TODAY),
            "due 2026-03-01"
        );
    }

    #[test]
    fn due_tomorrow_crosses_month_boundary() {
        assert_eq!(
            format_due_text(&task("a", "A", TaskStatus::Todo, "2026-02-01"), "2026-01-31"),
            "due tomorrow"
        );
    }
}
