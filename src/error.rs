//! Diagnostic error types for the taskpilot engine.
//!
//! Errors only exist at the seams: loading task snapshots and talking to an
//! external provider. The orchestrator itself never surfaces an error — every
//! provider-side failure degrades into a deterministic `AiResponse` instead.

use miette::Diagnostic;
use thiserror::Error;

use crate::provider::ProviderError;

/// Top-level error type, preserving the full diagnostic chain of the
/// subsystem that failed.
#[derive(Debug, Error, Diagnostic)]
pub enum AssistantError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors from reading task snapshots off disk.
#[derive(Debug, Error, Diagnostic)]
pub enum TaskError {
    #[error("failed to read task file {path}: {source}")]
    #[diagnostic(
        code(taskpilot::task::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse task file {path}: {message}")]
    #[diagnostic(
        code(taskpilot::task::parse),
        help(
            "The file must be a JSON array of tasks: \
             [{{\"id\": \"...\", \"title\": \"...\", \"status\": \"todo\", \"dueDate\": \"2026-01-23\"}}]. \
             Valid statuses are todo, doing, blocked, done."
        )
    )]
    Parse { path: String, message: String },

    #[error("invalid task status \"{value}\"")]
    #[diagnostic(
        code(taskpilot::task::status),
        help("Valid statuses are todo, doing, blocked, done.")
    )]
    InvalidStatus { value: String },
}
