//! # taskpilot
//!
//! A task-aware assistant engine: given a user's free-text message and a
//! snapshot of task records, it classifies intent, derives deterministic
//! task-based answers, and can route through an external LLM provider under
//! a strict response contract, falling back deterministically on any failure.
//!
//! ## Architecture
//!
//! - **Context normalizer** (`context`): dated, annotated task context with overdue flags and counts
//! - **Intent classifier** (`intent`): keyword rules, fixed precedence, first match wins
//! - **Reply engine** (`reply`): deterministic answers with no external calls
//! - **Prompt builder** (`prompt`): provider-agnostic instruction payload with an output-schema contract
//! - **Orchestrator** (`orchestrator`): route selection, contract enforcement, deterministic fallback
//!
//! ## Library usage
//!
//! ```no_run
//! use taskpilot::context::build_context;
//! use taskpilot::intent::detect_intent;
//! use taskpilot::orchestrator::{run_ai, ProviderRoute, RunAiRequest};
//! use taskpilot::task::{InMemoryRepository, TaskRepository};
//!
//! let repo = InMemoryRepository::seeded();
//! let tasks = repo.list();
//! let ctx = build_context(&tasks, "2026-01-23");
//! let intent = detect_intent("what should I work on first?");
//! let response = run_ai(
//!     RunAiRequest {
//!         intent,
//!         normalized_tasks: &ctx.tasks,
//!         user_message: "what should I work on first?",
//!         today: &ctx.today,
//!     },
//!     &ProviderRoute::Mock,
//! );
//! println!("{}", response.answer);
//! ```

pub mod context;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod reply;
pub mod response;
pub mod task;
