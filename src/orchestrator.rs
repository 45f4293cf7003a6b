//! Provider orchestrator.
//!
//! Selects a response path (deterministic mock, unimplemented placeholder,
//! or external provider), enforces the `AiResponse` contract on provider
//! output, and falls back to the deterministic reply engine on any violation
//! or failure. The contract is absolute: `run_ai` always returns a valid
//! `AiResponse` and never panics or propagates an error, which is what lets
//! the presentation layer own the post-failure cooldown policy.

use std::time::{Duration, Instant};

use crate::context::NormalizedTask;
use crate::intent::Intent;
use crate::prompt::build_prompt;
use crate::provider::{ProviderError, ProviderTransport};
use crate::reply::build_reply_for_intent;
use crate::response::{parse_ai_response, AiResponse, SchemaViolation};
use crate::task::Task;

/// One orchestrator invocation. No state survives the call.
#[derive(Debug, Clone)]
pub struct RunAiRequest<'a> {
    pub intent: Intent,
    pub normalized_tasks: &'a [NormalizedTask],
    pub user_message: &'a str,
    /// Reference date (`YYYY-MM-DD`) for the deterministic engine.
    pub today: &'a str,
}

/// Which response path to take.
pub enum ProviderRoute<'a> {
    /// Deterministic reply engine; never touches the network.
    Mock,
    /// Named provider with no implementation yet; fixed placeholder answer.
    Unimplemented { name: &'a str },
    /// External provider capability, invoked exactly once.
    External(&'a dyn ProviderTransport),
}

fn denormalize(normalized: &[NormalizedTask]) -> Vec<Task> {
    normalized.iter().map(Task::from).collect()
}

fn build_mock_response(request: &RunAiRequest<'_>, warnings: Vec<String>) -> AiResponse {
    let tasks = denormalize(request.normalized_tasks);
    let answer = build_reply_for_intent(
        request.intent,
        request.user_message,
        &tasks,
        request.today,
    );
    let confidence = if request.intent == Intent::Unknown {
        0.6
    } else {
        1.0
    };
    AiResponse {
        intent: request.intent.into(),
        confidence,
        answer,
        actions: Vec::new(),
        warnings,
    }
}

/// Run one assistant invocation and always come back with a valid response.
pub fn run_ai(request: RunAiRequest<'_>, route: &ProviderRoute<'_>) -> AiResponse {
    match route {
        ProviderRoute::Mock => build_mock_response(&request, Vec::new()),

        ProviderRoute::Unimplemented { name } => AiResponse {
            intent: request.intent.into(),
            confidence: 0.1,
            answer: format!(
                "[LLM placeholder] Intent: {}, Tasks: {}",
                request.intent,
                request.normalized_tasks.len()
            ),
            actions: Vec::new(),
            warnings: vec![format!("{name} provider not implemented yet.")],
        },

        ProviderRoute::External(transport) => {
            let prompt = build_prompt(request.intent, request.normalized_tasks, request.user_message);
            let name = transport.name().to_string();

            let raw = match transport.send(&prompt) {
                Ok(raw) => raw,
                Err(ProviderError::MissingCredential { provider, env_var }) => {
                    tracing::warn!(provider = %provider, "provider credential missing");
                    return AiResponse {
                        intent: request.intent.into(),
                        confidence: 0.1,
                        answer: format!("[{provider} placeholder] Missing API key."),
                        actions: Vec::new(),
                        warnings: vec![format!("Missing {env_var}.")],
                    };
                }
                Err(e) => {
                    tracing::warn!(provider = %name, error = %e, "provider call failed, falling back");
                    return build_mock_response(
                        &request,
                        vec![format!("{name} request failed; using deterministic fallback.")],
                    );
                }
            };

            match parse_ai_response(&raw) {
                Ok(response) => response,
                // Unparsable text is indistinguishable from a failed request
                // to the caller; shape violations get their own warning.
                Err(SchemaViolation::NotJson { message }) => {
                    tracing::warn!(provider = %name, %message, "provider output not JSON, falling back");
                    build_mock_response(
                        &request,
                        vec![format!("{name} request failed; using deterministic fallback.")],
                    )
                }
                Err(violation) => {
                    tracing::warn!(provider = %name, %violation, "provider output violated contract, falling back");
                    build_mock_response(
                        &request,
                        vec![format!("Invalid AIResponse shape from {name}.")],
                    )
                }
            }
        }
    }
}

/// Caller-owned suppression window after a provider failure.
///
/// The orchestrator never throws, so the presentation layer decides when to
/// stop attempting provider calls: trip the cooldown on any response whose
/// warnings indicate a failure, and route through [`ProviderRoute::Mock`]
/// while it is active.
#[derive(Debug, Clone)]
pub struct ProviderCooldown {
    window: Duration,
    until: Option<Instant>,
}

impl ProviderCooldown {
    /// Default suppression window after a failure.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30);

    pub fn new(window: Duration) -> Self {
        Self {
            window,
            until: None,
        }
    }

    /// Start (or restart) the suppression window at `now`.
    pub fn trip(&mut self, now: Instant) {
        self.until = Some(now + self.window);
    }

    /// Whether provider attempts should still be suppressed at `now`.
    pub fn active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

impl Default for ProviderCooldown {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
