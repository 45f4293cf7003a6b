//! taskpilot CLI: task-aware assistant engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use taskpilot::context::{build_context, today_iso};
use taskpilot::intent::detect_intent;
use taskpilot::orchestrator::{run_ai, ProviderRoute, RunAiRequest};
use taskpilot::provider::{OpenAiClient, OpenAiConfig, ProviderKind};
use taskpilot::task::{
    load_tasks, seed_tasks, InMemoryRepository, Task, TaskRepository, TaskStatus,
};

#[derive(Parser)]
#[command(name = "taskpilot", version, about = "Task-aware assistant engine")]
struct Cli {
    /// JSON file with the task snapshot. Uses the demo tasks when omitted.
    #[arg(long, global = true)]
    tasks: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD). Defaults to today in UTC.
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant a question about your tasks.
    Ask {
        /// The message to classify and answer.
        #[arg(long)]
        message: String,

        /// Response path: mock, openai, or gemini.
        #[arg(long, default_value = "mock")]
        provider: String,
    },

    /// List the current task snapshot.
    Tasks,

    /// Append a task to the snapshot (in memory only; printed as stored).
    Add {
        /// Task title.
        #[arg(long)]
        title: String,

        /// Status: todo, doing, blocked, or done.
        #[arg(long, default_value = "todo")]
        status: String,

        /// Due date (YYYY-MM-DD), empty for none.
        #[arg(long, default_value = "")]
        due: String,
    },

    /// Print the normalized task context as JSON.
    Context,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let tasks = match &cli.tasks {
        Some(path) => load_tasks(path)?,
        None => seed_tasks(),
    };
    let today = cli.today.clone().unwrap_or_else(today_iso);

    match cli.command {
        Commands::Ask { message, provider } => {
            let kind: ProviderKind = provider
                .parse()
                .map_err(|e: String| miette::miette!("{e}"))?;

            let ctx = build_context(&tasks, &today);
            let intent = detect_intent(&message);
            tracing::info!(%intent, provider = %kind, total = ctx.total_tasks, "dispatching");

            let request = RunAiRequest {
                intent,
                normalized_tasks: &ctx.tasks,
                user_message: &message,
                today: &ctx.today,
            };

            let openai;
            let route = match kind {
                ProviderKind::Mock => ProviderRoute::Mock,
                ProviderKind::Gemini => ProviderRoute::Unimplemented { name: "Gemini" },
                ProviderKind::OpenAi => {
                    openai = OpenAiClient::new(OpenAiConfig::from_env());
                    ProviderRoute::External(&openai)
                }
            };

            let response = run_ai(request, &route);

            println!("{}", response.answer);
            for warning in &response.warnings {
                eprintln!("warning: {warning}");
            }
        }

        Commands::Tasks => {
            if tasks.is_empty() {
                println!("No tasks.");
            } else {
                println!("Tasks ({}):", tasks.len());
                for task in &tasks {
                    let due = if task.due_date.is_empty() {
                        "no due date".to_string()
                    } else {
                        task.due_date.clone()
                    };
                    println!("  {} [{}] {} — {}", task.id, task.status, task.title, due);
                }
            }
        }

        Commands::Add { title, status, due } => {
            let status = TaskStatus::parse(&status).ok_or_else(|| {
                taskpilot::error::TaskError::InvalidStatus {
                    value: status.clone(),
                }
            })?;
            let repo = InMemoryRepository::new(tasks);
            let millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default();
            let stored = repo.append(Task {
                id: format!("task-{millis}"),
                title,
                status,
                due_date: due,
            });
            println!("{}", serde_json::to_string_pretty(&stored).into_diagnostic()?);
        }

        Commands::Context => {
            let ctx = build_context(&tasks, &today);
            println!("{}", serde_json::to_string_pretty(&ctx).into_diagnostic()?);
        }
    }

    Ok(())
}
