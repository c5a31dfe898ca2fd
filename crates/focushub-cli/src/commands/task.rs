//! Task management commands for CLI.

use clap::Subcommand;
use focushub_core::TaskUpdate;

use crate::app::{print_json, App};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task title
        title: String,
        /// Estimated sessions (1-99)
        #[arg(long)]
        estimate: Option<u32>,
    },
    /// List tasks
    List {
        /// Only tasks not yet completed
        #[arg(long)]
        pending: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New estimated sessions
        #[arg(long, conflicts_with = "clear_estimate")]
        estimate: Option<u32>,
        /// Remove the estimate
        #[arg(long)]
        clear_estimate: bool,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a task completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Remove {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::open()?;
    let tasks = &app.tasks;

    match action {
        TaskAction::Create { title, estimate } => {
            let task = tasks.create(&title, estimate)?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { pending } => {
            let list: Vec<_> = tasks
                .tasks()
                .into_iter()
                .filter(|t| !pending || !t.is_completed)
                .collect();
            print_json(&list)?;
        }
        TaskAction::Update {
            id,
            title,
            estimate,
            clear_estimate,
            completed,
        } => {
            let estimated_sessions = if clear_estimate {
                Some(None)
            } else {
                estimate.map(Some)
            };
            let task = tasks.update(
                &id,
                TaskUpdate {
                    title,
                    estimated_sessions,
                    is_completed: completed,
                },
            )?;
            println!("Task updated:");
            print_json(&task)?;
        }
        TaskAction::Complete { id } => {
            let task = tasks.complete(&id)?;
            println!("Task completed: {}", task.id);
        }
        TaskAction::Remove { id } => {
            tasks.remove(&id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
