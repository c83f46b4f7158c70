//! Interactive task list screen.

use quiz_core::model::{Task, TaskId, TaskPriority, TaskStatus};
use services::{TaskService, TaskServiceError};
use storage::repository::StorageError;

use crate::console::Console;

pub async fn run_tasks(
    console: &mut Console,
    tasks: &TaskService,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        println!("\nTasks:");
        println!("  1. List all");
        println!("  2. List pending");
        println!("  3. Add");
        println!("  4. Complete");
        println!("  5. Edit");
        println!("  6. Delete");
        println!("  7. Stats");
        println!("  8. Back");
        match console.prompt_choice("> ", 8).await? {
            Some(1) => print_tasks(&tasks.list_tasks(None).await?),
            Some(2) => print_tasks(&tasks.list_tasks(Some(TaskStatus::Pending)).await?),
            Some(3) => add_task(console, tasks).await?,
            Some(4) => complete_task(console, tasks).await?,
            Some(5) => edit_task(console, tasks).await?,
            Some(6) => delete_task(console, tasks).await?,
            Some(7) => {
                let stats = tasks.stats().await?;
                println!(
                    "{} total, {} completed, {} pending ({:.0}% done)",
                    stats.total,
                    stats.completed,
                    stats.pending,
                    stats.completion_rate()
                );
            }
            _ => return Ok(()),
        }
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        let marker = if task.is_completed() { "x" } else { " " };
        let description = task
            .description()
            .map(|d| format!(" -- {d}"))
            .unwrap_or_default();
        println!(
            "  [{marker}] #{} ({}) {}{description}",
            task.id(),
            task.priority(),
            task.title()
        );
    }
}

/// Print the recoverable task errors; pass real failures up.
fn report(result: Result<(), TaskServiceError>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(()) => Ok(()),
        Err(TaskServiceError::Storage(StorageError::NotFound)) => {
            println!("No task with that id.");
            Ok(())
        }
        Err(TaskServiceError::Task(err)) => {
            println!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn add_task(
    console: &mut Console,
    tasks: &TaskService,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(title) = console.prompt("Title: ").await? else {
        return Ok(());
    };
    let Some(description) = console.prompt("Description (optional): ").await? else {
        return Ok(());
    };
    let Some(priority) = prompt_priority(console).await? else {
        return Ok(());
    };

    report(
        tasks
            .add_task(&title, Some(description), priority)
            .await
            .map(|id| println!("Added task #{id}.")),
    )
}

async fn complete_task(
    console: &mut Console,
    tasks: &TaskService,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(id) = prompt_task_id(console, "Task id to complete: ").await? else {
        return Ok(());
    };
    report(
        tasks
            .complete_task(id)
            .await
            .map(|task| println!("Completed #{}: {}", task.id(), task.title())),
    )
}

async fn edit_task(
    console: &mut Console,
    tasks: &TaskService,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(id) = prompt_task_id(console, "Task id to edit: ").await? else {
        return Ok(());
    };
    let Some(title) = console.prompt("New title: ").await? else {
        return Ok(());
    };
    let Some(description) = console.prompt("New description (optional): ").await? else {
        return Ok(());
    };
    let Some(priority) = prompt_priority(console).await? else {
        return Ok(());
    };

    report(
        tasks
            .edit_task(id, &title, Some(description), priority)
            .await
            .map(|task| println!("Updated #{}.", task.id())),
    )
}

async fn delete_task(
    console: &mut Console,
    tasks: &TaskService,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(id) = prompt_task_id(console, "Task id to delete: ").await? else {
        return Ok(());
    };
    report(
        tasks
            .delete_task(id)
            .await
            .map(|()| println!("Deleted #{id}.")),
    )
}

async fn prompt_task_id(
    console: &mut Console,
    prompt: &str,
) -> std::io::Result<Option<TaskId>> {
    loop {
        let Some(line) = console.prompt(prompt).await? else {
            return Ok(None);
        };
        match line.parse::<u64>() {
            Ok(raw) => return Ok(Some(TaskId::new(raw))),
            Err(_) => println!("Task ids are whole numbers."),
        }
    }
}

async fn prompt_priority(console: &mut Console) -> std::io::Result<Option<TaskPriority>> {
    loop {
        let Some(line) = console.prompt("Priority (low/medium/high): ").await? else {
            return Ok(None);
        };
        match line.parse::<TaskPriority>() {
            Ok(priority) => return Ok(Some(priority)),
            Err(err) => println!("{err}"),
        }
    }
}
