// Demonstration task set

use crate::models::{Priority, Task};

/// Starter tasks, newest first
pub fn starter_tasks() -> Vec<Task> {
    vec![
        Task::new("Review pull request from the team", Priority::High),
        Task::new("Update component library to latest MUI version", Priority::Medium),
        Task::new("Write unit tests for auth module", Priority::High).with_completed(true),
        Task::new("Refactor legacy CSS to Tailwind", Priority::Low),
    ]
}
