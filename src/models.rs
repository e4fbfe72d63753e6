// Data models for Tasklist

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque task identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh identifier
    ///
    /// UUIDv7 carries a millisecond timestamp plus random bits, so ids are
    /// never reused even after the task they named has been deleted.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| format!("invalid task id '{}': {}", s, e))
    }
}

/// Task priority, fixed at creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities in display order
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Short label for display
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Med",
            Priority::High => "High",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{}' (expected low, medium or high)", other)),
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create an incomplete task with a fresh id
    ///
    /// The text is stored as given; trimming and length capping happen in
    /// [`crate::TaskStore::add_task`].
    pub fn new(text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: TaskId::new(),
            text: text.into(),
            completed: false,
            priority,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set completion status
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Outstanding (incomplete) task counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityBreakdown {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }

    pub(crate) fn increment(&mut self, priority: Priority) {
        match priority {
            Priority::Low => self.low += 1,
            Priority::Medium => self.medium += 1,
            Priority::High => self.high += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}
