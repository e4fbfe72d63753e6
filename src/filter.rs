// View filtering for the task list

use crate::models::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects which tasks are visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    #[default]
    All,
    Active,    // completed == false
    Completed, // completed == true
}

impl ViewFilter {
    pub const ALL: [ViewFilter; 3] = [ViewFilter::All, ViewFilter::Active, ViewFilter::Completed];

    /// Whether a task passes this filter
    pub fn matches(self, task: &Task) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Active => !task.completed,
            ViewFilter::Completed => task.completed,
        }
    }

    /// Tab label for display
    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All",
            ViewFilter::Active => "Active",
            ViewFilter::Completed => "Done",
        }
    }

    /// Message to show when nothing passes the filter
    pub fn empty_message(self) -> &'static str {
        match self {
            ViewFilter::All => "No tasks yet, add one above",
            ViewFilter::Active => "No active tasks",
            ViewFilter::Completed => "Nothing completed yet",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewFilter::All => "all",
            ViewFilter::Active => "active",
            ViewFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ViewFilter::All),
            "active" => Ok(ViewFilter::Active),
            "completed" | "done" => Ok(ViewFilter::Completed),
            other => Err(format!("unknown filter '{}' (expected all, active or completed)", other)),
        }
    }
}
