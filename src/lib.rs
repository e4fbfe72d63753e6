// Tasklist - In-memory task collection with derived views

pub mod config;
pub mod filter;
pub mod models;
pub mod seed;
pub mod store;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use filter::ViewFilter;
pub use models::{Priority, PriorityBreakdown, Task, TaskId};
pub use store::{Summary, TaskStore};
