//! Example 01: Basic Usage
//!
//! This example demonstrates adding, toggling, deleting and clearing tasks,
//! and reading the counts a presentation layer would render.
//!
//! Run with: cargo run --example 01_basic_usage

use eyre::{Result, eyre};
use tasklist::{Priority, StoreConfig, TaskStore};

fn main() -> Result<()> {
    println!("Tasklist Basic Usage Example");
    println!("============================\n");

    let mut store = TaskStore::new(StoreConfig::default())?;
    println!("Store created (empty).\n");

    // ADD
    println!("1. ADD - Adding three tasks...");
    store.set_pending_priority(Priority::High);
    let review = store
        .add_task("Review pull request")
        .map(|t| t.id)
        .ok_or_else(|| eyre!("Task was not added"))?;
    store.set_pending_priority(Priority::Low);
    store.add_task("  Water the plants  ");
    let milk = store.add_task("Buy milk").map(|t| t.id);
    println!("   Total tasks: {}", store.total_count());
    for task in store.tasks() {
        println!("   - [{}] {}", task.priority.label(), task.text);
    }
    println!();

    // Blank text is ignored
    println!("2. ADD blank text - ignored...");
    let added = store.add_task("   ");
    println!("   Added: {}, total still {}\n", added.is_some(), store.total_count());

    // TOGGLE
    println!("3. TOGGLE - Completing the review...");
    store.toggle_task(review);
    println!("   {} ({}%)\n", store.summary(), store.progress_percent());

    // DELETE
    println!("4. DELETE - Removing 'Buy milk'...");
    if let Some(id) = milk {
        store.delete_task(id);
        // Deleting again is a no-op
        store.delete_task(id);
    }
    println!("   Total tasks: {}\n", store.total_count());

    // CLEAR
    println!("5. CLEAR - Removing completed tasks...");
    let removed = store.clear_completed();
    println!("   Removed {} task(s), {} remaining\n", removed, store.remaining_count());

    println!("Example complete!");
    Ok(())
}
