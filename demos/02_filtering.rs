//! Example 02: Filtering and Derived Views
//!
//! This example demonstrates the visible-task ordering (incomplete first,
//! stable), the view filters and the per-priority breakdown.
//!
//! Run with: cargo run --example 02_filtering

use eyre::Result;
use tasklist::{Priority, StoreConfig, TaskStore, ViewFilter};

fn main() -> Result<()> {
    println!("Tasklist Filtering Example");
    println!("==========================\n");

    // Start from the demonstration task set
    let config = StoreConfig {
        seed: true,
        ..Default::default()
    };
    let mut store = TaskStore::new(config)?;

    for filter in ViewFilter::ALL {
        store.set_filter(filter);
        let visible = store.visible_tasks();
        println!("Filter '{}' ({} tasks):", filter.label(), visible.len());
        if visible.is_empty() {
            println!("   {}", filter.empty_message());
        }
        for task in visible {
            let mark = if task.completed { "x" } else { " " };
            println!("   [{}] {} ({})", mark, task.text, task.priority.label());
        }
        println!();
    }

    let breakdown = store.priority_breakdown();
    println!("Outstanding work by priority:");
    for priority in Priority::ALL {
        println!("   {}: {}", priority.label(), breakdown.get(priority));
    }
    println!();

    let summary = store.summary();
    println!("{} ({}%), {} remaining", summary, summary.progress, summary.remaining);
    println!("\nAs JSON: {}", serde_json::to_string_pretty(&summary)?);

    println!("\nExample complete!");
    Ok(())
}
