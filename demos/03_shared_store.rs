//! Example 03: Sharing a Store Across Threads
//!
//! TaskStore has no internal locking. This example wraps it in a Mutex and
//! holds the lock for each whole mutate or read-derive cycle.
//!
//! Run with: cargo run --example 03_shared_store

use eyre::{Result, eyre};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use tasklist::TaskStore;

fn main() -> Result<()> {
    println!("Tasklist Shared Store Example");
    println!("=============================\n");

    let store = Arc::new(Mutex::new(TaskStore::default()));

    let num_threads = 4;
    let tasks_per_thread = 25;
    let barrier = Arc::new(Barrier::new(num_threads));

    println!(
        "1. Concurrent adds ({} threads, {} tasks each)...",
        num_threads, tasks_per_thread
    );
    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                for i in 0..tasks_per_thread {
                    let mut guard = store.lock().unwrap();
                    let id = guard.add_task(&format!("thread {} task {}", thread_id, i)).map(|t| t.id);
                    // Complete every other task while still holding the lock
                    if i % 2 == 0
                        && let Some(id) = id
                    {
                        guard.toggle_task(id);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().map_err(|_| eyre!("Worker thread panicked"))?;
    }

    // Read-derive cycle under one lock
    let guard = store.lock().map_err(|_| eyre!("Store lock poisoned"))?;
    println!("   {} ({}%)", guard.summary(), guard.progress_percent());
    println!("   Expected total: {}\n", num_threads * tasks_per_thread);

    println!("Example complete!");
    Ok(())
}
