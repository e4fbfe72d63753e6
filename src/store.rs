// In-memory task store: canonical state, mutations and derived views

use crate::config::StoreConfig;
use crate::filter::ViewFilter;
use crate::models::{Priority, PriorityBreakdown, Task, TaskId};
use crate::seed;
use eyre::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Single source of truth for the task collection and the view selection
///
/// Every mutation leaves the collection with unique ids. Derived views are
/// recomputed from the current state on each call and never cached.
///
/// The store has no internal locking. Callers sharing it across threads
/// should wrap it in `Arc<Mutex<TaskStore>>` and hold the lock for the whole
/// read-derive or mutate cycle.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: ViewFilter,
    pending_priority: Priority,
    max_text_len: usize,
}

/// Counts and progress for the current collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub progress: u32,
    pub breakdown: PriorityBreakdown,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} done", self.completed, self.total)
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::from_parts(&StoreConfig::default(), Vec::new())
    }
}

impl TaskStore {
    /// Create a store from config
    ///
    /// Starts with the demonstration tasks when `config.seed` is set,
    /// otherwise empty. Fails only if the config is invalid.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let tasks = if config.seed { seed::starter_tasks() } else { Vec::new() };
        Self::with_tasks(config, tasks)
    }

    /// Create a store holding an explicit initial collection
    ///
    /// Tasks are kept in the given order, with their text trimmed and capped
    /// the same way `add_task` does. A task with blank text, or whose id
    /// repeats an earlier one, is dropped.
    pub fn with_tasks(config: StoreConfig, tasks: Vec<Task>) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::with_capacity(tasks.len());
        let mut unique = Vec::with_capacity(tasks.len());
        for mut task in tasks {
            let Some(text) = normalize_text(&task.text, config.max_text_len) else {
                warn!(id = %task.id, "Dropping task with blank text");
                continue;
            };
            if !seen.insert(task.id) {
                warn!(id = %task.id, "Dropping task with duplicate id");
                continue;
            }
            task.text = text;
            unique.push(task);
        }

        let store = Self::from_parts(&config, unique);
        info!(
            count = store.tasks.len(),
            max_text_len = store.max_text_len,
            "Task store initialized"
        );
        Ok(store)
    }

    fn from_parts(config: &StoreConfig, tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            filter: config.default_filter,
            pending_priority: config.default_priority,
            max_text_len: config.max_text_len,
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task with the pending priority
    ///
    /// The text is trimmed and capped at `max_text_len` characters. Blank
    /// text is silently ignored and returns `None`. On success the new task
    /// is placed first in the collection.
    pub fn add_task(&mut self, raw_text: &str) -> Option<&Task> {
        let Some(text) = normalize_text(raw_text, self.max_text_len) else {
            debug!("add_task: blank text, ignoring");
            return None;
        };

        let task = Task::new(text, self.pending_priority);
        debug!(id = %task.id, priority = %task.priority, "add_task: created");
        self.tasks.insert(0, task);
        self.tasks.first()
    }

    /// Flip completion on the task with `id`
    ///
    /// Returns the new completion state, or `None` if no such task exists.
    pub fn toggle_task(&mut self, id: TaskId) -> Option<bool> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                debug!(%id, completed = task.completed, "toggle_task: toggled");
                Some(task.completed)
            }
            None => {
                debug!(%id, "toggle_task: unknown id, ignoring");
                None
            }
        }
    }

    /// Remove the task with `id`, returning it if it existed
    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(%id, "delete_task: unknown id, ignoring");
            return None;
        };

        debug!(%id, "delete_task: removed");
        Some(self.tasks.remove(pos))
    }

    /// Remove every completed task, keeping the order of the rest
    ///
    /// Returns the number of tasks removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        debug!(removed, "clear_completed: done");
        removed
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        debug!(%filter, "set_filter");
        self.filter = filter;
    }

    pub fn set_pending_priority(&mut self, priority: Priority) {
        debug!(%priority, "set_pending_priority");
        self.pending_priority = priority;
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Tasks to display: incomplete before completed, then filtered
    ///
    /// The sort is stable, so tasks with the same completion state keep
    /// their collection order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let mut sorted: Vec<&Task> = self.tasks.iter().collect();
        sorted.sort_by_key(|t| t.completed);
        sorted.retain(|t| self.filter.matches(t));
        sorted
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.completed_count()
    }

    /// Completed share of all tasks as a whole percentage, rounded half up
    ///
    /// Returns 0 for an empty collection.
    pub fn progress_percent(&self) -> u32 {
        let total = self.total_count();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_count();
        // round(completed / total * 100) in integer arithmetic
        ((completed * 200 + total) / (2 * total)) as u32
    }

    /// Incomplete task counts per priority
    pub fn priority_breakdown(&self) -> PriorityBreakdown {
        let mut breakdown = PriorityBreakdown::default();
        for task in self.tasks.iter().filter(|t| !t.completed) {
            breakdown.increment(task.priority);
        }
        breakdown
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.total_count(),
            completed: self.completed_count(),
            remaining: self.remaining_count(),
            progress: self.progress_percent(),
            breakdown: self.priority_breakdown(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// All tasks in collection order (newest first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    pub fn pending_priority(&self) -> Priority {
        self.pending_priority
    }

    pub fn max_text_len(&self) -> usize {
        self.max_text_len
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether there is anything for `clear_completed` to remove
    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|t| t.completed)
    }
}

/// Trim and cap task text, `None` if nothing is left
fn normalize_text(raw: &str, max_len: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().count() <= max_len {
        return Some(trimmed.to_string());
    }

    let capped: String = trimmed.chars().take(max_len).collect();
    Some(capped.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(text: &str, priority: Priority, completed: bool) -> Task {
        Task::new(text, priority).with_completed(completed)
    }

    /// A (incomplete, high), B (incomplete, low), C (completed, medium)
    fn three_task_store() -> (TaskStore, TaskId, TaskId, TaskId) {
        let a = task("A", Priority::High, false);
        let b = task("B", Priority::Low, false);
        let c = task("C", Priority::Medium, true);
        let ids = (a.id, b.id, c.id);
        let store = TaskStore::with_tasks(StoreConfig::default(), vec![a, b, c]).unwrap();
        (store, ids.0, ids.1, ids.2)
    }

    fn visible_ids(store: &TaskStore) -> Vec<TaskId> {
        store.visible_tasks().iter().map(|t| t.id).collect()
    }

    fn assert_unique_ids(store: &TaskStore) {
        let ids: HashSet<_> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), store.total_count());
    }

    #[test]
    fn test_default_store_is_empty() {
        let store = TaskStore::default();
        assert!(store.is_empty());
        assert_eq!(store.filter(), ViewFilter::All);
        assert_eq!(store.pending_priority(), Priority::Medium);
        assert_eq!(store.max_text_len(), 120);
        assert_eq!(store.progress_percent(), 0);
        assert!(store.visible_tasks().is_empty());
    }

    #[test]
    fn test_new_rejects_zero_cap() {
        let config = StoreConfig {
            max_text_len: 0,
            ..Default::default()
        };
        assert!(TaskStore::new(config).is_err());
    }

    #[test]
    fn test_new_with_seed() {
        let config = StoreConfig {
            seed: true,
            ..Default::default()
        };
        let store = TaskStore::new(config).unwrap();
        assert_eq!(store.total_count(), 4);
        assert_eq!(store.completed_count(), 1);
    }

    #[test]
    fn test_new_applies_config_selection() {
        let config = StoreConfig {
            default_priority: Priority::High,
            default_filter: ViewFilter::Active,
            ..Default::default()
        };
        let store = TaskStore::new(config).unwrap();
        assert_eq!(store.pending_priority(), Priority::High);
        assert_eq!(store.filter(), ViewFilter::Active);
    }

    #[test]
    fn test_with_tasks_drops_duplicate_ids() {
        let a = task("A", Priority::High, false);
        let mut dup = task("dup", Priority::Low, false);
        dup.id = a.id;

        let store = TaskStore::with_tasks(StoreConfig::default(), vec![a, dup]).unwrap();
        assert_eq!(store.total_count(), 1);
        assert_eq!(store.tasks()[0].text, "A");
    }

    #[test]
    fn test_with_tasks_normalizes_text() {
        let padded = task("  keep me  ", Priority::Low, false);
        let blank = task("   ", Priority::Low, false);
        let long = task(&"x".repeat(500), Priority::High, true);
        let padded_id = padded.id;

        let store = TaskStore::with_tasks(StoreConfig::default(), vec![padded, blank, long]).unwrap();
        assert_eq!(store.total_count(), 2);
        assert_eq!(store.tasks()[0].id, padded_id);
        assert_eq!(store.tasks()[0].text, "keep me");
        assert_eq!(store.tasks()[1].text.chars().count(), 120);
    }

    #[test]
    fn test_seed_respects_small_cap() {
        let config = StoreConfig {
            max_text_len: 10,
            seed: true,
            ..Default::default()
        };
        let store = TaskStore::new(config).unwrap();
        assert_eq!(store.total_count(), 4);
        for task in store.tasks() {
            assert!(task.text.chars().count() <= 10, "over cap: {:?}", task.text);
            assert_eq!(task.text, task.text.trim());
            assert!(!task.text.is_empty());
        }
        assert_eq!(store.tasks()[0].text, "Review pul");
    }

    #[test]
    fn test_add_task_prepends() {
        let mut store = TaskStore::default();
        store.add_task("first");
        let id = store.add_task("second").unwrap().id;

        assert_eq!(store.total_count(), 2);
        assert_eq!(store.tasks()[0].id, id);
        assert_eq!(store.tasks()[0].text, "second");
        assert_eq!(store.tasks()[1].text, "first");
    }

    #[test]
    fn test_add_task_defaults() {
        let mut store = TaskStore::default();
        let task = store.add_task("Buy milk").unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_add_task_trims_text() {
        let mut store = TaskStore::default();
        let task = store.add_task("  Buy milk \n").unwrap();
        assert_eq!(task.text, "Buy milk");
    }

    #[test]
    fn test_add_blank_text_is_noop() {
        let mut store = TaskStore::default();
        assert!(store.add_task("").is_none());
        assert!(store.add_task("   ").is_none());
        assert!(store.add_task("\t\n").is_none());
        assert_eq!(store.total_count(), 0);
    }

    #[test]
    fn test_add_task_at_cap_is_kept_whole() {
        let mut store = TaskStore::default();
        let text = "x".repeat(120);
        let task = store.add_task(&text).unwrap();
        assert_eq!(task.text, text);
    }

    #[test]
    fn test_add_task_truncates_long_text() {
        let mut store = TaskStore::default();
        let task = store.add_task(&"y".repeat(200)).unwrap();
        assert_eq!(task.text.chars().count(), 120);
    }

    #[test]
    fn test_add_task_truncates_by_characters() {
        let config = StoreConfig {
            max_text_len: 3,
            ..Default::default()
        };
        let mut store = TaskStore::new(config).unwrap();
        let task = store.add_task("héllo").unwrap();
        assert_eq!(task.text, "hél");
    }

    #[test]
    fn test_add_task_truncation_retrims() {
        let config = StoreConfig {
            max_text_len: 4,
            ..Default::default()
        };
        let mut store = TaskStore::new(config).unwrap();
        let task = store.add_task("ab   cd").unwrap();
        assert_eq!(task.text, "ab");
    }

    #[test]
    fn test_add_task_uses_pending_priority() {
        let mut store = TaskStore::default();
        store.set_pending_priority(Priority::Low);
        assert_eq!(store.add_task("low one").unwrap().priority, Priority::Low);

        store.set_pending_priority(Priority::High);
        assert_eq!(store.add_task("high one").unwrap().priority, Priority::High);

        // Earlier task keeps its priority
        assert_eq!(store.tasks()[1].priority, Priority::Low);
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (mut store, a, _, _) = three_task_store();
        assert_eq!(store.toggle_task(a), Some(true));
        assert!(store.get(a).unwrap().completed);
        assert_eq!(store.toggle_task(a), Some(false));
        assert!(!store.get(a).unwrap().completed);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let (mut store, _, _, _) = three_task_store();
        let before = store.tasks().to_vec();
        assert_eq!(store.toggle_task(TaskId::new()), None);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_delete_task() {
        let (mut store, a, b, c) = three_task_store();
        let removed = store.delete_task(b).unwrap();
        assert_eq!(removed.text, "B");
        assert_eq!(store.tasks().iter().map(|t| t.id).collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_delete_then_toggle_or_delete_is_noop() {
        let (mut store, a, _, _) = three_task_store();
        store.delete_task(a);
        let before = store.tasks().to_vec();

        assert_eq!(store.toggle_task(a), None);
        assert!(store.delete_task(a).is_none());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_clear_completed() {
        let (mut store, a, b, _) = three_task_store();
        assert_eq!(store.clear_completed(), 1);
        assert_eq!(store.tasks().iter().map(|t| t.id).collect::<Vec<_>>(), vec![a, b]);
        assert!(!store.has_completed());
    }

    #[test]
    fn test_clear_completed_is_idempotent() {
        let (mut store, _, _, _) = three_task_store();
        let first = store.tasks()[0].id;
        store.toggle_task(first);
        store.clear_completed();
        let once = store.tasks().to_vec();

        assert_eq!(store.clear_completed(), 0);
        assert_eq!(store.tasks(), once.as_slice());
    }

    #[test]
    fn test_clear_completed_preserves_order() {
        let tasks = vec![
            task("1", Priority::Low, false),
            task("2", Priority::Low, true),
            task("3", Priority::Low, false),
            task("4", Priority::Low, true),
            task("5", Priority::Low, false),
        ];
        let mut store = TaskStore::with_tasks(StoreConfig::default(), tasks).unwrap();
        store.clear_completed();

        let texts: Vec<_> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "3", "5"]);
    }

    #[test]
    fn test_setters_do_not_touch_tasks() {
        let (mut store, _, _, _) = three_task_store();
        let before = store.tasks().to_vec();
        store.set_filter(ViewFilter::Completed);
        store.set_pending_priority(Priority::High);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_visible_tasks_by_filter() {
        let (mut store, a, b, c) = three_task_store();

        assert_eq!(visible_ids(&store), vec![a, b, c]);

        store.set_filter(ViewFilter::Active);
        assert_eq!(visible_ids(&store), vec![a, b]);

        store.set_filter(ViewFilter::Completed);
        assert_eq!(visible_ids(&store), vec![c]);
    }

    #[test]
    fn test_visible_tasks_sort_is_stable() {
        let tasks = vec![
            task("done-1", Priority::Low, true),
            task("open-1", Priority::Low, false),
            task("done-2", Priority::Low, true),
            task("open-2", Priority::Low, false),
            task("open-3", Priority::Low, false),
        ];
        let store = TaskStore::with_tasks(StoreConfig::default(), tasks).unwrap();

        let texts: Vec<_> = store.visible_tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["open-1", "open-2", "open-3", "done-1", "done-2"]);

        // The canonical collection is left untouched
        assert_eq!(store.tasks()[0].text, "done-1");
    }

    #[test]
    fn test_visible_tasks_reflect_latest_mutation() {
        let (mut store, a, b, c) = three_task_store();
        store.toggle_task(a);
        assert_eq!(visible_ids(&store), vec![b, a, c]);

        store.set_filter(ViewFilter::Active);
        assert_eq!(visible_ids(&store), vec![b]);
    }

    #[test]
    fn test_counts() {
        let (store, _, _, _) = three_task_store();
        assert_eq!(store.total_count(), 3);
        assert_eq!(store.completed_count(), 1);
        assert_eq!(store.remaining_count(), 2);
        assert_eq!(store.completed_count() + store.remaining_count(), store.total_count());
    }

    #[test]
    fn test_progress_percent() {
        let (mut store, a, b, _) = three_task_store();
        assert_eq!(store.progress_percent(), 33);

        store.toggle_task(a);
        assert_eq!(store.progress_percent(), 67);

        store.toggle_task(b);
        assert_eq!(store.progress_percent(), 100);

        store.clear_completed();
        assert_eq!(store.progress_percent(), 0);
    }

    #[test]
    fn test_progress_rounds_half_up() {
        let mut tasks = vec![task("done", Priority::Low, true)];
        for i in 0..7 {
            tasks.push(task(&format!("open-{}", i), Priority::Low, false));
        }
        // 1/8 = 12.5%
        let store = TaskStore::with_tasks(StoreConfig::default(), tasks).unwrap();
        assert_eq!(store.progress_percent(), 13);
    }

    #[test]
    fn test_priority_breakdown_excludes_completed() {
        let (store, _, _, _) = three_task_store();
        let breakdown = store.priority_breakdown();
        assert_eq!(breakdown.high, 1);
        assert_eq!(breakdown.low, 1);
        assert_eq!(breakdown.medium, 0);
    }

    #[test]
    fn test_add_to_three_task_set() {
        let (mut store, _, _, _) = three_task_store();
        store.set_pending_priority(Priority::Low);
        let id = store.add_task("Buy milk").unwrap().id;

        assert_eq!(store.total_count(), 4);
        assert_eq!(store.tasks()[0].id, id);
        assert_eq!(store.priority_breakdown().low, 2);
    }

    #[test]
    fn test_summary() {
        let (store, _, _, _) = three_task_store();
        let summary = store.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.remaining, 2);
        assert_eq!(summary.progress, 33);
        assert_eq!(summary.breakdown.get(Priority::High), 1);
        assert_eq!(summary.to_string(), "1/3 done");
    }

    #[test]
    fn test_ids_stay_unique_across_operations() {
        let mut store = TaskStore::default();
        for i in 0..20 {
            store.add_task(&format!("task {}", i));
        }
        assert_unique_ids(&store);

        let ids: Vec<_> = store.tasks().iter().map(|t| t.id).collect();
        for id in ids.iter().step_by(3) {
            store.toggle_task(*id);
        }
        for id in ids.iter().step_by(4) {
            store.delete_task(*id);
        }
        store.clear_completed();
        for i in 0..5 {
            store.add_task(&format!("again {}", i));
        }

        assert_unique_ids(&store);
        for id in ids.iter().step_by(4) {
            assert!(store.get(*id).is_none());
        }
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  hi  ", 10), Some("hi".to_string()));
        assert_eq!(normalize_text("   ", 10), None);
        assert_eq!(normalize_text("abcdef", 3), Some("abc".to_string()));
    }
}
