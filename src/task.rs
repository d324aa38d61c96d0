//! Task list core for tl.
//!
//! `TaskList` is the pure in-memory model: an ordered sequence of tasks
//! plus the monotonic id counter. It knows nothing about disk or UI; the
//! `store` module wraps it with persistence and the `cli`/`ui` modules
//! bind events to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "tl.tasks.v1";

/// A single to-do item.
///
/// Ids are unique for the lifetime of the list, including after
/// deletions; text is trimmed and non-empty at creation and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Which subset of tasks is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    All,
    Active,
    Completed,
}

impl Filter {
    /// Parse a filter mode string; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Filter> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Filter::All),
            "active" => Some(Filter::Active),
            "completed" => Some(Filter::Completed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

/// Ordered task sequence with a persisted monotonic id counter.
///
/// The serialized form is the on-disk snapshot: `schema_version` guards
/// future format changes, `next_id` survives restarts so ids are never
/// reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    pub schema_version: String,
    next_id: u64,
    tasks: Vec<Task>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Repair the id counter after deserializing untrusted data.
    ///
    /// A snapshot whose counter lags behind an existing id would hand
    /// out duplicates; bump it past the maximum instead.
    pub fn normalize(&mut self) {
        let max_id = self.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        if self.next_id <= max_id {
            self.next_id = max_id + 1;
        }
    }

    /// Append a new task with the given text.
    ///
    /// The text is trimmed first; empty input is rejected as a no-op and
    /// `None` is returned. On success the new task (last in the
    /// sequence) is returned.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let task = Task {
            id: self.next_id,
            text: trimmed.to_string(),
            completed: false,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.tasks.push(task);
        self.tasks.last()
    }

    /// Flip the completed flag of the task with this exact id.
    ///
    /// Returns the new completed value, or `None` if the id is absent
    /// (a no-op, not an error).
    pub fn toggle(&mut self, id: u64) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Remove the task with this exact id, returning it if present.
    pub fn remove(&mut self, id: u64) -> Option<Task> {
        let idx = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Remove every completed task, returning how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        before - self.tasks.len()
    }

    /// Number of tasks with `completed = false` (the count display).
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Full sequence in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// The filtered projection, in sequence order.
    pub fn filtered(&self, filter: Filter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}
