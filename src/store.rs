//! Persistent task store.
//!
//! `TaskStore` owns the in-memory `TaskList` together with its storage
//! slot and the current filter mode. Every mutating operation runs to
//! completion synchronously: mutate, persist, then the caller re-renders.
//! Operations that change nothing (empty text, absent id, unknown filter
//! mode) are silent no-ops and skip the disk write.

use crate::error::Result;
use crate::storage::Storage;
use crate::task::{Filter, Task, TaskList};

#[derive(Debug)]
pub struct TaskStore {
    storage: Storage,
    list: TaskList,
    filter: Filter,
}

impl TaskStore {
    /// Initialize the store: load from the slot (empty if absent or
    /// malformed).
    pub fn open(storage: Storage) -> Self {
        let list = storage.load();
        Self {
            storage,
            list,
            filter: Filter::All,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Discard in-memory state and re-read the slot.
    pub fn reload(&mut self) {
        self.list = self.storage.load();
    }

    /// Add a task; trimmed-empty text is rejected as a no-op (`None`).
    pub fn add_task(&mut self, text: &str) -> Result<Option<Task>> {
        let Some(task) = self.list.add(text).cloned() else {
            return Ok(None);
        };
        self.storage.save(&self.list)?;
        Ok(Some(task))
    }

    /// Toggle completion; returns the new value, `None` if the id is
    /// absent.
    pub fn toggle_completion(&mut self, id: u64) -> Result<Option<bool>> {
        let Some(completed) = self.list.toggle(id) else {
            return Ok(None);
        };
        self.storage.save(&self.list)?;
        Ok(Some(completed))
    }

    /// Delete by exact id; returns the removed task, `None` if absent.
    pub fn delete_task(&mut self, id: u64) -> Result<Option<Task>> {
        let Some(task) = self.list.remove(id) else {
            return Ok(None);
        };
        self.storage.save(&self.list)?;
        Ok(Some(task))
    }

    /// Remove every completed task; returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let removed = self.list.clear_completed();
        if removed > 0 {
            self.storage.save(&self.list)?;
        }
        Ok(removed)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Set the filter from a mode string; unknown modes are rejected and
    /// the prior mode stays in effect. Returns whether the mode was
    /// accepted.
    pub fn set_filter_str(&mut self, mode: &str) -> bool {
        match Filter::parse(mode) {
            Some(filter) => {
                self.filter = filter;
                true
            }
            None => false,
        }
    }

    /// The rendered projection: the current filter applied in sequence
    /// order.
    pub fn visible(&self) -> Vec<&Task> {
        self.list.filtered(self.filter)
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn find(&self, id: u64) -> Option<&Task> {
        self.list.find(id)
    }

    /// Count of tasks left to do (`completed = false`).
    pub fn active_count(&self) -> usize {
        self.list.active_count()
    }

    pub fn total_count(&self) -> usize {
        self.list.len()
    }
}
