//! Task command handlers: add, toggle, rm, clear, list, count, ui.
//!
//! Each handler opens the store over the resolved task file, applies one
//! operation, and emits a report. Invalid input (empty text, absent id,
//! unknown filter mode) is a no-op with a warning, never a failure: the
//! store's silent-no-op policy surfaces here as exit code 0.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;
use crate::storage::Storage;
use crate::task::Task;

/// Global options shared by every subcommand
pub struct CommonOptions {
    pub file: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl CommonOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

fn open_store(file: Option<PathBuf>) -> Result<(TaskStore, Config)> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load_from_dir(&cwd);
    let storage = Storage::resolve(file, &config)?;
    Ok((TaskStore::open(storage), config))
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{mark}] {:>4}  {}", task.id, task.text)
}

#[derive(serde::Serialize)]
struct AddReport {
    added: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
    active: usize,
}

pub fn run_add(options: CommonOptions, text: String) -> Result<()> {
    let (mut store, _config) = open_store(options.file.clone())?;

    let task = store.add_task(&text)?;
    let report = AddReport {
        added: task.is_some(),
        task: task.clone(),
        active: store.active_count(),
    };

    let mut human = match &task {
        Some(task) => {
            let mut human = HumanOutput::new(format!("Added task {}", task.id));
            human.push_summary("text", task.text.clone());
            human
        }
        None => {
            let mut human = HumanOutput::new("Nothing added");
            human.push_warning("task text is empty after trimming");
            human
        }
    };
    human.push_summary("active", report.active.to_string());

    emit_success(options.output(), "add", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct ToggleReport {
    id: u64,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
    active: usize,
}

pub fn run_toggle(options: CommonOptions, id: u64) -> Result<()> {
    let (mut store, _config) = open_store(options.file.clone())?;

    let completed = store.toggle_completion(id)?;
    let report = ToggleReport {
        id,
        found: completed.is_some(),
        completed,
        active: store.active_count(),
    };

    let mut human = match completed {
        Some(true) => HumanOutput::new(format!("Task {id} completed")),
        Some(false) => HumanOutput::new(format!("Task {id} active again")),
        None => {
            let mut human = HumanOutput::new("Nothing toggled");
            human.push_warning(format!("no task with id {id}"));
            human
        }
    };
    human.push_summary("active", report.active.to_string());

    emit_success(options.output(), "toggle", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct RmReport {
    id: u64,
    removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
    remaining: usize,
}

pub fn run_rm(options: CommonOptions, id: u64) -> Result<()> {
    let (mut store, _config) = open_store(options.file.clone())?;

    let task = store.delete_task(id)?;
    let report = RmReport {
        id,
        removed: task.is_some(),
        task: task.clone(),
        remaining: store.total_count(),
    };

    let human = match &task {
        Some(task) => {
            let mut human = HumanOutput::new(format!("Removed task {id}"));
            human.push_summary("text", task.text.clone());
            human
        }
        None => {
            let mut human = HumanOutput::new("Nothing removed");
            human.push_warning(format!("no task with id {id}"));
            human
        }
    };

    emit_success(options.output(), "rm", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct ClearReport {
    removed: usize,
    remaining: usize,
}

pub fn run_clear(options: CommonOptions) -> Result<()> {
    let (mut store, _config) = open_store(options.file.clone())?;

    let removed = store.clear_completed()?;
    let report = ClearReport {
        removed,
        remaining: store.total_count(),
    };

    let mut human = HumanOutput::new(format!("Cleared {removed} completed task(s)"));
    human.push_summary("remaining", report.remaining.to_string());

    emit_success(options.output(), "clear", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct ListReport {
    filter: &'static str,
    total: usize,
    shown: usize,
    active: usize,
    tasks: Vec<Task>,
}

pub fn run_list(options: CommonOptions, filter: Option<String>) -> Result<()> {
    let (mut store, config) = open_store(options.file.clone())?;

    store.set_filter(config.default_filter());
    let mut unknown_mode = None;
    if let Some(mode) = filter {
        if !store.set_filter_str(&mode) {
            unknown_mode = Some(mode);
        }
    }

    let visible: Vec<Task> = store.visible().into_iter().cloned().collect();
    let report = ListReport {
        filter: store.filter().label(),
        total: store.total_count(),
        shown: visible.len(),
        active: store.active_count(),
        tasks: visible,
    };

    let header = if report.total == 0 {
        "No tasks".to_string()
    } else {
        format!("Tasks ({})", report.filter)
    };
    let mut human = HumanOutput::new(header);
    for task in &report.tasks {
        human.push_detail(task_line(task));
    }
    human.push_summary("active", report.active.to_string());
    human.push_summary("total", report.total.to_string());
    if let Some(mode) = unknown_mode {
        human.push_warning(format!(
            "unknown filter mode '{mode}' ignored (showing {})",
            report.filter
        ));
    }

    emit_success(options.output(), "list", &report, Some(&human))
}

#[derive(serde::Serialize)]
struct CountReport {
    active: usize,
    total: usize,
}

pub fn run_count(options: CommonOptions) -> Result<()> {
    let (store, _config) = open_store(options.file.clone())?;

    let report = CountReport {
        active: store.active_count(),
        total: store.total_count(),
    };

    if options.json {
        return emit_success(options.output(), "count", &report, None);
    }

    // bare number for scripting, like `wc -l`
    if !options.quiet {
        println!("{}", report.active);
    }
    Ok(())
}

pub fn run_ui(options: CommonOptions, filter: Option<String>) -> Result<()> {
    let (mut store, config) = open_store(options.file.clone())?;

    store.set_filter(config.default_filter());
    if let Some(mode) = filter {
        store.set_filter_str(&mode);
    }

    crate::ui::run(store)
}
