//! tl - Task List Library
//!
//! This library provides the core functionality for the tl CLI tool,
//! a local task list with a single-file storage slot.
//!
//! # Core Concepts
//!
//! - **Tasks**: Text items with a monotonic numeric id, never reused
//! - **Single Slot**: All state persists through one JSON file
//! - **Silent No-ops**: Invalid input (empty text, absent ids, unknown
//!   filter modes) changes nothing instead of failing
//! - **Filters**: Process-local views over the list, never persisted
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tl.toml`
//! - `error`: Error types and result aliases
//! - `output`: JSON envelopes and human-readable formatting
//! - `task`: Task model, filter modes, and the in-memory list
//! - `store`: Persistent store combining list, slot, and filter
//! - `storage`: Slot resolution and atomic file persistence
//! - `ui`: Interactive terminal UI using ratatui

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
