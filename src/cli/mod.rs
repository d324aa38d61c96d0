//! Command-line interface for tl
//!
//! This module defines the CLI structure using clap derive macros.
//! The store-facing command handlers live in the `task` submodule.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// tl - task list
///
/// A local task list: add, complete, delete, and filter tasks from the
/// command line or an interactive terminal UI. State lives in a single
/// JSON file.
#[derive(Parser, Debug)]
#[command(name = "tl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task file (defaults to the platform data directory)
    #[arg(long, global = true, env = "TL_FILE")]
    pub file: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task text (multiple words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Toggle a task between active and completed
    Toggle {
        /// Task id
        id: u64,
    },

    /// Remove a task
    Rm {
        /// Task id
        id: u64,
    },

    /// Remove all completed tasks
    Clear,

    /// List tasks
    List {
        /// Filter mode: all, active, or completed
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show the number of active (not completed) tasks
    Count,

    /// Open the interactive terminal UI
    Ui {
        /// Filter mode to start in: all, active, or completed
        #[arg(long)]
        filter: Option<String>,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let options = task::CommonOptions {
            file: self.file,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add { text } => task::run_add(options, text.join(" ")),
            Commands::Toggle { id } => task::run_toggle(options, id),
            Commands::Rm { id } => task::run_rm(options, id),
            Commands::Clear => task::run_clear(options),
            Commands::List { filter } => task::run_list(options, filter),
            Commands::Count => task::run_count(options),
            Commands::Ui { filter } => task::run_ui(options, filter),
        }
    }
}
