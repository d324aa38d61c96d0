//! Storage layer for tl
//!
//! The entire persistent state is one JSON document (the task snapshot)
//! at a single fixed path. Load and save both go through `Storage::path`
//! so the read and write locations can never diverge.
//!
//! Path resolution precedence:
//! 1. explicit override (`--file` flag or `TL_FILE` env)
//! 2. `storage.path` in `.tl.toml`
//! 3. the platform data directory (`ProjectDirs`), e.g.
//!    `~/.local/share/tl/tasks.json` on Linux

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::warn;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::task::TaskList;

/// File name of the task snapshot within the data directory
pub const TASKS_FILE: &str = "tasks.json";

/// Storage manager for the task snapshot
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Storage rooted at an explicit snapshot path
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolve the snapshot path from override, config, or platform default
    pub fn resolve(file_override: Option<PathBuf>, config: &Config) -> Result<Self> {
        if let Some(path) = file_override {
            return Ok(Self::at(path));
        }
        if let Some(path) = config.storage.path.clone() {
            return Ok(Self::at(path));
        }
        let dirs = ProjectDirs::from("", "", "tl").ok_or(Error::NoDataDir)?;
        Ok(Self::at(dirs.data_dir().join(TASKS_FILE)))
    }

    /// The single path used for both load and save
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the task snapshot.
    ///
    /// An absent file is a fresh store; a malformed file is treated as
    /// absence of data (empty store) rather than an error, with a
    /// warning so corruption is not silently invisible.
    pub fn load(&self) -> TaskList {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return TaskList::new(),
        };

        match serde_json::from_str::<TaskList>(&content) {
            Ok(mut list) => {
                list.normalize();
                list
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "malformed task file, starting empty");
                TaskList::new()
            }
        }
    }

    /// Save the task snapshot atomically (write to temp, then rename).
    pub fn save(&self, list: &TaskList) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(list)?;
        let temp_path = self.path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_path, &self.path).map_err(|_| Error::WriteFailed(self.path.clone()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_in(temp: &TempDir) -> Storage {
        Storage::at(temp.path().join(TASKS_FILE))
    }

    #[test]
    fn resolve_prefers_override_over_config() {
        let mut config = Config::default();
        config.storage.path = Some(PathBuf::from("/tmp/from-config.json"));

        let storage =
            Storage::resolve(Some(PathBuf::from("/tmp/from-flag.json")), &config).unwrap();
        assert_eq!(storage.path(), Path::new("/tmp/from-flag.json"));

        let storage = Storage::resolve(None, &config).unwrap();
        assert_eq!(storage.path(), Path::new("/tmp/from-config.json"));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        let list = storage.load();
        assert!(list.is_empty());
        assert_eq!(list.next_id(), 1);
    }

    #[test]
    fn load_malformed_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        fs::write(storage.path(), "{ not json").unwrap();

        let list = storage.load();
        assert!(list.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);

        let mut list = TaskList::new();
        let id = list.add("Persisted").expect("task").id;
        list.toggle(id);
        storage.save(&list).unwrap();

        let restored = storage.load();
        assert_eq!(restored.tasks(), list.tasks());
        assert_eq!(restored.next_id(), list.next_id());
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::at(temp.path().join("nested/dir/tasks.json"));

        storage.save(&TaskList::new()).unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn load_repairs_stale_counter() {
        let temp = TempDir::new().unwrap();
        let storage = storage_in(&temp);
        fs::write(
            storage.path(),
            r#"{
                "schema_version": "tl.tasks.v1",
                "next_id": 2,
                "tasks": [
                    {"id": 5, "text": "A", "completed": false, "created_at": "2025-01-12T12:34:56Z"}
                ]
            }"#,
        )
        .unwrap();

        let list = storage.load();
        assert_eq!(list.next_id(), 6);
    }
}
