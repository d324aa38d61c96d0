use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary working directory with its own task file.
///
/// Commands run with `TL_FILE` pointing into the directory so tests never
/// touch the real platform data directory.
pub struct TestSlot {
    dir: TempDir,
}

impl TestSlot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    #[allow(dead_code)]
    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(".tl.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    #[allow(dead_code)]
    pub fn write_tasks_raw(&self, contents: &str) -> std::io::Result<()> {
        fs::write(self.tasks_file(), contents)
    }

    #[allow(dead_code)]
    pub fn read_tasks_raw(&self) -> std::io::Result<String> {
        fs::read_to_string(self.tasks_file())
    }
}

pub fn tl_cmd(slot: &TestSlot) -> Command {
    let mut cmd = Command::cargo_bin("tl").expect("binary");
    cmd.current_dir(slot.path());
    cmd.env("TL_FILE", slot.tasks_file());
    cmd
}
