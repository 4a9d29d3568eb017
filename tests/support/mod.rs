#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const BOARD_JSON: &str = r#"{
  "tickets": [
    {"id": "CAM-1", "title": "Update User Profile Page UI", "tag": ["Feature request"],
     "userId": "usr-1", "status": "Todo", "priority": 4},
    {"id": "CAM-2", "title": "Add Multi-Language Support", "tag": ["Feature Request"],
     "userId": "usr-2", "status": "In progress", "priority": 3},
    {"id": "CAM-3", "title": "Optimize Database Queries for Performance", "tag": ["Feature Request"],
     "userId": "usr-2", "status": "In progress", "priority": 1},
    {"id": "CAM-4", "title": "Implement Email Notification System", "tag": ["Feature Request"],
     "userId": "usr-1", "status": "In progress", "priority": 3},
    {"id": "CAM-5", "title": "Enhance Search Functionality", "tag": ["Feature Request"],
     "userId": "usr-5", "status": "Todo", "priority": 0},
    {"id": "CAM-6", "title": "Third-Party Payment Gateway",
     "userId": "usr-2", "status": "Backlog", "priority": 2}
  ],
  "users": [
    {"id": "usr-1", "name": "Anoop sharma", "available": false},
    {"id": "usr-2", "name": "Yogesh", "available": true}
  ]
}"#;

/// Isolated home for one test: config dir, preference file and board data.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let env = Self { dir };
        env.write_file("board.json", BOARD_JSON)
            .expect("write board fixture");
        env
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self) -> PathBuf {
        self.path().join("board.json")
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.path().join("prefs").join("preferences.toml")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// `kanban` with config and preferences pinned inside the tempdir.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("kanban").expect("binary");
        cmd.env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env_remove("KANBAN_CONFIG")
            .env_remove("KANBAN_ENDPOINT")
            .env_remove("RUST_LOG")
            .env("KANBAN_PREFS", self.prefs_path());
        cmd
    }

    /// `kanban --data board.json`
    pub fn data_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--data").arg(self.data_path());
        cmd
    }
}

pub fn parse_json(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).expect("valid json output")
}

/// Card ids of each column, in display order.
pub fn column_ids(report: &serde_json::Value) -> Vec<(String, Vec<String>)> {
    report["data"]["board"]["columns"]
        .as_array()
        .expect("columns")
        .iter()
        .map(|column| {
            let title = column["title"].as_str().expect("title").to_string();
            let ids = column["cards"]
                .as_array()
                .expect("cards")
                .iter()
                .map(|card| card["id"].as_str().expect("id").to_string())
                .collect();
            (title, ids)
        })
        .collect()
}
