//! Common test utilities for Toolpack integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway feed, store, cache and project directory
pub struct TestEnv {
    /// Keeps the directories alive for the test
    pub temp: TempDir,
    pub feed: PathBuf,
    pub store: PathBuf,
    pub cache: PathBuf,
    pub project: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        let env = Self {
            feed: root.join("feed"),
            store: root.join("store"),
            cache: root.join("cache"),
            project: root.join("project"),
            temp,
        };
        fs::create_dir_all(&env.feed).expect("Failed to create feed");
        fs::create_dir_all(&env.project).expect("Failed to create project");
        env
    }

    /// A toolpack command wired to this environment, run from the project
    #[allow(deprecated)]
    pub fn toolpack(&self) -> Command {
        let mut cmd = Command::cargo_bin("toolpack").expect("Failed to find toolpack binary");
        cmd.current_dir(&self.project)
            .env_remove("RUST_LOG")
            .env_remove("TOOLPACK_HOME")
            .arg("--store")
            .arg(&self.store)
            .arg("--cache")
            .arg(&self.cache)
            .arg("--feed")
            .arg(&self.feed);
        cmd
    }

    /// Publish a package to the feed with one entry point per command
    pub fn publish(&self, id: &str, version: &str, commands: &[&str]) -> PathBuf {
        self.publish_for(id, version, "net8.0", "any", commands)
    }

    pub fn publish_for(
        &self,
        id: &str,
        version: &str,
        framework: &str,
        runtime: &str,
        commands: &[&str],
    ) -> PathBuf {
        let asset_dir = self
            .feed
            .join(id)
            .join(version)
            .join("tools")
            .join(framework)
            .join(runtime);
        fs::create_dir_all(&asset_dir).expect("Failed to create package directory");

        let mut settings = String::from("version: 1\ncommands:\n");
        for command in commands {
            settings.push_str(&format!(
                "  - name: {command}\n    entryPoint: bin/{command}.dll\n"
            ));
            write_file(&asset_dir.join("bin").join(format!("{command}.dll")), "binary");
        }
        write_file(&asset_dir.join("ToolSettings.yaml"), &settings);

        asset_dir
    }

    /// A second feed directory next to the default one
    pub fn extra_feed(&self, name: &str) -> PathBuf {
        let dir = self.temp.path().join(name);
        fs::create_dir_all(&dir).expect("Failed to create feed");
        dir
    }

    /// Publish a package to an arbitrary feed directory
    pub fn publish_to(&self, feed: &Path, id: &str, version: &str, commands: &[&str]) {
        let asset_dir = feed.join(id).join(version).join("tools/net8.0/any");
        fs::create_dir_all(&asset_dir).expect("Failed to create package directory");

        let mut settings = String::from("version: 1\ncommands:\n");
        for command in commands {
            settings.push_str(&format!(
                "  - name: {command}\n    entryPoint: bin/{command}.dll\n"
            ));
            write_file(&asset_dir.join("bin").join(format!("{command}.dll")), "binary");
        }
        write_file(&asset_dir.join("ToolSettings.yaml"), &settings);
    }

    /// Write `.config/toolpack-tools.json` in the project
    pub fn write_manifest(&self, content: &str) -> PathBuf {
        let path = self.project.join(".config").join("toolpack-tools.json");
        write_file(&path, content);
        path
    }

    pub fn package_dir(&self, id: &str, version: &str) -> PathBuf {
        self.store.join(id).join(version)
    }

    pub fn cache_file(&self, id: &str) -> PathBuf {
        self.cache.join("1").join(format!("{id}.json"))
    }

    /// Files left in the store's staging folder
    pub fn staged_entries(&self) -> usize {
        fs::read_dir(self.store.join(".stage"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write file");
}
