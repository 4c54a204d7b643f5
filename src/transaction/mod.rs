//! Transaction support for atomic store operations
//!
//! Install and uninstall stage their work in a private directory and publish
//! it with a single directory rename. This module records what has to be
//! undone if the operation fails and what has to be cleaned up once it
//! succeeds, and runs those steps synchronously in the caller's stack.
//!
//! ## Usage
//!
//! ```ignore
//! let package = run_transactionally(|tx| {
//!     tx.on_rollback(RollbackStep::RemoveDir(stage.clone()));
//!     restore(&stage)?;
//!     fs::rename(&stage, &target)?;
//!     tx.on_rollback(RollbackStep::RemoveDir(target.clone()));
//!     Ok(target)
//! })?;
//! ```
//!
//! Rollback steps run in reverse registration order when the action returns
//! an error (or unwinds). Commit steps run in registration order after the
//! action returns successfully. Every step tolerates the path already being
//! gone, so repeating a step after a crash is harmless.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;

/// An undo action registered by a transactional operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackStep {
    /// Recursively delete a directory if it exists
    RemoveDir(PathBuf),

    /// Delete a directory only if it exists and is empty
    RemoveDirIfEmpty(PathBuf),

    /// Move a staged directory back to where it came from, recreating the
    /// destination's parent if needed
    MoveBack { staged: PathBuf, original: PathBuf },
}

/// A cleanup action that runs only after the operation succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStep {
    /// Recursively delete a directory if it exists
    RemoveDir(PathBuf),
}

/// Rollback and commit bookkeeping for one operation
#[derive(Debug, Default)]
pub struct Transaction {
    rollback_steps: Vec<RollbackStep>,
    commit_steps: Vec<CommitStep>,
    finished: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an undo action
    pub fn on_rollback(&mut self, step: RollbackStep) {
        self.rollback_steps.push(step);
    }

    /// Register a cleanup action
    pub fn on_commit(&mut self, step: CommitStep) {
        self.commit_steps.push(step);
    }

    /// Run all commit steps. A failing step is logged and does not undo the
    /// operation, which is already visible.
    pub fn commit(mut self) {
        self.finished = true;
        for step in std::mem::take(&mut self.commit_steps) {
            if let Err(e) = apply_commit(&step) {
                warn!("Commit step {:?} failed: {}", step, e);
            }
        }
    }

    /// Run all rollback steps, newest first
    pub fn rollback(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        while let Some(step) = self.rollback_steps.pop() {
            debug!("Rolling back: {:?}", step);
            if let Err(e) = apply_rollback(&step) {
                warn!("Rollback step {:?} failed: {}", step, e);
            }
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        // Reached with unfinished work only when the action unwound
        if !self.finished {
            self.rollback();
        }
    }
}

/// Run `action` transactionally
///
/// Rollback steps registered by `action` run if it returns an error; commit
/// steps run only after it returns successfully. The action's error is
/// returned unchanged after rollback.
pub fn run_transactionally<T, F>(action: F) -> Result<T>
where
    F: FnOnce(&mut Transaction) -> Result<T>,
{
    let mut transaction = Transaction::new();
    match action(&mut transaction) {
        Ok(value) => {
            transaction.commit();
            Ok(value)
        }
        Err(e) => {
            debug!("Transaction failed, rolling back: {}", e);
            transaction.rollback();
            Err(e)
        }
    }
}

fn apply_rollback(step: &RollbackStep) -> std::io::Result<()> {
    match step {
        RollbackStep::RemoveDir(path) => remove_dir_if_exists(path),
        RollbackStep::RemoveDirIfEmpty(path) => remove_dir_if_empty(path),
        RollbackStep::MoveBack { staged, original } => {
            if !staged.exists() {
                return Ok(());
            }
            if let Some(parent) = original.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(staged, original)
        }
    }
}

fn apply_commit(step: &CommitStep) -> std::io::Result<()> {
    match step {
        CommitStep::RemoveDir(path) => remove_dir_if_exists(path),
    }
}

fn remove_dir_if_exists(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}

/// Remove `path` when it is an empty directory
pub fn remove_dir_if_empty(path: &Path) -> std::io::Result<()> {
    if path.is_dir() && fs::read_dir(path)?.next().is_none() {
        fs::remove_dir(path)?;
    }
    Ok(())
}
