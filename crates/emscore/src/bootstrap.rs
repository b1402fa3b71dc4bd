//! Best-effort creation of the on-disk layout described by `AppPaths`.
//!
//! Directory preparation runs before logging is configured, so outcomes are collected in a
//! `DirectoryReport` and replayed into the log once a subscriber exists.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::BootstrapError;
use crate::paths::AppPaths;

#[derive(Debug)]
pub enum DirectoryOutcome {
    Created,
    Existing,
    Failed(BootstrapError),
}

#[derive(Debug, Default)]
pub struct DirectoryReport {
    pub entries: Vec<(PathBuf, DirectoryOutcome)>,
    /// Set when the base directory was empty and nothing was attempted.
    pub skipped: bool,
}

impl DirectoryReport {
    pub fn created(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|(path, outcome)| {
            matches!(outcome, DirectoryOutcome::Created).then_some(path.as_path())
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &BootstrapError)> {
        self.entries.iter().filter_map(|(path, outcome)| match outcome {
            DirectoryOutcome::Failed(err) => Some((path.as_path(), err)),
            _ => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn log(&self) {
        if self.skipped {
            warn!("no home or app-data directory in the environment; skipped directory setup");
            return;
        }

        for (path, outcome) in &self.entries {
            match outcome {
                DirectoryOutcome::Created => {
                    debug!(path = %path.display(), "created EMStudio directory")
                }
                DirectoryOutcome::Existing => {
                    debug!(path = %path.display(), "reusing existing directory")
                }
                DirectoryOutcome::Failed(err) => {
                    warn!(path = %path.display(), error = %err, "directory unavailable; continuing")
                }
            }
        }
    }
}

pub fn prepare_directories(paths: &AppPaths) -> DirectoryReport {
    if !paths.has_base_dir() {
        return DirectoryReport {
            entries: Vec::new(),
            skipped: true,
        };
    }

    let entries = paths
        .required_directories()
        .into_iter()
        .map(|dir| {
            let outcome = match ensure_directory(&dir) {
                Ok(true) => DirectoryOutcome::Created,
                Ok(false) => DirectoryOutcome::Existing,
                Err(err) => DirectoryOutcome::Failed(err),
            };
            (dir, outcome)
        })
        .collect();

    DirectoryReport {
        entries,
        skipped: false,
    }
}

/// Returns `Ok(true)` when the directory had to be created.
fn ensure_directory(path: &Path) -> Result<bool, BootstrapError> {
    if path.exists() {
        if path.is_dir() {
            Ok(false)
        } else {
            Err(BootstrapError::NotADirectory(path.to_path_buf()))
        }
    } else {
        fs::create_dir_all(path).map_err(|source| BootstrapError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }
}
