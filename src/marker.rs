//! Launch marker — carries one pending level path across a relaunch.
//!
//! The marker lives at `<data dir>/editorlaunch.txt` and holds nothing but
//! the path. Reading it consumes it, so a bogus marker can never cause a
//! second relaunch.

use anyhow::{Context, Result};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const MARKER_FILE: &str = "editorlaunch.txt";

#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    /// Store whose marker lives inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(MARKER_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the marker without consuming it.
    pub fn peek(&self) -> Result<Option<String>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(decode(&bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", self.path.display()))
            }
        }
    }

    /// Read the marker and delete it. Returns `None` when there is no marker.
    ///
    /// The file is removed whether or not the path inside turns out to be
    /// usable.
    pub fn read_and_clear(&self) -> Result<Option<String>> {
        let Some(content) = self.peek()? else {
            return Ok(None);
        };
        std::fs::remove_file(&self.path)
            .with_context(|| format!("failed to delete {}", self.path.display()))?;
        Ok(Some(content))
    }

    /// Replace the marker with `level`. The content is synced to disk before
    /// this returns, so the caller may exit right away.
    pub fn write(&self, level: &str) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("marker path has no parent: {}", self.path.display()))?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(level.as_bytes())
            .context("failed to write launch marker")?;
        tmp.as_file()
            .sync_all()
            .context("failed to sync launch marker")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Delete the marker. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("failed to delete {}", self.path.display()))
            }
        }
    }
}

/// `editor-launch marker show` — print the pending level without consuming it.
pub fn show(store: &MarkerStore) -> Result<()> {
    match store.peek()? {
        Some(level) => println!("{level}"),
        None => eprintln!("No pending launch marker."),
    }
    Ok(())
}

/// `editor-launch marker clear` — drop the pending level.
pub fn clear(store: &MarkerStore) -> Result<()> {
    if store.clear()? {
        eprintln!("Removed {}", store.path().display());
    } else {
        eprintln!("No pending launch marker.");
    }
    Ok(())
}

/// Marker content as a path string. Editors like to append a newline.
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
