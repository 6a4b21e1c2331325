//! Level candidate validation.
//!
//! A candidate is openable when its extension names a known [`FileKind`] and
//! it is an existing, readable regular file.

use std::fmt;
use std::fs::File;
use std::path::Path;

use tracing::debug;

/// What kind of content a level path points at, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A level document opened directly (`.rdlevel`).
    SingleFile,
    /// A compressed package containing a level document (`.rdzip`, `.zip`).
    PackageArchive,
}

impl FileKind {
    /// Map a path's extension to a kind. Matching ignores ASCII case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("rdlevel") {
            Some(FileKind::SingleFile)
        } else if ext.eq_ignore_ascii_case("rdzip") || ext.eq_ignore_ascii_case("zip") {
            Some(FileKind::PackageArchive)
        } else {
            None
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::SingleFile => f.write_str("level"),
            FileKind::PackageArchive => f.write_str("package"),
        }
    }
}

/// Classify a candidate, returning its kind only if it can be opened.
pub fn classify(path: &Path) -> Option<FileKind> {
    debug!("Checking {}", path.display());

    let Some(kind) = FileKind::from_path(path) else {
        debug!("Extension check failed");
        return None;
    };
    debug!("Extension check passed ({kind})");

    // is_file() follows symlinks and rejects directories named like levels.
    if !path.is_file() {
        debug!("Exist check failed");
        return None;
    }
    if let Err(err) = File::open(path) {
        debug!("Read check failed: {err}");
        return None;
    }

    debug!("Exist check passed");
    Some(kind)
}

/// Whether a candidate is an openable level file.
pub fn is_valid(path: &Path) -> bool {
    classify(path).is_some()
}

/// `editor-launch check` — report whether `path` can be opened.
pub fn check(path: &Path) {
    match classify(path) {
        Some(kind) => println!("{kind}"),
        None => {
            eprintln!("Not an openable level: {}", path.display());
            std::process::exit(1);
        }
    }
}
