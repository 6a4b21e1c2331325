//! The editor host driven by the command line.
//!
//! Documents go to the configured editor command (or to stdout when none is
//! configured). Packages are unpacked under `<data dir>/packages/<stem>/` on
//! a worker thread, then the level inside is opened the same way.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::thread::JoinHandle;
use tracing::{debug, error, info, warn};
use zip::ZipArchive;

use crate::config::{Config, EditorConfig};
use crate::host::Host;
use crate::level::{self, FileKind};

const PATH_PLACEHOLDER: &str = "{path}";

pub struct EditorHost {
    editor: Option<EditorConfig>,
    default_level: Option<PathBuf>,
    packages_dir: PathBuf,
    suppressed: bool,
    override_active: bool,
    tasks: Vec<JoinHandle<Result<PathBuf>>>,
}

impl EditorHost {
    pub fn new(
        editor: Option<EditorConfig>,
        default_level: Option<PathBuf>,
        data_dir: &Path,
    ) -> Self {
        Self {
            editor,
            default_level,
            packages_dir: data_dir.join("packages"),
            suppressed: false,
            override_active: true,
            tasks: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.editor.clone(),
            config.default_level.clone(),
            &config.data_dir(),
        )
    }

    /// Open the configured default level unless a launch target replaced it.
    pub fn load_default_content(&mut self) -> Result<()> {
        if self.suppressed {
            debug!("Default content suppressed");
            return Ok(());
        }
        let Some(level) = self.default_level.clone() else {
            return Ok(());
        };
        if !level::is_valid(&level) {
            warn!("Default level {} is not openable", level.display());
            return Ok(());
        }
        self.open_document(&level)
    }

    /// Whether the startup override is still installed.
    pub fn override_active(&self) -> bool {
        self.override_active
    }

    /// Join every background task. Returns the levels that were opened.
    pub fn wait_for_tasks(&mut self) -> Vec<PathBuf> {
        let mut opened = Vec::new();
        for task in self.tasks.drain(..) {
            match task.join() {
                Ok(Ok(level)) => opened.push(level),
                Ok(Err(err)) => error!("Failed to open package: {err:#}"),
                Err(_) => error!("Package task panicked"),
            }
        }
        opened
    }
}

impl Host for EditorHost {
    fn suppress_default_startup_content(&mut self) {
        self.suppressed = true;
    }

    fn restore_default_startup_content(&mut self) {
        self.suppressed = false;
    }

    fn open_document(&mut self, path: &Path) -> Result<()> {
        open_with(self.editor.as_ref(), path)
    }

    fn open_archive_async(&mut self, path: &Path) {
        let package = path.to_path_buf();
        let packages_dir = self.packages_dir.clone();
        let editor = self.editor.clone();
        let spawned = std::thread::Builder::new()
            .name("open-package".to_string())
            .spawn(move || -> Result<PathBuf> {
                let level = unpack(&package, &packages_dir)?;
                open_with(editor.as_ref(), &level)?;
                Ok(level)
            });
        match spawned {
            Ok(task) => self.tasks.push(task),
            Err(err) => error!("Failed to start package task: {err}"),
        }
    }

    fn release_startup_override(&mut self) {
        self.override_active = false;
    }

    fn quit_process(&self) -> ! {
        std::process::exit(0)
    }
}

fn open_with(editor: Option<&EditorConfig>, level: &Path) -> Result<()> {
    let Some(editor) = editor else {
        println!("{}", level.display());
        return Ok(());
    };

    let level_arg = level.to_string_lossy();
    let mut args: Vec<String> = editor
        .args
        .iter()
        .map(|arg| arg.replace(PATH_PLACEHOLDER, &level_arg))
        .collect();
    if !editor.args.iter().any(|arg| arg.contains(PATH_PLACEHOLDER)) {
        args.push(level_arg.into_owned());
    }

    debug!("Running {} {:?}", editor.command, args);
    Command::new(&editor.command)
        .args(&args)
        .spawn()
        .with_context(|| format!("failed to start editor `{}`", editor.command))?;
    eprintln!("Opened {}", level.display());
    Ok(())
}

/// Unpack `package` into its own folder under `packages_dir` and return the
/// path of the level document inside.
pub fn unpack(package: &Path, packages_dir: &Path) -> Result<PathBuf> {
    let dest = package_dest(package, packages_dir)?;

    let file = File::open(package)
        .with_context(|| format!("failed to open {}", package.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("not a level package: {}", package.display()))?;
    let level = find_level(archive.file_names())
        .ok_or_else(|| anyhow::anyhow!("no level found in {}", package.display()))?;

    // Stale files from an older version of the package must not survive.
    if dest.exists() {
        std::fs::remove_dir_all(&dest)
            .with_context(|| format!("failed to clear {}", dest.display()))?;
    }
    std::fs::create_dir_all(&dest)
        .with_context(|| format!("failed to create {}", dest.display()))?;
    archive
        .extract(&dest)
        .with_context(|| format!("failed to unpack {}", package.display()))?;

    info!("Unpacked {} to {}", package.display(), dest.display());
    Ok(dest.join(level))
}

/// The folder a package unpacks into: one plain path component under
/// `packages_dir`, named after the package's stem.
fn package_dest(package: &Path, packages_dir: &Path) -> Result<PathBuf> {
    let stem = package
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("package has no name: {}", package.display()))?;
    let mut components = Path::new(stem).components();
    let (Some(Component::Normal(name)), None) = (components.next(), components.next()) else {
        anyhow::bail!("unusable package name: {}", package.display());
    };
    let dest = packages_dir.join(name);
    if dest.parent() != Some(packages_dir) {
        anyhow::bail!("package folder escapes {}", packages_dir.display());
    }
    Ok(dest)
}

/// Pick the level document in a package: shallowest first, then by name.
fn find_level<'a>(names: impl Iterator<Item = &'a str>) -> Option<PathBuf> {
    names
        .filter(|name| !name.ends_with('/'))
        .map(PathBuf::from)
        .filter(|path| path.components().all(|c| matches!(c, Component::Normal(_))))
        .filter(|path| FileKind::from_path(path) == Some(FileKind::SingleFile))
        .min_by(|a, b| {
            a.components()
                .count()
                .cmp(&b.components().count())
                .then_with(|| a.cmp(b))
        })
}
