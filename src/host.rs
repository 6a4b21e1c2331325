use anyhow::Result;
use std::path::Path;

/// The editor application the launch flow drives.
pub trait Host {
    /// Skip the content the editor would open on its own at startup.
    fn suppress_default_startup_content(&mut self);

    /// Undo [`Host::suppress_default_startup_content`] after a failed open.
    fn restore_default_startup_content(&mut self);

    /// Open a level document directly.
    fn open_document(&mut self, path: &Path) -> Result<()>;

    /// Unpack a level package and open the level inside it. Runs as a
    /// background task the host owns; callers do not wait for it.
    fn open_archive_async(&mut self, path: &Path);

    /// Remove the startup override so later startups behave normally.
    fn release_startup_override(&mut self);

    /// Terminate the process.
    fn quit_process(&self) -> !;
}
