//! Open the resolved level in the editor instead of its default content.

use tracing::{error, info};

use crate::host::Host;
use crate::level::FileKind;
use crate::resolve::LaunchIntent;

pub struct EditorHandoff {
    active: bool,
}

impl Default for EditorHandoff {
    fn default() -> Self {
        Self { active: true }
    }
}

impl EditorHandoff {
    /// Dispatch `intent` to the host. Returns whether anything was
    /// dispatched; after the first success the handoff stays inert.
    pub fn apply(&mut self, intent: &LaunchIntent, host: &mut dyn Host) -> bool {
        if !self.active {
            return false;
        }

        host.suppress_default_startup_content();
        let path = intent.path();
        match intent.kind() {
            FileKind::SingleFile => {
                if let Err(err) = host.open_document(path) {
                    error!("Failed to open {}: {err:#}", path.display());
                    host.restore_default_startup_content();
                    return false;
                }
            }
            FileKind::PackageArchive => host.open_archive_async(path),
        }
        info!("Opened {} {} in the editor", intent.kind(), path.display());

        host.release_startup_override();
        self.active = false;
        true
    }
}
