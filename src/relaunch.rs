//! Decide whether this run must hand off to Steam before opening a level.

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::launcher::{Launcher, SessionTracker};
use crate::marker::MarkerStore;
use crate::resolve::LaunchIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open the level in this process.
    ProceedDirectly,
    /// The marker is written and Steam was asked to start a new instance.
    /// The caller must exit now.
    RelaunchedAndExiting,
}

pub struct RelaunchCoordinator<'a> {
    store: &'a MarkerStore,
    handled: bool,
}

impl<'a> RelaunchCoordinator<'a> {
    pub fn new(store: &'a MarkerStore) -> Self {
        Self {
            store,
            handled: false,
        }
    }

    /// Decide what to do with `intent`. Returns `None` once a decision has
    /// already been made in this process.
    ///
    /// A failed marker write is returned as an error before Steam is
    /// touched; the run may then be retried.
    pub fn coordinate(
        &mut self,
        intent: &LaunchIntent,
        tracker: &dyn SessionTracker,
        launcher: &dyn Launcher,
    ) -> Result<Option<Action>> {
        if self.handled {
            return Ok(None);
        }

        if tracker.is_tracked() {
            self.handled = true;
            return Ok(Some(Action::ProceedDirectly));
        }

        warn!("Not launched with Steam, relaunching");
        let target = std::path::absolute(intent.path()).with_context(|| {
            format!("failed to resolve {}", intent.path().display())
        })?;
        self.store
            .write(&target.to_string_lossy())
            .context("failed to persist launch intent, not relaunching")?;
        self.handled = true;
        info!("Saved {} to {}", target.display(), self.store.path().display());

        // The marker is durable now; a manual start picks it up if Steam
        // never comes back.
        if let Err(err) = launcher.launch() {
            error!("Failed to hand off to Steam: {err:#}");
        }
        Ok(Some(Action::RelaunchedAndExiting))
    }
}
