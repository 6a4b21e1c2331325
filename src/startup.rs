//! One process run of the launch flow: resolve, relaunch or hand off.
//!
//! ```text
//! resolve ── none ──────────────────────────────▶ Inert (default content)
//!    │
//!    └─ intent ── untracked ── write marker, launch Steam ─▶ Relaunching (exit)
//!                 tracked ──── suppress default, open level ─▶ HandedOff
//! ```

use anyhow::Result;
use std::ffi::OsStr;
use tracing::info;

use crate::handoff::EditorHandoff;
use crate::host::Host;
use crate::launcher::{Launcher, SessionTracker};
use crate::marker::MarkerStore;
use crate::relaunch::{Action, RelaunchCoordinator};
use crate::resolve::{LaunchIntent, Resolver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to open; the host keeps its default behaviour.
    Inert,
    /// Steam was asked to start a tracked instance; this one must exit.
    Relaunching,
    /// The level was dispatched to the host.
    HandedOff(LaunchIntent),
}

/// Drives the launch flow for one process. Build exactly one per process:
/// the one-shot guards live on the instance.
pub struct Startup<'a> {
    store: &'a MarkerStore,
    coordinator: RelaunchCoordinator<'a>,
    handoff: EditorHandoff,
    started: bool,
}

impl<'a> Startup<'a> {
    pub fn new(store: &'a MarkerStore) -> Self {
        Self {
            store,
            coordinator: RelaunchCoordinator::new(store),
            handoff: EditorHandoff::default(),
            started: false,
        }
    }

    /// Run the flow, exiting the process if a relaunch was started.
    pub fn run<S: AsRef<OsStr>>(
        &mut self,
        args: &[S],
        tracker: &dyn SessionTracker,
        launcher: &dyn Launcher,
        host: &mut dyn Host,
    ) -> Result<Outcome> {
        let outcome = self.on_startup(args, tracker, launcher, host)?;
        if outcome == Outcome::Relaunching {
            info!("Quitting so Steam can start the editor");
            host.quit_process();
        }
        Ok(outcome)
    }

    /// Decide and dispatch, without terminating the process.
    ///
    /// Only the first call does anything; the host may fire its startup hook
    /// more than once.
    pub fn on_startup<S: AsRef<OsStr>>(
        &mut self,
        args: &[S],
        tracker: &dyn SessionTracker,
        launcher: &dyn Launcher,
        host: &mut dyn Host,
    ) -> Result<Outcome> {
        if self.started {
            return Ok(Outcome::Inert);
        }
        self.started = true;

        let Some(intent) = Resolver::new(self.store).resolve(args) else {
            return Ok(Outcome::Inert);
        };
        info!(
            "Launched with {} {} (from {:?})",
            intent.kind(),
            intent.path().display(),
            intent.source()
        );

        match self.coordinator.coordinate(&intent, tracker, launcher)? {
            Some(Action::RelaunchedAndExiting) => Ok(Outcome::Relaunching),
            Some(Action::ProceedDirectly) => {
                if self.handoff.apply(&intent, host) {
                    Ok(Outcome::HandedOff(intent))
                } else {
                    Ok(Outcome::Inert)
                }
            }
            None => Ok(Outcome::Inert),
        }
    }
}
