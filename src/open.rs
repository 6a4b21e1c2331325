//! `editor-launch open` — Open a level in the editor, relaunching via Steam if needed.
//!
//! Usage: editor-launch open [ARGS]...
//!
//! 1. Consumes a pending launch marker, else takes the first level in ARGS
//! 2. Not started by Steam: saves the level to the marker, opens
//!    `steam://launch/<app id>` and exits
//! 3. Otherwise opens the level (packages are unpacked first)
//! 4. Nothing to open: opens the configured default level

use anyhow::Result;
use std::ffi::OsString;
use tracing::{debug, error};

use crate::config::Config;
use crate::editor::EditorHost;
use crate::launcher::{AlwaysTracked, SessionTracker, SteamEnv, UriLauncher};
use crate::marker::MarkerStore;
use crate::startup::{Outcome, Startup};

const PROGRAM: &str = env!("CARGO_PKG_NAME");

pub fn run(args: Vec<OsString>, config: &Config) -> Result<()> {
    let store = MarkerStore::in_dir(&config.data_dir());
    debug!("Marker path is {}", store.path().display());

    let program = std::env::args_os()
        .next()
        .unwrap_or_else(|| OsString::from(PROGRAM));
    let argv: Vec<OsString> = std::iter::once(program).chain(args).collect();

    let tracker: Box<dyn SessionTracker> = if config.relaunch_with_launcher {
        Box::new(SteamEnv::from_env(config.app_id))
    } else {
        Box::new(AlwaysTracked)
    };
    let launcher = UriLauncher::new(config.launcher_uri());
    debug!("Relaunch URI is {}", launcher.uri());
    let mut host = EditorHost::from_config(config);

    match Startup::new(&store).run(&argv, &*tracker, &launcher, &mut host) {
        Ok(Outcome::HandedOff(intent)) => {
            debug!(
                "Handed off {}; startup override active: {}",
                intent.path().display(),
                host.override_active()
            );
        }
        Ok(_) => {}
        // The level is lost for this run; the editor still starts normally.
        Err(err) => error!("Relaunch aborted: {err:#}"),
    }

    host.load_default_content()?;
    for level in host.wait_for_tasks() {
        debug!("Package level ready at {}", level.display());
    }
    Ok(())
}
