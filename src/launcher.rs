//! Steam integration: is this run tracked, and how to relaunch through it.

use anyhow::{Context, Result};
use tracing::debug;

/// Rhythm Doctor's Steam app id.
pub const DEFAULT_APP_ID: u32 = 774181;

/// Environment variables Steam sets for processes it launches.
const STEAM_ENV_VARS: [&str; 2] = ["SteamAppId", "SteamGameId"];

/// Reports whether the current run is attached to the launcher's tracking.
pub trait SessionTracker {
    fn is_tracked(&self) -> bool;
}

/// Starts a fresh, tracked instance. Fire-and-forget.
pub trait Launcher {
    fn launch(&self) -> Result<()>;
}

/// Tracking check based on the launch environment Steam provides.
#[derive(Debug, Clone)]
pub struct SteamEnv {
    app_id: u32,
    seen: Vec<String>,
}

impl SteamEnv {
    pub fn from_env(app_id: u32) -> Self {
        let seen = STEAM_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .collect();
        Self::new(app_id, seen)
    }

    pub fn new(app_id: u32, seen: Vec<String>) -> Self {
        Self { app_id, seen }
    }
}

impl SessionTracker for SteamEnv {
    fn is_tracked(&self) -> bool {
        let want = self.app_id.to_string();
        let tracked = self.seen.iter().any(|id| id.trim() == want);
        debug!("Steam session tracked: {tracked} (ids seen: {:?})", self.seen);
        tracked
    }
}

/// Used when relaunching is disabled in the settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTracked;

impl SessionTracker for AlwaysTracked {
    fn is_tracked(&self) -> bool {
        true
    }
}

/// Relaunch by handing a `steam://launch/<id>` URI to the platform.
#[derive(Debug, Clone)]
pub struct UriLauncher {
    uri: String,
}

impl UriLauncher {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Launcher for UriLauncher {
    fn launch(&self) -> Result<()> {
        opener::open(&self.uri).with_context(|| format!("failed to open {}", self.uri))
    }
}

pub fn steam_uri(app_id: u32) -> String {
    format!("steam://launch/{app_id}")
}
