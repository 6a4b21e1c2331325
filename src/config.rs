use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::launcher::{self, DEFAULT_APP_ID};

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Relaunch through Steam when not started by it, so playtime is tracked.
    pub relaunch_with_launcher: bool,
    pub app_id: u32,
    /// Overrides the `steam://launch/<app_id>` handoff URI.
    pub launcher_uri: Option<String>,
    /// Where the launch marker and unpacked packages live.
    pub data_dir: Option<PathBuf>,
    /// Level the editor opens when started without one.
    pub default_level: Option<PathBuf>,
    pub editor: Option<EditorConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relaunch_with_launcher: true,
            app_id: DEFAULT_APP_ID,
            launcher_uri: None,
            data_dir: None,
            default_level: None,
            editor: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub command: String,
    /// `{path}` is replaced with the level path; without it the path is appended.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    pub fn launcher_uri(&self) -> String {
        self.launcher_uri
            .clone()
            .unwrap_or_else(|| launcher::steam_uri(self.app_id))
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

const DEFAULT_CONFIG: &str = "\
# Relaunch the editor through Steam to track playtime.
relaunch_with_launcher = true
app_id = 774181

# Program that opens level documents. Without it the path is printed.
# [editor]
# command = \"rhythm-doctor-editor\"
# args = [\"--open\", \"{path}\"]
";

/// Load config from `<config dir>/editor-launch/config.toml`, or return defaults.
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

/// Write the commented default settings file. Refuses to overwrite.
pub fn init_at(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("settings file already exists: {}", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn config_path() -> PathBuf {
    dirs_config_dir()
        .join("editor-launch")
        .join("config.toml")
}

/// `XDG_CONFIG_HOME` wins on every platform, then the platform config dir.
fn dirs_config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("editor-launch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.relaunch_with_launcher);
        assert_eq!(config.app_id, 774181);
        assert_eq!(config.launcher_uri(), "steam://launch/774181");
        assert!(config.editor.is_none());
        assert!(config.data_dir().ends_with("editor-launch"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "app_id = 42\n").unwrap();
        let config = load_from(&path).unwrap();
        assert!(config.relaunch_with_launcher);
        assert_eq!(config.launcher_uri(), "steam://launch/42");
    }

    #[test]
    fn full_file_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
relaunch_with_launcher = false
launcher_uri = "steam://run/774181"
data_dir = "/tmp/rd"
default_level = "/tmp/rd/home.rdlevel"

[editor]
command = "rdedit"
args = ["--open", "{path}"]
"#,
        )
        .unwrap();
        let config = load_from(&path).unwrap();
        assert!(!config.relaunch_with_launcher);
        assert_eq!(config.launcher_uri(), "steam://run/774181");
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/rd"));
        assert_eq!(
            config.default_level.as_deref(),
            Some(Path::new("/tmp/rd/home.rdlevel"))
        );
        let editor = config.editor.unwrap();
        assert_eq!(editor.command, "rdedit");
        assert_eq!(editor.args, vec!["--open", "{path}"]);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "relaunch_with_launcher = \"maybe\"").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn config_and_data_dirs_come_from_the_platform() {
        let config = Config::default();
        if std::env::var_os("XDG_CONFIG_HOME").is_none() {
            if let Some(platform) = dirs::config_dir() {
                assert!(config_path().starts_with(platform));
            }
        }
        if let Some(platform) = dirs::data_dir() {
            assert_eq!(config.data_dir(), platform.join("editor-launch"));
        }
    }

    #[test]
    fn init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        init_at(&path).unwrap();
        let config = load_from(&path).unwrap();
        assert!(config.relaunch_with_launcher);
        assert_eq!(config.app_id, 774181);
        assert!(init_at(&path).is_err());
    }
}
