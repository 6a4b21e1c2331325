//! Work out which level this run should open.
//!
//! Sources are consulted in order and never merged:
//!
//! 1. The launch marker left by a previous run that relaunched through Steam.
//! 2. The process arguments, first valid candidate wins.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::level::{self, FileKind};
use crate::marker::MarkerStore;

/// Where a launch intent came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentSource {
    Marker,
    Arguments,
}

/// The level the user asked for in this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchIntent {
    path: PathBuf,
    kind: FileKind,
    source: IntentSource,
}

impl LaunchIntent {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn source(&self) -> IntentSource {
        self.source
    }
}

pub struct Resolver<'a> {
    store: &'a MarkerStore,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a MarkerStore) -> Self {
        Self { store }
    }

    /// Resolve the launch intent from the marker and `args`.
    ///
    /// `args` is the full argument vector, program name included.
    pub fn resolve<S: AsRef<OsStr>>(&self, args: &[S]) -> Option<LaunchIntent> {
        if let Some(intent) = self.from_marker() {
            return Some(intent);
        }
        from_args(args)
    }

    fn from_marker(&self) -> Option<LaunchIntent> {
        let content = match self.store.read_and_clear() {
            Ok(Some(content)) => content,
            Ok(None) => {
                info!("Editor launch file not found");
                return None;
            }
            Err(err) => {
                warn!("Ignoring editor launch file: {err:#}");
                return None;
            }
        };
        info!("Editor launch file found: {content}");

        let path = PathBuf::from(content);
        match level::classify(&path) {
            Some(kind) => Some(LaunchIntent {
                path,
                kind,
                source: IntentSource::Marker,
            }),
            None => {
                error!("Editor launch file is bogus");
                None
            }
        }
    }
}

fn from_args<S: AsRef<OsStr>>(args: &[S]) -> Option<LaunchIntent> {
    // args[0] is the program itself.
    let Some(candidates) = args.get(1..).filter(|rest| !rest.is_empty()) else {
        info!("No file passed");
        return None;
    };

    let found = candidates.iter().find_map(|arg| {
        let arg: &OsStr = arg.as_ref();
        let path = Path::new(arg);
        level::classify(path).map(|kind| LaunchIntent {
            path: path.to_path_buf(),
            kind,
            source: IntentSource::Arguments,
        })
    });
    if found.is_none() {
        info!("Could not find level");
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        store: MarkerStore,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let store = MarkerStore::in_dir(&dir.path().join("data"));
            Self { dir, store }
        }

        fn level(&self, name: &str) -> String {
            let path = self.dir.path().join(name);
            fs::write(&path, "{}").unwrap();
            path.to_string_lossy().into_owned()
        }

        fn missing(&self, name: &str) -> String {
            self.dir.path().join(name).to_string_lossy().into_owned()
        }
    }

    #[test]
    fn nothing_requested() {
        let fx = Fixture::new();
        let resolver = Resolver::new(&fx.store);
        assert_eq!(resolver.resolve(&["game"]), None);
        let empty: [&str; 0] = [];
        assert_eq!(resolver.resolve(&empty), None);
    }

    #[test]
    fn lone_backend_flag_is_not_a_level() {
        let fx = Fixture::new();
        let resolver = Resolver::new(&fx.store);
        assert_eq!(resolver.resolve(&["game", "--force-d3d11"]), None);
    }

    #[test]
    fn flag_before_level_is_skipped() {
        let fx = Fixture::new();
        let level = fx.level("level.rdlevel");
        let intent = Resolver::new(&fx.store)
            .resolve(&["game", "--force-d3d11", level.as_str()])
            .unwrap();
        assert_eq!(intent.path(), Path::new(&level));
        assert_eq!(intent.kind(), FileKind::SingleFile);
        assert_eq!(intent.source(), IntentSource::Arguments);
    }

    #[test]
    fn first_valid_argument_wins() {
        let fx = Fixture::new();
        let first = fx.level("first.rdzip");
        let second = fx.level("second.rdlevel");
        let gone = fx.missing("gone.rdlevel");
        let intent = Resolver::new(&fx.store)
            .resolve(&["game", gone.as_str(), first.as_str(), second.as_str()])
            .unwrap();
        assert_eq!(intent.path(), Path::new(&first));
        assert_eq!(intent.kind(), FileKind::PackageArchive);
    }

    #[test]
    fn program_name_is_never_a_candidate() {
        let fx = Fixture::new();
        let level = fx.level("game.rdlevel");
        assert_eq!(Resolver::new(&fx.store).resolve(&[level.as_str()]), None);
    }

    #[test]
    fn no_valid_argument() {
        let fx = Fixture::new();
        let gone = fx.missing("gone.rdlevel");
        let text = fx.level("readme.txt");
        assert_eq!(
            Resolver::new(&fx.store).resolve(&["game", gone.as_str(), text.as_str()]),
            None
        );
    }

    #[test]
    fn valid_marker_takes_precedence() {
        let fx = Fixture::new();
        let marked = fx.level("marked.rdzip");
        let argued = fx.level("argued.rdlevel");
        fx.store.write(&marked).unwrap();

        let intent = Resolver::new(&fx.store)
            .resolve(&["game", argued.as_str()])
            .unwrap();
        assert_eq!(intent.path(), Path::new(&marked));
        assert_eq!(intent.source(), IntentSource::Marker);
        assert!(!fx.store.path().exists());
    }

    #[test]
    fn invalid_marker_falls_back_to_arguments() {
        let fx = Fixture::new();
        let argued = fx.level("argued.rdlevel");
        fx.store.write(&fx.missing("deleted.rdlevel")).unwrap();

        let intent = Resolver::new(&fx.store)
            .resolve(&["game", argued.as_str()])
            .unwrap();
        assert_eq!(intent.path(), Path::new(&argued));
        assert_eq!(intent.source(), IntentSource::Arguments);
        assert!(!fx.store.path().exists());
    }

    #[test]
    fn invalid_marker_and_no_arguments() {
        let fx = Fixture::new();
        fx.store.write("garbage").unwrap();
        assert_eq!(Resolver::new(&fx.store).resolve(&["game"]), None);
        assert!(!fx.store.path().exists());
    }
}
