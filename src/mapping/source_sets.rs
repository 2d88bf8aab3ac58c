use std::path::{Path, PathBuf};

use tracing::debug;

/// Directory under the project root holding library code
pub const LIBRARY_DIR_NAME: &str = "lib";

const HOME_BUCKET: &str = "home";
const LIBRARY_BUCKET: &str = "lib";

/// The local roots eligible for synchronization.
///
/// The working root is scanned flat, the library root recursively. The
/// library root is only declared when it actually is a directory, which is
/// decided once when the sets are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSets {
    root: PathBuf,
    library: Option<PathBuf>,
}

impl SourceSets {
    /// Resolves the source sets of a project rooted at `root`
    pub fn resolve(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let candidate = root.join(LIBRARY_DIR_NAME);
        let library = if candidate.is_dir() {
            Some(candidate)
        } else {
            debug!(
                "No library directory at {}, only the project root is synced",
                candidate.display()
            );
            None
        };

        Self { root, library }
    }

    pub fn new(root: impl Into<PathBuf>, library: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            library,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn library(&self) -> Option<&Path> {
        self.library.as_deref()
    }
}

/// The two buckets on the storage device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRoots {
    pub home: PathBuf,
    pub lib: PathBuf,
}

impl DestinationRoots {
    /// `<storage>/home` and `<storage>/lib`
    pub fn for_storage(storage: impl AsRef<Path>) -> Self {
        let storage = storage.as_ref();
        Self {
            home: storage.join(HOME_BUCKET),
            lib: storage.join(LIBRARY_BUCKET),
        }
    }
}
