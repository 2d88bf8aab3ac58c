use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;

/// Creates `path` together with every missing ancestor.
///
/// Ancestors are walked from the outermost component inwards and each one is
/// checked before it is created, so calling this repeatedly is a no-op once
/// the tree exists. Absolute paths keep their root, relative paths are
/// resolved against the working directory. Returns the number of directories
/// that had to be created.
pub async fn ensure(path: impl AsRef<Path>) -> Result<usize, EnsureDirError> {
    let path = path.as_ref();
    let mut current = PathBuf::new();
    let mut created = 0;

    for component in path.components() {
        current.push(component);

        if matches!(
            component,
            Component::Prefix(_) | Component::RootDir | Component::CurDir
        ) {
            continue;
        }

        match std::fs::metadata(&current) {
            Ok(metadata) if metadata.is_dir() => continue,
            Ok(_) => {
                return NotADirectorySnafu { path: current }.fail();
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).context(InspectSnafu { path: current });
            }
        }

        match fs::create_dir(&current).await {
            Ok(()) => {
                debug!("Created directory {}", current.display());
                created += 1;
            }
            // Someone else got there first
            Err(err) if err.kind() == ErrorKind::AlreadyExists && current.is_dir() => {}
            Err(err) => {
                return Err(err).context(CreateSnafu { path: current });
            }
        }
    }

    Ok(created)
}

#[derive(Debug, Snafu)]
pub enum EnsureDirError {
    #[snafu(display("{} exists but is not a directory", path.best_effort_path_display()))]
    NotADirectory { path: PathBuf },
    #[snafu(display("Failed to inspect {}", path.best_effort_path_display()))]
    InspectError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create directory {}", path.best_effort_path_display()))]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
}
