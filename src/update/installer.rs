use std::ffi::OsString;
use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;

const STAGING_SUFFIX: &str = ".new";

/// Path of the running executable, which is what an update replaces
pub fn install_path() -> Result<PathBuf, InstallError> {
    std::env::current_exe().context(LocateSnafu)
}

/// Sibling of `install_path` the new executable is written to first
pub fn staging_path(install_path: &Path) -> PathBuf {
    let mut staged = OsString::from(install_path.as_os_str());
    staged.push(STAGING_SUFFIX);
    PathBuf::from(staged)
}

/// Writes `bytes` next to `install_path`, renames the result over it and
/// marks it executable.
///
/// The old executable stays untouched until the new one is fully written.
pub async fn install_binary(bytes: Vec<u8>, install_path: &Path) -> Result<(), InstallError> {
    let staged = staging_path(install_path);

    debug!(
        "Writing {} byte(s) to {}",
        bytes.len(),
        staged.best_effort_path_display()
    );
    fs::write(&staged, bytes)
        .await
        .0
        .context(StageSnafu { path: &staged })?;

    std::fs::rename(&staged, install_path).context(ReplaceSnafu {
        staged: &staged,
        path: install_path,
    })?;

    set_executable(install_path)?;
    info!("Installed {}", install_path.best_effort_path_display());
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .context(PermissionSnafu { path })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum InstallError {
    #[snafu(display("Could not determine where picogem is installed"))]
    LocateError { source: std::io::Error },
    #[snafu(display("Failed to write {}", path.best_effort_path_display()))]
    StageError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "Failed to replace {}, move {} over it manually",
        path.best_effort_path_display(),
        staged.best_effort_path_display()
    ))]
    ReplaceError {
        staged: PathBuf,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to make {} executable", path.best_effort_path_display()))]
    PermissionError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("/usr/local/bin/picogem")),
            PathBuf::from("/usr/local/bin/picogem.new")
        );
    }

    #[compio::test]
    async fn test_install_replaces_existing_binary() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("picogem");
        std::fs::write(&target, "old").expect("Failed to write");

        install_binary(b"new".to_vec(), &target)
            .await
            .expect("Install should succeed");

        assert_eq!(std::fs::read(&target).expect("Failed to read"), b"new");
        assert!(!staging_path(&target).exists());
    }

    #[cfg(unix)]
    #[compio::test]
    async fn test_installed_binary_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("picogem");

        install_binary(b"#!/bin/sh\n".to_vec(), &target)
            .await
            .expect("Install should succeed");

        let mode = std::fs::metadata(&target)
            .expect("Failed to stat")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[compio::test]
    async fn test_missing_directory_fails_before_touching_target() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("missing").join("picogem");

        let result = install_binary(b"new".to_vec(), &target).await;

        assert!(matches!(result, Err(InstallError::StageError { .. })));
    }
}
