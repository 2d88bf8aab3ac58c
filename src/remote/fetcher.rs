use std::path::{Component, Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{info, warn};

use super::remote_tree::{RemoteError, RemoteTree};
use crate::ext::BestEffortPathExt;
use crate::filesystem::{self, EnsureDirError, EntryKind, join_remote};

/// Mirrors a remote directory tree onto the local filesystem.
///
/// Only a failed listing of the requested directory fails the call. Failed
/// downloads, failed writes and failed listings of nested directories are
/// logged, recorded in the returned [`FetchReport`] and do not stop their
/// siblings.
pub struct RemoteTreeFetcher<'a, R> {
    remote: &'a R,
}

impl<'a, R: RemoteTree> RemoteTreeFetcher<'a, R> {
    pub fn new(remote: &'a R) -> Self {
        Self { remote }
    }

    /// Downloads everything under `remote_path` into `local_root`
    pub async fn fetch_directory(
        &self,
        remote_path: &str,
        local_root: &Path,
    ) -> Result<FetchReport, FetchError> {
        info!("Fetching directory listing: {remote_path}");
        let entries = self
            .remote
            .list(remote_path)
            .await
            .context(ListingFailedSnafu { path: remote_path })?;

        let mut report = FetchReport::default();

        for entry in entries {
            let remote_child = join_remote(remote_path, &entry.name);
            if !is_plain_name(&entry.name) {
                warn!("Skipping {remote_child}: '{}' is not a plain file name", entry.name);
                let error = InvalidNameSnafu { name: entry.name }.build();
                report.record_failure(remote_child, error);
                continue;
            }
            let local_child = local_root.join(&entry.name);

            match entry.kind {
                EntryKind::File => match self.download_file(&remote_child, &local_child).await {
                    Ok(size) => {
                        info!("Saved {} ({size} bytes)", local_child.display());
                        report.saved.push(local_child);
                    }
                    Err(error) => {
                        warn!("Skipping {remote_child}: {error}");
                        report.record_failure(remote_child, error);
                    }
                },
                EntryKind::Directory => {
                    match Box::pin(self.fetch_directory(&remote_child, &local_child)).await {
                        Ok(subtree) => report.merge(subtree),
                        Err(error) => {
                            warn!("Skipping subtree {remote_child}: {error}");
                            report.record_failure(remote_child, error);
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    async fn download_file(&self, remote_path: &str, local_path: &Path) -> Result<usize, FetchError> {
        info!("Downloading: {remote_path}");
        let bytes = self
            .remote
            .fetch(remote_path)
            .await
            .context(DownloadFailedSnafu { path: remote_path })?;

        if let Some(parent) = local_path.parent() {
            filesystem::ensure(parent)
                .await
                .context(PrepareDirectorySnafu { path: local_path })?;
        }

        let size = bytes.len();
        fs::write(local_path, bytes)
            .await
            .0
            .context(WriteFailedSnafu { path: local_path })?;

        Ok(size)
    }
}

/// A listed name must stay inside the directory it was listed in
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Outcome of a fetch whose top-level listing succeeded
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Local files written, in listing order
    pub saved: Vec<PathBuf>,
    pub failures: Vec<FetchFailure>,
}

#[derive(Debug)]
pub struct FetchFailure {
    pub remote_path: String,
    pub error: FetchError,
}

impl FetchReport {
    /// Whether every file and nested listing below the root succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, remote_path: String, error: FetchError) {
        self.failures.push(FetchFailure { remote_path, error });
    }

    fn merge(&mut self, other: FetchReport) {
        self.saved.extend(other.saved);
        self.failures.extend(other.failures);
    }
}

#[derive(Debug, Snafu)]
pub enum FetchError {
    #[snafu(display("Failed to list remote directory '{}'", path))]
    ListingFailed { path: String, source: RemoteError },
    #[snafu(display("Refusing to write listed entry '{}'", name))]
    InvalidName { name: String },
    #[snafu(display("Failed to download '{}'", path))]
    DownloadFailed { path: String, source: RemoteError },
    #[snafu(display("Failed to prepare the directory for {}", path.best_effort_path_display()))]
    PrepareDirectory {
        path: PathBuf,
        source: EnsureDirError,
    },
    #[snafu(display("Failed to write {}", path.best_effort_path_display()))]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
