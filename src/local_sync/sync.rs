use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use super::enumerate::enumerate_sources;
use crate::ext::BestEffortPathExt;
use crate::filesystem::{self, EnsureDirError};
use crate::mapping::PathMapper;
use crate::output;

/// Copies eligible source files to their mapped destinations.
pub struct LocalTreeSync {
    mapper: PathMapper,
}

impl LocalTreeSync {
    pub fn new(mapper: PathMapper) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    pub(super) fn refresh_sources(&mut self) {
        self.mapper.refresh();
    }

    /// Copies every eligible source file once.
    ///
    /// Both destination buckets are created first and failing to do so aborts
    /// the pass. After that, failures are per file: they are logged, recorded
    /// in the report and the pass moves on. Running it again without source
    /// changes rewrites the same bytes to the same places.
    pub async fn sync_once(&self) -> Result<SyncReport, SyncError> {
        self.prepare_destinations().await?;

        let mut report = SyncReport::default();

        for source in enumerate_sources(self.mapper.sets()) {
            match self.copy_file(&source).await {
                Ok(Some(_)) => report.copied += 1,
                Ok(None) => debug!("{} is not eligible for sync", source.display()),
                Err(error) => {
                    warn!("Skipping {}: {}", source.display(), error);
                    report.failures.push(SyncFailure {
                        path: source,
                        error,
                    });
                }
            }
        }

        info!("Copied {} file(s)", report.copied);
        Ok(report)
    }

    async fn prepare_destinations(&self) -> Result<(), SyncError> {
        let destinations = self.mapper.destinations();

        for root in [&destinations.home, &destinations.lib] {
            filesystem::ensure(root)
                .await
                .context(DestinationRootSnafu { path: root })?;
        }

        Ok(())
    }

    /// Copies one file to its mapped destination.
    ///
    /// Returns the destination, or `None` when the file maps nowhere.
    pub async fn copy_file(&self, source: &Path) -> Result<Option<PathBuf>, CopyError> {
        let Some(destination) = self.mapper.map(source) else {
            return Ok(None);
        };

        let bytes = fs::read(source).await.context(ReadSnafu { path: source })?;

        if let Some(parent) = destination.parent() {
            filesystem::ensure(parent).await.context(PrepareDirectorySnafu {
                path: destination.as_path(),
            })?;
        }

        fs::write(&destination, bytes)
            .await
            .0
            .context(WriteSnafu {
                path: destination.as_path(),
            })?;

        output::copied(source, &destination);
        Ok(Some(destination))
    }
}

/// Outcome of a sync pass whose destination roots could be created
#[derive(Debug, Default)]
pub struct SyncReport {
    pub copied: usize,
    pub failures: Vec<SyncFailure>,
}

#[derive(Debug)]
pub struct SyncFailure {
    pub path: PathBuf,
    pub error: CopyError,
}

#[derive(Debug, Snafu)]
pub enum SyncError {
    #[snafu(display("Failed to create destination root {}", path.best_effort_path_display()))]
    DestinationRoot {
        path: PathBuf,
        source: EnsureDirError,
    },
}

#[derive(Debug, Snafu)]
pub enum CopyError {
    #[snafu(display("Failed to read {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to prepare the directory for {}", path.best_effort_path_display()))]
    PrepareDirectory {
        path: PathBuf,
        source: EnsureDirError,
    },
    #[snafu(display("Failed to write {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::mapping::{DestinationRoots, SourceSets};

    struct Workspace {
        _temp_dir: TempDir,
        root: PathBuf,
        storage: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp directory");
            let root = temp_dir.path().join("project");
            let storage = temp_dir.path().join("storage");
            std::fs::create_dir(&root).expect("Failed to create project root");
            Self {
                _temp_dir: temp_dir,
                root,
                storage,
            }
        }

        fn write(&self, relative: &str, contents: &str) {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent");
            }
            std::fs::write(path, contents).expect("Failed to write source");
        }

        fn sync(&self) -> LocalTreeSync {
            LocalTreeSync::new(PathMapper::new(
                SourceSets::resolve(&self.root),
                DestinationRoots::for_storage(&self.storage),
            ))
        }

        fn stored(&self, relative: &str) -> String {
            std::fs::read_to_string(self.storage.join(relative))
                .expect("Failed to read stored file")
        }

        fn stored_files(&self) -> Vec<(PathBuf, Vec<u8>)> {
            fn walk(dir: &Path, files: &mut Vec<(PathBuf, Vec<u8>)>) {
                let mut entries: Vec<_> = std::fs::read_dir(dir)
                    .expect("Failed to read dir")
                    .map(|entry| entry.expect("Failed to read entry").path())
                    .collect();
                entries.sort();
                for path in entries {
                    if path.is_dir() {
                        walk(&path, files);
                    } else {
                        let bytes = std::fs::read(&path).expect("Failed to read file");
                        files.push((path, bytes));
                    }
                }
            }

            let mut files = Vec::new();
            walk(&self.storage, &mut files);
            files
        }
    }

    #[compio::test]
    async fn test_sync_maps_root_and_library_files() {
        let workspace = Workspace::new();
        workspace.write("app.rb", "puts 'app'");
        workspace.write("lib/util/helper.rb", "def helper; end");

        let report = workspace
            .sync()
            .sync_once()
            .await
            .expect("Sync should succeed");

        assert_eq!(report.copied, 2);
        assert!(report.failures.is_empty());
        assert_eq!(workspace.stored("home/app.rb"), "puts 'app'");
        assert_eq!(workspace.stored("lib/util/helper.rb"), "def helper; end");
    }

    #[compio::test]
    async fn test_sync_skips_ineligible_files() {
        let workspace = Workspace::new();
        workspace.write("app.rb", "puts 'app'");
        workspace.write("notes.txt", "not ruby");
        workspace.write("tools/script.rb", "not in a source set");

        let report = workspace
            .sync()
            .sync_once()
            .await
            .expect("Sync should succeed");

        assert_eq!(report.copied, 1);
        assert_eq!(
            workspace.stored_files(),
            vec![(
                workspace.storage.join("home").join("app.rb"),
                b"puts 'app'".to_vec()
            )]
        );
    }

    #[compio::test]
    async fn test_sync_twice_leaves_identical_destination() {
        let workspace = Workspace::new();
        workspace.write("app.rb", "puts 'app'");
        workspace.write("lib/a.rb", "a");
        workspace.write("lib/nested/b.mrb", "RITE0300");
        let sync = workspace.sync();

        let first = sync.sync_once().await.expect("First sync should succeed");
        let after_first = workspace.stored_files();
        let second = sync.sync_once().await.expect("Second sync should succeed");
        let after_second = workspace.stored_files();

        assert_eq!(first.copied, 3);
        assert_eq!(second.copied, 3);
        assert_eq!(after_first, after_second);
    }

    #[compio::test]
    async fn test_sync_creates_both_buckets_even_without_sources() {
        let workspace = Workspace::new();

        let report = workspace
            .sync()
            .sync_once()
            .await
            .expect("Sync should succeed");

        assert_eq!(report.copied, 0);
        assert!(workspace.storage.join("home").is_dir());
        assert!(workspace.storage.join("lib").is_dir());
    }

    #[compio::test]
    async fn test_unusable_storage_is_fatal() {
        let workspace = Workspace::new();
        workspace.write("app.rb", "puts 'app'");
        std::fs::write(&workspace.storage, "a file, not a mount").expect("Failed to write");

        let result = workspace.sync().sync_once().await;

        assert!(matches!(result, Err(SyncError::DestinationRoot { .. })));
    }

    #[compio::test]
    async fn test_unwritable_destination_is_isolated() {
        let workspace = Workspace::new();
        workspace.write("lib/blocked/a.rb", "a");
        workspace.write("lib/ok.rb", "ok");
        std::fs::create_dir_all(workspace.storage.join("lib")).expect("Failed to create lib");
        std::fs::write(workspace.storage.join("lib").join("blocked"), "in the way")
            .expect("Failed to write");

        let report = workspace
            .sync()
            .sync_once()
            .await
            .expect("Sync should succeed");

        assert_eq!(report.copied, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            CopyError::PrepareDirectory { .. }
        ));
        assert_eq!(workspace.stored("lib/ok.rb"), "ok");
    }

    #[compio::test]
    async fn test_copy_of_vanished_file_fails_with_read_error() {
        let workspace = Workspace::new();
        let sync = workspace.sync();

        let result = sync.copy_file(&workspace.root.join("ghost.rb")).await;

        assert!(matches!(result, Err(CopyError::ReadError { .. })));
    }

    #[compio::test]
    async fn test_copy_of_ineligible_file_is_a_skip() {
        let workspace = Workspace::new();
        let outside = workspace.storage.join("elsewhere.rb");

        let result = workspace.sync().copy_file(&outside).await;

        assert!(matches!(result, Ok(None)));
    }
}
