use std::time::Duration;

use tracing::{info, warn};

use super::snapshot::{ChangeKind, ChangeRecord, Snapshot};
use super::sync::LocalTreeSync;
use crate::output;

/// How long the watch loop sleeps between two scans
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

impl LocalTreeSync {
    /// Polls the source sets forever, copying new and modified files.
    ///
    /// The sleep between scans is the only suspension point. Deleted sources
    /// are reported but their copies on storage are left alone. Errors are
    /// logged and the loop carries on; it only ends with the process.
    pub async fn watch(&mut self, poll_interval: Duration) {
        let mut snapshot = Snapshot::capture(self.mapper().sets());
        info!(
            "Watching {} file(s), polling every {:?}",
            snapshot.len(),
            poll_interval
        );

        loop {
            compio::time::sleep(poll_interval).await;
            snapshot = self.poll(snapshot).await;
        }
    }

    /// Runs one scan against `previous` and applies what changed.
    ///
    /// The source sets are resolved again first, so a library directory that
    /// appeared or vanished since the last scan is honoured. Returns the new
    /// snapshot, which replaces `previous` as the basis of the next scan.
    pub async fn poll(&mut self, previous: Snapshot) -> Snapshot {
        self.refresh_sources();
        let current = Snapshot::capture(self.mapper().sets());
        let changes = current.changes_since(&previous);

        if !changes.is_empty() {
            info!("Detected {} change(s)", changes.len());
            self.apply(&changes).await;
        }

        current
    }

    /// Copies new and modified files and reports deletions.
    ///
    /// Returns how many files were copied.
    pub async fn apply(&self, changes: &[ChangeRecord]) -> usize {
        let mut copied = 0;

        for change in changes {
            match change.kind {
                ChangeKind::New | ChangeKind::Modified => {
                    match self.copy_file(&change.path).await {
                        Ok(Some(_)) => {
                            copied += 1;
                            output::tagged(change.kind, change.kind.color(), change.path.display());
                        }
                        Ok(None) => {}
                        Err(error) => {
                            warn!("Failed to sync {}: {}", change.path.display(), error);
                            output::tagged("FAILED", colored::Color::Red, error);
                        }
                    }
                }
                ChangeKind::Deleted => {
                    output::tagged(
                        change.kind,
                        change.kind.color(),
                        format!("{} (manual cleanup may be needed)", change.path.display()),
                    );
                }
            }
        }

        copied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::{Path, PathBuf};
    use std::time::SystemTime;
    use tempfile::TempDir;

    use crate::mapping::{DestinationRoots, PathMapper, SourceSets};

    fn sync_for(root: &Path, storage: &Path) -> LocalTreeSync {
        LocalTreeSync::new(PathMapper::new(
            SourceSets::resolve(root),
            DestinationRoots::for_storage(storage),
        ))
    }

    fn set_mtime(path: &Path, seconds: u64) {
        File::options()
            .write(true)
            .open(path)
            .expect("Failed to open file")
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds))
            .expect("Failed to set mtime");
    }

    struct Fixture {
        _temp_dir: TempDir,
        root: PathBuf,
        storage: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("project");
        let storage = temp_dir.path().join("storage");
        std::fs::create_dir_all(root.join("lib")).expect("Failed to create project");
        Fixture {
            _temp_dir: temp_dir,
            root,
            storage,
        }
    }

    #[compio::test]
    async fn test_poll_copies_new_file() {
        let fixture = fixture();
        let mut sync = sync_for(&fixture.root, &fixture.storage);
        let baseline = Snapshot::capture(sync.mapper().sets());

        std::fs::write(fixture.root.join("app.rb"), "puts 'new'").expect("Failed to write");
        let next = sync.poll(baseline).await;

        assert_eq!(next.len(), 1);
        assert_eq!(
            std::fs::read_to_string(fixture.storage.join("home").join("app.rb"))
                .expect("File should have been copied"),
            "puts 'new'"
        );
    }

    #[compio::test]
    async fn test_poll_copies_modified_file() {
        let fixture = fixture();
        let source = fixture.root.join("lib").join("helper.rb");
        std::fs::write(&source, "v1").expect("Failed to write");
        set_mtime(&source, 1_000);
        let mut sync = sync_for(&fixture.root, &fixture.storage);
        let baseline = Snapshot::capture(sync.mapper().sets());

        std::fs::write(&source, "v2").expect("Failed to write");
        set_mtime(&source, 2_000);
        sync.poll(baseline).await;

        assert_eq!(
            std::fs::read_to_string(fixture.storage.join("lib").join("helper.rb"))
                .expect("File should have been copied"),
            "v2"
        );
    }

    #[compio::test]
    async fn test_poll_without_changes_copies_nothing() {
        let fixture = fixture();
        std::fs::write(fixture.root.join("app.rb"), "puts 1").expect("Failed to write");
        let mut sync = sync_for(&fixture.root, &fixture.storage);
        let baseline = Snapshot::capture(sync.mapper().sets());

        let next = sync.poll(baseline.clone()).await;

        assert_eq!(next, baseline);
        assert!(!fixture.storage.exists());
    }

    #[compio::test]
    async fn test_deletion_leaves_destination_in_place() {
        let fixture = fixture();
        let source = fixture.root.join("app.rb");
        std::fs::write(&source, "puts 1").expect("Failed to write");
        let mut sync = sync_for(&fixture.root, &fixture.storage);
        sync.sync_once().await.expect("Initial sync should succeed");
        let baseline = Snapshot::capture(sync.mapper().sets());

        std::fs::remove_file(&source).expect("Failed to remove source");
        let next = sync.poll(baseline).await;

        assert!(next.is_empty());
        assert!(fixture.storage.join("home").join("app.rb").exists());
    }

    #[compio::test]
    async fn test_poll_picks_up_library_created_while_watching() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("project");
        let storage = temp_dir.path().join("storage");
        std::fs::create_dir_all(&root).expect("Failed to create project");
        std::fs::write(root.join("app.rb"), "puts 1").expect("Failed to write");
        let mut sync = sync_for(&root, &storage);
        sync.sync_once().await.expect("Initial sync should succeed");
        let baseline = Snapshot::capture(sync.mapper().sets());

        std::fs::create_dir_all(root.join("lib").join("util")).expect("Failed to create lib");
        std::fs::write(root.join("lib").join("util").join("helper.rb"), "module Helper; end")
            .expect("Failed to write");
        let next = sync.poll(baseline).await;

        assert_eq!(next.len(), 2);
        assert_eq!(
            std::fs::read_to_string(storage.join("lib").join("util").join("helper.rb"))
                .expect("Library file should have been copied"),
            "module Helper; end"
        );
    }

    #[compio::test]
    async fn test_poll_forgets_library_removed_while_watching() {
        let fixture = fixture();
        std::fs::write(fixture.root.join("lib").join("helper.rb"), "v1").expect("Failed to write");
        let mut sync = sync_for(&fixture.root, &fixture.storage);
        let baseline = Snapshot::capture(sync.mapper().sets());

        std::fs::remove_dir_all(fixture.root.join("lib")).expect("Failed to remove lib");
        let next = sync.poll(baseline).await;

        assert!(next.is_empty());
        assert_eq!(sync.mapper().sets().library(), None);
    }

    #[compio::test]
    async fn test_apply_counts_only_copies() {
        let fixture = fixture();
        std::fs::write(fixture.root.join("a.rb"), "a").expect("Failed to write");
        let sync = sync_for(&fixture.root, &fixture.storage);

        let copied = sync
            .apply(&[
                ChangeRecord::new(fixture.root.join("a.rb"), ChangeKind::New),
                ChangeRecord::new(fixture.root.join("gone.rb"), ChangeKind::Modified),
                ChangeRecord::new(fixture.root.join("old.rb"), ChangeKind::Deleted),
            ])
            .await;

        assert_eq!(copied, 1);
    }
}
