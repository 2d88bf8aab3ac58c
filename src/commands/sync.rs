use snafu::{OptionExt, ResultExt, Snafu};

use crate::application::RuntimeConfig;
use crate::cli::SyncArgs;
use crate::ext::BestEffortPathExt;
use crate::local_sync::{LocalTreeSync, SyncError, SyncReport};
use crate::mapping::{DestinationRoots, PathMapper, SourceSets};
use crate::output;

pub async fn run(config: &RuntimeConfig, args: SyncArgs) -> Result<(), SyncCommandError> {
    let storage = config
        .storage(args.storage.as_deref())
        .context(MissingStorageSnafu)?;
    let sets = SourceSets::resolve(&config.root);

    output::header("picogem sync");
    output::field("Source", sets.root().best_effort_path_display());
    output::field(
        "Library",
        sets.library()
            .map_or_else(|| "(none)".to_string(), |library| library.best_effort_path_display()),
    );
    output::field("Storage", storage.best_effort_path_display());
    output::blank();

    let mut sync = LocalTreeSync::new(PathMapper::new(sets, DestinationRoots::for_storage(&storage)));
    let report = sync.sync_once().await.context(InitialSyncSnafu)?;
    print_report(&report);

    if args.watch {
        let interval = config.poll_interval(args.interval_ms);
        output::blank();
        output::line("Watching for changes (Ctrl+C to stop)...");
        sync.watch(interval).await;
    }

    Ok(())
}

fn print_report(report: &SyncReport) {
    for failure in &report.failures {
        output::failure(format!(
            "  failed {}: {}",
            failure.path.display(),
            failure.error
        ));
    }

    output::blank();
    if report.failures.is_empty() {
        output::success(format!("Sync completed! ({} file(s))", report.copied));
    } else {
        output::failure(format!(
            "Synced {} file(s), {} failed.",
            report.copied,
            report.failures.len()
        ));
    }
}

#[derive(Debug, Snafu)]
pub enum SyncCommandError {
    #[snafu(display(
        "No storage given, pass it as an argument or set 'storage' in picogem.yaml"
    ))]
    MissingStorage,
    #[snafu(display("Sync failed"))]
    InitialSyncError { source: SyncError },
}
