use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};

use crate::application::RuntimeConfig;
use crate::cli::AddArgs;
use crate::compiler::{CompileReport, MrbcCompiler, compile_tree};
use crate::filesystem::{join_remote, remove_tree_best_effort};
use crate::output;
use crate::remote::{FetchError, FetchReport, GithubRemote, RemoteTree, RemoteTreeFetcher};

pub async fn run(config: &RuntimeConfig, args: AddArgs) -> Result<(), AddError> {
    let settings = config.remote_settings(&args.remote);
    let output_dir = config.output_dir(args.output.as_deref());
    let source = join_remote(&settings.gems_dir, &args.package);
    let destination = output_dir.join(&args.package);

    output::header("picogem add");
    output::field("Repository", &settings.repository);
    output::field("Branch", &settings.branch);
    output::field("Package", &args.package);
    output::field("Source", &source);
    output::field("Output", destination.display());
    output::blank();

    let remote = GithubRemote::new(settings.repository, settings.branch);

    let result = if args.compile {
        install_compiled(&remote, &source, &output_dir, &args.package).await
    } else {
        install(&remote, &source, &destination).await.map(|_| ())
    };

    if let Err(AddError::DownloadError {
        source: FetchError::ListingFailed { source: listing, .. },
        ..
    }) = &result
        && listing.status() == Some(404)
    {
        output::failure(format!("Package '{}' was not found at {source}", args.package));
    }
    result
}

/// Mirrors the gem at `source` into `destination` as it is
pub async fn install(
    remote: &impl RemoteTree,
    source: &str,
    destination: &Path,
) -> Result<FetchReport, AddError> {
    let report = RemoteTreeFetcher::new(remote)
        .fetch_directory(source, destination)
        .await
        .context(DownloadSnafu { package: source })?;

    print_fetch_report(&report);
    Ok(report)
}

/// Downloads the gem into a hidden workspace next to its install location,
/// compiles it from there and removes the workspace again
pub async fn install_compiled(
    remote: &impl RemoteTree,
    source: &str,
    output_dir: &Path,
    package: &str,
) -> Result<(), AddError> {
    let workspace = workspace_dir(output_dir, package);
    let destination = output_dir.join(package);

    let outcome = match install(remote, source, &workspace).await {
        Ok(_) => {
            output::blank();
            output::line("Compiling...");
            let report = compile_tree(&MrbcCompiler::default(), &workspace, &destination).await;
            print_compile_report(&report);
            Ok(())
        }
        Err(err) => Err(err),
    };

    remove_tree_best_effort(&workspace);
    outcome
}

pub fn workspace_dir(output_dir: &Path, package: &str) -> PathBuf {
    output_dir.join(format!(".{package}.download"))
}

fn print_fetch_report(report: &FetchReport) {
    for path in &report.saved {
        output::line(format!("  saved {}", path.display()));
    }
    for failure in &report.failures {
        output::failure(format!("  failed {}: {}", failure.remote_path, failure.error));
    }

    output::blank();
    if report.is_complete() {
        output::success(format!(
            "Download completed successfully! ({} file(s))",
            report.saved.len()
        ));
    } else {
        output::failure(format!(
            "Downloaded {} file(s), {} could not be fetched.",
            report.saved.len(),
            report.failures.len()
        ));
    }
}

fn print_compile_report(report: &CompileReport) {
    for path in &report.compiled {
        output::line(format!("  compiled {}", path.display()));
    }
    for path in &report.copied {
        output::line(format!("  copied {}", path.display()));
    }
    for failure in &report.failures {
        output::failure(format!(
            "  failed {}: {}",
            failure.path.display(),
            failure.error
        ));
    }

    output::blank();
    if report.is_complete() {
        output::success(format!(
            "Compiled {} file(s), copied {} file(s).",
            report.compiled.len(),
            report.copied.len()
        ));
    } else {
        output::failure(format!(
            "{} file(s) could not be installed.",
            report.failures.len()
        ));
    }
}

#[derive(Debug, Snafu)]
pub enum AddError {
    #[snafu(display("Download of '{}' failed", package))]
    DownloadError { package: String, source: FetchError },
}
