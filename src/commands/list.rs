use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::application::RuntimeConfig;
use crate::cli::ListArgs;
use crate::filesystem::TreeEntry;
use crate::output;
use crate::remote::{GithubRemote, RemoteError, RemoteTree};

pub async fn run(config: &RuntimeConfig, args: ListArgs) -> Result<(), ListError> {
    let settings = config.remote_settings(&args.remote);

    output::header("PicoRuby Runtime Gems");
    output::field("Repository", &settings.repository);
    output::field("Branch", &settings.branch);
    output::field("Directory", &settings.gems_dir);
    output::blank();

    let remote = GithubRemote::new(settings.repository, settings.branch);
    let gems = list_gems(&remote, &settings.gems_dir).await?;

    if gems.is_empty() {
        output::line("No gems found.");
        return Ok(());
    }

    output::line("Available gems:");
    for gem in &gems {
        output::line(format!("  {gem}"));
    }
    output::blank();
    output::line(format!("Total: {} gems", gems.len()));

    Ok(())
}

/// Names of the gems under `gems_dir`, in listing order.
///
/// Every directory entry is a gem; plain files are skipped.
pub async fn list_gems(remote: &impl RemoteTree, gems_dir: &str) -> Result<Vec<String>, ListError> {
    let entries = remote
        .list(gems_dir)
        .await
        .context(ListingSnafu { path: gems_dir })?;
    debug!("{} entries under {gems_dir}", entries.len());

    Ok(entries
        .into_iter()
        .filter(TreeEntry::is_directory)
        .map(|entry| entry.name)
        .collect())
}

#[derive(Debug, Snafu)]
pub enum ListError {
    #[snafu(display("Failed to fetch the gem list from '{}'", path))]
    ListingError { path: String, source: RemoteError },
}
