use snafu::{OptionExt, ResultExt, Snafu};

use crate::cli::UpdateArgs;
use crate::ext::BestEffortPathExt;
use crate::output;
use crate::remote::RemoteError;
use crate::update::{
    self, CURRENT_VERSION, InstallError, asset_name, detect_platform, install_binary,
    install_path, is_newer,
};

pub async fn run(args: UpdateArgs) -> Result<(), UpdateError> {
    output::header("picogem update");
    output::blank();
    output::line("Checking for updates...");

    let remote = update::release_remote();
    let latest = remote.latest_release().context(LatestReleaseSnafu)?;

    output::field("Current version", CURRENT_VERSION);
    output::field("Latest version", &latest);
    output::blank();

    if !is_newer(&latest, CURRENT_VERSION) {
        output::success("You are already using the latest version.");
        return Ok(());
    }

    output::line("New version available!");
    if args.check {
        output::line("Run 'picogem update' to install it.");
        return Ok(());
    }

    let platform = detect_platform().context(UnsupportedPlatformSnafu {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
    })?;
    let asset = asset_name(&platform);
    output::field("Platform", &platform);

    output::line("Downloading...");
    let bytes = remote
        .download_release_asset(&latest, &asset)
        .context(DownloadSnafu { asset: &asset })?;
    output::line(format!("Downloaded {} bytes", bytes.len()));

    let target = install_path().context(InstallationSnafu)?;
    output::field("Install path", target.best_effort_path_display());
    install_binary(bytes, &target).await.context(InstallationSnafu)?;

    output::blank();
    output::success("Update completed successfully!");
    output::line(format!("picogem has been updated to v{latest}"));
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum UpdateError {
    #[snafu(display("Failed to get the latest version"))]
    LatestReleaseError { source: RemoteError },
    #[snafu(display("No release is published for {}-{}", os, arch))]
    UnsupportedPlatform { os: String, arch: String },
    #[snafu(display("Failed to download '{}'", asset))]
    DownloadError { asset: String, source: RemoteError },
    #[snafu(display("Failed to install the new version"))]
    Installation { source: InstallError },
}
