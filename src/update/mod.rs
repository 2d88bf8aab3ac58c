//! Self-update against the published releases of picogem.

mod installer;
mod platform;
mod version;

pub use installer::{InstallError, install_binary, install_path};
pub use platform::{asset_name, detect_platform};
pub use version::is_newer;

use tracing::debug;

use crate::remote::{GithubRemote, Repository};

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const RELEASE_OWNER: &str = "hayaokimura";
const RELEASE_REPOSITORY: &str = "picoruby-gem-installer";
const RELEASE_BRANCH: &str = "main";

/// Remote the releases of picogem are published on
pub fn release_remote() -> GithubRemote {
    GithubRemote::new(
        Repository::new(RELEASE_OWNER, RELEASE_REPOSITORY),
        RELEASE_BRANCH,
    )
}

/// Returns the latest version when it is newer than the running one.
///
/// Never fails: lookup errors are logged at debug level and read as "no
/// update".
pub fn check_for_updates(remote: &GithubRemote) -> Option<String> {
    match remote.latest_release() {
        Ok(latest) if is_newer(&latest, CURRENT_VERSION) => Some(latest),
        Ok(latest) => {
            debug!("picogem {CURRENT_VERSION} is up to date (latest release {latest})");
            None
        }
        Err(err) => {
            debug!("Update check failed: {err}");
            None
        }
    }
}
