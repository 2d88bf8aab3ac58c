use std::path::Path;

use tracing::{debug, warn};

/// Removes a scratch directory tree.
///
/// Never fails: the outcome is logged and reported as a `bool` so callers can
/// mention a leftover workspace without aborting their own work. A tree that
/// does not exist counts as removed.
pub fn remove_tree_best_effort(path: &Path) -> bool {
    if !path.exists() {
        debug!("Nothing to clean up at {}", path.display());
        return true;
    }

    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            true
        }
        Err(err) => {
            warn!("Failed to remove {}: {}", path.display(), err);
            false
        }
    }
}
