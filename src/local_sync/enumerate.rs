use std::path::{Path, PathBuf};

use tracing::warn;

use crate::mapping::SourceSets;

const SCRIPT_EXTENSION: &str = "rb";
const BYTECODE_EXTENSION: &str = "mrb";

/// Lists every eligible source file.
///
/// The project root contributes its `*.rb` files (flat), the library root
/// contributes `*.rb` and `*.mrb` files at any depth. Children are visited in
/// name order so repeated scans of an unchanged tree agree. Unreadable
/// directories are logged and skipped.
pub fn enumerate_sources(sets: &SourceSets) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = sorted_children(sets.root())
        .into_iter()
        .filter(|path| Some(path.as_path()) != sets.library())
        .filter(|path| path.is_file() && has_extension(path, &[SCRIPT_EXTENSION]))
        .collect();

    if let Some(library) = sets.library() {
        files.extend(scan_library(library));
    }

    files
}

fn scan_library(dir: &Path) -> Vec<PathBuf> {
    sorted_children(dir)
        .into_iter()
        .flat_map(|path| {
            if path.is_dir() {
                scan_library(&path)
            } else if path.is_file()
                && has_extension(&path, &[SCRIPT_EXTENSION, BYTECODE_EXTENSION])
            {
                vec![path]
            } else {
                Vec::new()
            }
        })
        .collect()
}

fn sorted_children(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Failed to read directory {}: {}", dir.display(), err);
            return Vec::new();
        }
    };

    let mut children: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(err) => {
                warn!("Failed to read an entry of {}: {}", dir.display(), err);
                None
            }
        })
        .collect();
    children.sort();
    children
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extensions.contains(&extension))
}
