use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{DestinationRoots, SourceSets};

/// Maps source files to their destination on the storage device.
///
/// Files directly under the project root land flat in the `home` bucket,
/// files under the library root keep their relative layout inside the `lib`
/// bucket. Membership is decided on path components of the resolved roots,
/// so `libfoo.rb` next to `lib/` is a root file and not a library file.
#[derive(Debug, Clone)]
pub struct PathMapper {
    sets: SourceSets,
    destinations: DestinationRoots,
}

impl PathMapper {
    pub fn new(sets: SourceSets, destinations: DestinationRoots) -> Self {
        Self { sets, destinations }
    }

    pub fn sets(&self) -> &SourceSets {
        &self.sets
    }

    pub fn destinations(&self) -> &DestinationRoots {
        &self.destinations
    }

    /// Resolves the source sets of the same root again, so a library
    /// directory created or removed since the last resolution is picked up
    pub fn refresh(&mut self) {
        let sets = SourceSets::resolve(self.sets.root());
        if sets != self.sets {
            debug!(
                "Library directory changed to {:?}",
                sets.library().map(Path::display)
            );
            self.sets = sets;
        }
    }

    /// Destination of `source`, or `None` when it belongs to no source set
    pub fn map(&self, source: &Path) -> Option<PathBuf> {
        if let Some(library) = self.sets.library()
            && let Ok(relative) = source.strip_prefix(library)
        {
            let nested = relative.components().next().is_some()
                && relative
                    .components()
                    .all(|component| matches!(component, Component::Normal(_)));

            return nested.then(|| self.destinations.lib.join(relative));
        }

        if source.parent() == Some(self.sets.root()) {
            return source
                .file_name()
                .map(|name| self.destinations.home.join(name));
        }

        None
    }
}
