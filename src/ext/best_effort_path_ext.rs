use std::path::{Component, Path, PathBuf};

/// Renders a path for messages shown to the operator.
///
/// Existing paths are canonicalized. Paths that do not exist (yet), such as a
/// destination that failed to be created, are made absolute against the
/// working directory and have `.`/`..` folded lexically.
pub fn best_effort_path_display(path: &Path) -> String {
    if let Ok(canonical) = path.canonicalize() {
        return canonical.display().to_string();
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    fold_dots(&absolute).display().to_string()
}

fn fold_dots(path: &Path) -> PathBuf {
    let mut folded: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match folded.last() {
                Some(Component::Normal(_)) => {
                    folded.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => folded.push(component),
            },
            _ => folded.push(component),
        }
    }

    folded.iter().collect()
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl<P: AsRef<Path> + ?Sized> BestEffortPathExt for P {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self.as_ref())
    }
}
