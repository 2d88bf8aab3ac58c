use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::warn;

use super::{CompileError, Compiler};
use crate::ext::BestEffortPathExt;
use crate::filesystem::{self, EnsureDirError};

const SOURCE_EXTENSION: &str = "rb";
const BYTECODE_EXTENSION: &str = "mrb";

/// Result of compiling a downloaded tree into its install location
#[derive(Debug, Default)]
pub struct CompileReport {
    pub compiled: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub failures: Vec<CompileFailure>,
}

#[derive(Debug)]
pub struct CompileFailure {
    pub path: PathBuf,
    pub error: InstallError,
}

impl CompileReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compiles every `.rb` file under `workspace` into `.mrb` under
/// `destination`, keeping the layout, and copies all other files as they are.
///
/// Failures are per file and recorded in the report.
pub async fn compile_tree(
    compiler: &impl Compiler,
    workspace: &Path,
    destination: &Path,
) -> CompileReport {
    let mut report = CompileReport::default();

    for source in files_under(workspace) {
        let Ok(relative) = source.strip_prefix(workspace) else {
            continue;
        };
        let is_source = source
            .extension()
            .is_some_and(|extension| extension == SOURCE_EXTENSION);
        let target = if is_source {
            destination.join(relative).with_extension(BYTECODE_EXTENSION)
        } else {
            destination.join(relative)
        };

        match install(compiler, &source, &target, is_source).await {
            Ok(()) if is_source => report.compiled.push(target),
            Ok(()) => report.copied.push(target),
            Err(error) => {
                warn!("Failed to install {}: {}", source.display(), error);
                report.failures.push(CompileFailure {
                    path: source,
                    error,
                });
            }
        }
    }

    report
}

async fn install(
    compiler: &impl Compiler,
    source: &Path,
    target: &Path,
    compile: bool,
) -> Result<(), InstallError> {
    if let Some(parent) = target.parent() {
        filesystem::ensure(parent)
            .await
            .context(PrepareDirectorySnafu { path: target })?;
    }

    if compile {
        return compiler.compile(source, target).await.context(CompileSnafu);
    }

    let bytes = fs::read(source).await.context(ReadSnafu { path: source })?;
    fs::write(target, bytes)
        .await
        .0
        .context(WriteSnafu { path: target })
}

#[derive(Debug, Snafu)]
pub enum InstallError {
    #[snafu(display("Failed to prepare the directory for {}", path.best_effort_path_display()))]
    PrepareDirectory {
        path: PathBuf,
        source: EnsureDirError,
    },
    #[snafu(display("{}", source))]
    Compile { source: CompileError },
    #[snafu(display("Failed to read {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
    let mut children: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .collect(),
        Err(err) => {
            warn!("Failed to read directory {}: {}", dir.display(), err);
            return Vec::new();
        }
    };
    children.sort();

    children
        .into_iter()
        .flat_map(|path| {
            if path.is_dir() {
                files_under(&path)
            } else {
                vec![path]
            }
        })
        .collect()
}
