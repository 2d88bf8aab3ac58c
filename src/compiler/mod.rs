//! Bytecode compilation of downloaded Ruby sources.

mod mrbc;
mod tree;

pub use mrbc::MrbcCompiler;
pub use tree::{CompileReport, compile_tree};

use std::path::{Path, PathBuf};

use snafu::Snafu;

use crate::ext::BestEffortPathExt;

/// Turns one Ruby source file into a bytecode file
pub trait Compiler {
    async fn compile(&self, source: &Path, destination: &Path) -> Result<(), CompileError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CompileError {
    #[snafu(display("Failed to start '{}'", program))]
    SpawnError {
        program: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to compile {}: {}", path.best_effort_path_display(), diagnostic))]
    Failed { path: PathBuf, diagnostic: String },
}
