use std::path::{Path, PathBuf};
use std::process::Stdio;

use compio::process::Command;
use snafu::ResultExt;
use tracing::debug;

use super::{CompileError, Compiler, FailedSnafu, SpawnSnafu};

const DEFAULT_PROGRAM: &str = "mrbc";

/// Compiles with an external `mrbc` executable
#[derive(Debug, Clone)]
pub struct MrbcCompiler {
    program: PathBuf,
}

impl Default for MrbcCompiler {
    fn default() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }
}

impl MrbcCompiler {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn create_command(&self, source: &Path, destination: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-o").arg(destination).arg(source);
        let _ = cmd.stdout(Stdio::piped());
        let _ = cmd.stderr(Stdio::piped());
        cmd
    }
}

impl Compiler for MrbcCompiler {
    async fn compile(&self, source: &Path, destination: &Path) -> Result<(), CompileError> {
        debug!(
            "Compiling {} -> {}",
            source.display(),
            destination.display()
        );

        let output = self
            .create_command(source, destination)
            .output()
            .await
            .context(SpawnSnafu {
                program: self.program.display().to_string(),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let diagnostic = if stderr.is_empty() {
            format!("exit code {}", output.status.code().unwrap_or(-1))
        } else {
            stderr
        };

        FailedSnafu {
            path: source,
            diagnostic,
        }
        .fail()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn test_failing_compiler_reports_exit_code() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a.rb");
        std::fs::write(&source, "puts 1").expect("Failed to write");

        let result = MrbcCompiler::with_program("false")
            .compile(&source, &temp_dir.path().join("a.mrb"))
            .await;

        match result {
            Err(CompileError::Failed { path, diagnostic }) => {
                assert_eq!(path, source);
                assert_eq!(diagnostic, "exit code 1");
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[compio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = MrbcCompiler::with_program("/nonexistent/mrbc")
            .compile(
                &temp_dir.path().join("a.rb"),
                &temp_dir.path().join("a.mrb"),
            )
            .await;

        assert!(matches!(result, Err(CompileError::SpawnError { .. })));
    }

    #[compio::test]
    async fn test_successful_compiler() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let result = MrbcCompiler::with_program("true")
            .compile(
                &temp_dir.path().join("a.rb"),
                &temp_dir.path().join("a.mrb"),
            )
            .await;

        assert!(result.is_ok());
    }
}
