use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::RemoteArgs;
use crate::config::ProjectConfig;
use crate::local_sync::DEFAULT_POLL_INTERVAL;
use crate::remote::Repository;

pub const DEFAULT_OWNER: &str = "picoruby";
pub const DEFAULT_REPOSITORY: &str = "picoruby";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_GEMS_DIR: &str = "runtime_gems";
pub const DEFAULT_OUTPUT_DIR: &str = "lib";

/// Settings shared by every command: the project root and what
/// `picogem.yaml` says about it
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub project: ProjectConfig,
}

impl RuntimeConfig {
    pub fn new(root: PathBuf, project: ProjectConfig) -> Self {
        Self { root, project }
    }

    /// Where gems are read from, flags first, then the project file, then
    /// the built-in defaults
    pub fn remote_settings(&self, args: &RemoteArgs) -> RemoteSettings {
        RemoteSettings {
            repository: args
                .repo
                .clone()
                .or_else(|| self.project.repository.clone())
                .unwrap_or_else(|| Repository::new(DEFAULT_OWNER, DEFAULT_REPOSITORY)),
            branch: args
                .branch
                .clone()
                .or_else(|| self.project.branch.clone())
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            gems_dir: args
                .dir
                .clone()
                .or_else(|| self.project.gems_dir.clone())
                .unwrap_or_else(|| DEFAULT_GEMS_DIR.to_string()),
        }
    }

    /// Install directory for gems, relative paths taken from the project root
    pub fn output_dir(&self, flag: Option<&Path>) -> PathBuf {
        let output = flag
            .map(Path::to_path_buf)
            .or_else(|| self.project.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        self.root.join(output)
    }

    pub fn storage(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf)
            .or_else(|| self.project.storage.clone())
    }

    pub fn poll_interval(&self, flag_ms: Option<u64>) -> Duration {
        flag_ms
            .map(Duration::from_millis)
            .or(self.project.poll_interval)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub repository: Repository,
    pub branch: String,
    pub gems_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectConfig {
        ProjectConfig {
            repository: Some(Repository::new("mruby", "mruby")),
            branch: Some("stable".to_string()),
            gems_dir: None,
            output: Some(PathBuf::from("vendor")),
            storage: Some(PathBuf::from("/mnt/pico")),
            poll_interval: Some(Duration::from_millis(300)),
        }
    }

    #[test]
    fn test_defaults_without_flags_or_project_file() {
        let config = RuntimeConfig::new(PathBuf::from("app"), ProjectConfig::default());

        assert_eq!(
            config.remote_settings(&RemoteArgs::default()),
            RemoteSettings {
                repository: Repository::new("picoruby", "picoruby"),
                branch: "master".to_string(),
                gems_dir: "runtime_gems".to_string(),
            }
        );
        assert_eq!(config.output_dir(None), PathBuf::from("app").join("lib"));
        assert_eq!(config.storage(None), None);
        assert_eq!(config.poll_interval(None), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let config = RuntimeConfig::new(PathBuf::from("app"), project());

        let settings = config.remote_settings(&RemoteArgs::default());

        assert_eq!(settings.repository, Repository::new("mruby", "mruby"));
        assert_eq!(settings.branch, "stable");
        assert_eq!(settings.gems_dir, "runtime_gems");
        assert_eq!(config.output_dir(None), PathBuf::from("app").join("vendor"));
        assert_eq!(config.storage(None), Some(PathBuf::from("/mnt/pico")));
        assert_eq!(config.poll_interval(None), Duration::from_millis(300));
    }

    #[test]
    fn test_flags_override_project_file() {
        let config = RuntimeConfig::new(PathBuf::from("app"), project());
        let args = RemoteArgs {
            repo: Some(Repository::new("me", "gems")),
            branch: Some("dev".to_string()),
            dir: Some("mrbgems".to_string()),
        };

        let settings = config.remote_settings(&args);

        assert_eq!(settings.repository, Repository::new("me", "gems"));
        assert_eq!(settings.branch, "dev");
        assert_eq!(settings.gems_dir, "mrbgems");
        assert_eq!(
            config.output_dir(Some(Path::new("out"))),
            PathBuf::from("app").join("out")
        );
        assert_eq!(
            config.storage(Some(Path::new("/media/pico"))),
            Some(PathBuf::from("/media/pico"))
        );
        assert_eq!(config.poll_interval(Some(50)), Duration::from_millis(50));
    }

    #[test]
    fn test_absolute_output_ignores_root() {
        let config = RuntimeConfig::new(PathBuf::from("app"), ProjectConfig::default());

        assert_eq!(
            config.output_dir(Some(Path::new("/opt/gems"))),
            PathBuf::from("/opt/gems")
        );
    }
}
