use std::path::{Path, PathBuf};
use std::time::Duration;

use compio::fs;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::remote::{Repository, RepositoryParseError};

const CONFIG_FILE_NAME: &str = "picogem.yaml";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Per-project defaults read from `picogem.yaml`.
///
/// Every key is optional; command-line flags take precedence over whatever
/// is set here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub repository: Option<Repository>,
    pub branch: Option<String>,
    pub gems_dir: Option<String>,
    pub output: Option<PathBuf>,
    pub storage: Option<PathBuf>,
    pub poll_interval: Option<Duration>,
}

impl ProjectConfig {
    /// Reads the config file of the project at `root`, if there is one
    pub async fn read(root: &Path) -> Result<Self, ConfigError> {
        let path = get_config_file_path(root);
        if !path.exists() {
            debug!(
                "No {} found in {}, using defaults",
                CONFIG_FILE_NAME,
                root.best_effort_path_display()
            );
            return Ok(Self::default());
        }

        Self::from_path(path).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, ConfigError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = fs::read(&path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;

        contents.as_str().try_into()
    }

    fn apply_entry(&mut self, key: &str, value: &Yaml) -> Result<(), ConfigError> {
        match key {
            "repository" => {
                let repository = string_value(key, value)?
                    .parse()
                    .context(InvalidRepositorySnafu)?;
                self.repository = Some(repository);
            }
            "branch" => self.branch = Some(string_value(key, value)?.to_string()),
            "gems_dir" => self.gems_dir = Some(string_value(key, value)?.to_string()),
            "output" => self.output = Some(PathBuf::from(string_value(key, value)?)),
            "storage" => self.storage = Some(PathBuf::from(string_value(key, value)?)),
            "poll_interval_ms" => {
                self.poll_interval = Some(Duration::from_millis(positive_value(key, value)?));
            }
            other => debug!("Ignoring unknown config key '{}'", other),
        }
        Ok(())
    }
}

impl TryFrom<&str> for ProjectConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;

        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(Self::default());
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let mut config = Self::default();
        for (key, value) in top_level.iter() {
            match key.as_str() {
                Some(key) => config.apply_entry(key, value)?,
                None => debug!("Skipping non-string config key: {:?}", key),
            }
        }

        Ok(config)
    }
}

fn string_value<'a>(key: &str, value: &'a Yaml) -> Result<&'a str, ConfigError> {
    value.as_str().context(InvalidValueSnafu {
        key,
        expected: "a string",
    })
}

fn positive_value(key: &str, value: &Yaml) -> Result<u64, ConfigError> {
    match value {
        Yaml::Value(Scalar::Integer(number)) if *number > 0 => Ok(*number as u64),
        _ => InvalidValueSnafu {
            key,
            expected: "a positive integer",
        }
        .fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config key '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
    #[snafu(display("Config key 'repository' is invalid"))]
    InvalidRepository { source: RepositoryParseError },
}
