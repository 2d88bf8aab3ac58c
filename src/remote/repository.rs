use std::str::FromStr;

use derive_more::Display;
use snafu::{Snafu, ensure};

/// A GitHub repository, written `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{owner}/{name}")]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for Repository {
    type Err = RepositoryParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (owner, name) = value
            .split_once('/')
            .ok_or_else(|| RepositoryParseError::MissingSlash {
                value: value.to_string(),
            })?;

        ensure!(
            !owner.is_empty() && !name.is_empty() && !name.contains('/'),
            MalformedSnafu { value }
        );

        Ok(Self::new(owner, name))
    }
}

#[derive(Debug, Snafu)]
pub enum RepositoryParseError {
    #[snafu(display("Repository '{}' must be written as OWNER/REPO", value))]
    MissingSlash { value: String },
    #[snafu(display("Repository '{}' is not a valid OWNER/REPO pair", value))]
    Malformed { value: String },
}
