use std::io::Read;

use serde::Deserialize;
use snafu::ResultExt;
use tracing::debug;

use super::remote_tree::{DecodeSnafu, RemoteError, RemoteTree, StatusSnafu, TransportSnafu};
use super::repository::Repository;
use crate::filesystem::{EntryKind, TreeEntry};

const API_BASE: &str = "https://api.github.com";
const RAW_BASE: &str = "https://raw.githubusercontent.com";
const RELEASE_BASE: &str = "https://github.com";

/// Optional bearer token for higher rate limits
const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const ACCEPT_JSON: &str = "application/vnd.github.v3+json";
const ACCEPT_BINARY: &str = "application/octet-stream";

/// A GitHub repository at a fixed ref, read through the contents API and the
/// raw content host.
///
/// Requests are blocking and made one at a time on the calling thread.
#[derive(Debug, Clone)]
pub struct GithubRemote {
    agent: ureq::Agent,
    repository: Repository,
    reference: String,
    token: Option<String>,
}

impl GithubRemote {
    /// Creates a remote for `repository` at `reference`, picking up the token
    /// from the environment when one is set.
    pub fn new(repository: Repository, reference: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("picogem/", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            agent,
            repository,
            reference: reference.into(),
            token: token_from_env(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.is_empty());
        self
    }

    /// Tag of the latest published release, without a leading `v`
    pub fn latest_release(&self) -> Result<String, RemoteError> {
        let url = self.latest_release_url();
        let release: Release = self
            .get(&url, ACCEPT_JSON)?
            .into_json()
            .context(DecodeSnafu { url: url.as_str() })?;

        Ok(release
            .tag_name
            .strip_prefix('v')
            .unwrap_or(&release.tag_name)
            .to_string())
    }

    /// Downloads a release asset of `tag`
    pub fn download_release_asset(&self, tag: &str, asset: &str) -> Result<Vec<u8>, RemoteError> {
        let url = self.release_asset_url(tag, asset);
        self.get_bytes(&url, ACCEPT_BINARY)
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{API_BASE}/repos/{}/{}/contents/{}?ref={}",
            self.repository.owner,
            self.repository.name,
            path.trim_matches('/'),
            self.reference
        )
    }

    fn raw_url(&self, path: &str) -> String {
        format!(
            "{RAW_BASE}/{}/{}/{}/{}",
            self.repository.owner,
            self.repository.name,
            self.reference,
            path.trim_matches('/')
        )
    }

    fn latest_release_url(&self) -> String {
        format!(
            "{API_BASE}/repos/{}/{}/releases/latest",
            self.repository.owner, self.repository.name
        )
    }

    fn release_asset_url(&self, tag: &str, asset: &str) -> String {
        format!(
            "{RELEASE_BASE}/{}/{}/releases/download/v{tag}/{asset}",
            self.repository.owner, self.repository.name
        )
    }

    fn headers(&self, accept: &'static str) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Accept", accept.to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    fn get(&self, url: &str, accept: &'static str) -> Result<ureq::Response, RemoteError> {
        debug!("Requesting {url}");
        let request = self
            .headers(accept)
            .into_iter()
            .fold(self.agent.get(url), |request, (name, value)| {
                request.set(name, &value)
            });

        match request.call() {
            Ok(response) if response.status() == 200 => {
                debug!("Response status: {}", response.status());
                Ok(response)
            }
            Ok(response) => StatusSnafu {
                url,
                status: response.status(),
            }
            .fail(),
            Err(ureq::Error::Status(status, _)) => StatusSnafu { url, status }.fail(),
            Err(ureq::Error::Transport(transport)) => TransportSnafu {
                url,
                message: transport.to_string(),
            }
            .fail(),
        }
    }

    fn get_bytes(&self, url: &str, accept: &'static str) -> Result<Vec<u8>, RemoteError> {
        let mut bytes = Vec::new();
        self.get(url, accept)?
            .into_reader()
            .read_to_end(&mut bytes)
            .context(DecodeSnafu { url })?;
        Ok(bytes)
    }
}

impl RemoteTree for GithubRemote {
    async fn list(&self, path: &str) -> Result<Vec<TreeEntry>, RemoteError> {
        let url = self.contents_url(path);
        let items: Vec<ContentItem> = self
            .get(&url, ACCEPT_JSON)?
            .into_json()
            .context(DecodeSnafu { url: url.as_str() })?;

        Ok(into_tree_entries(items))
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
        self.get_bytes(&self.raw_url(path), ACCEPT_BINARY)
    }
}

/// One element of a contents API directory listing
#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

fn into_tree_entries(items: Vec<ContentItem>) -> Vec<TreeEntry> {
    items
        .into_iter()
        .filter_map(|item| {
            let kind = match item.kind.as_str() {
                "file" => EntryKind::File,
                "dir" => EntryKind::Directory,
                other => {
                    debug!("Skipping {} entry '{}'", other, item.path);
                    return None;
                }
            };
            Some(TreeEntry {
                name: item.name,
                path: item.path,
                kind,
            })
        })
        .collect()
}

fn token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV_VAR)
        .ok()
        .filter(|token| !token.is_empty())
}
