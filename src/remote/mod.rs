//! Remote trees: the listing capability, its GitHub implementation and the
//! recursive mirror built on top of it.

mod fetcher;
mod github;
mod remote_tree;
mod repository;

pub use fetcher::{FetchError, FetchReport, RemoteTreeFetcher};
pub use github::GithubRemote;
pub use remote_tree::{RemoteError, RemoteTree};
pub use repository::{Repository, RepositoryParseError};
