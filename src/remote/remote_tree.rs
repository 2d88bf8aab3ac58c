use snafu::Snafu;

use crate::filesystem::TreeEntry;

/// A hierarchical file listing that can be walked and read.
///
/// Paths are `/`-separated and relative to the root of the tree.
pub trait RemoteTree {
    /// Lists the direct children of `path`, in the order the remote returns them
    async fn list(&self, path: &str) -> Result<Vec<TreeEntry>, RemoteError>;
    /// Reads the raw bytes of the file at `path`
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, RemoteError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum RemoteError {
    #[snafu(display("HTTP {} from {}", status, url))]
    Status { url: String, status: u16 },
    #[snafu(display("Request to {} failed: {}", url, message))]
    Transport { url: String, message: String },
    #[snafu(display("Failed to read the response from {}", url))]
    Decode {
        url: String,
        source: std::io::Error,
    },
}

impl RemoteError {
    /// The HTTP status, when the remote answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
