//! One-way synchronization of local sources to a storage device, either as a
//! single pass or as a polling watch loop.

mod enumerate;
mod snapshot;
mod sync;
mod watch;

pub use sync::{LocalTreeSync, SyncError, SyncReport};
pub use watch::DEFAULT_POLL_INTERVAL;
