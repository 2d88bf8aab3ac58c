//! One module per subcommand, each printing its own progress.

pub mod add;
pub mod list;
pub mod sync;
pub mod update;

pub use add::AddError;
pub use list::ListError;
pub use sync::SyncCommandError;
pub use update::UpdateError;
