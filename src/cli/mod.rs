mod cli;

pub use cli::{AddArgs, Cli, Command, ListArgs, RemoteArgs, SyncArgs, UpdateArgs};
