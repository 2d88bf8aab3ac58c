use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::application::data::LogLevel;
use crate::remote::Repository;

/// Package manager for PicoRuby gems
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// The root directory of the project
    #[clap(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Do not look for a newer picogem release before running
    #[clap(long, global = true)]
    pub no_update_check: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download a gem from the remote repository
    Add(AddArgs),
    /// List the gems available in the remote repository
    List(ListArgs),
    /// Copy project sources onto a device's storage
    Sync(SyncArgs),
    /// Replace this executable with the latest release
    Update(UpdateArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add(_) => "add",
            Command::List(_) => "list",
            Command::Sync(_) => "sync",
            Command::Update(_) => "update",
        }
    }
}

/// Where gems are looked up; unset flags fall back to the project config
#[derive(Args, Debug, Clone, Default)]
pub struct RemoteArgs {
    /// Source repository, written OWNER/REPO
    #[clap(long, short)]
    pub repo: Option<Repository>,

    /// Branch, tag or commit to read from
    #[clap(long, short)]
    pub branch: Option<String>,

    /// Directory of the repository holding the gems
    #[clap(long, short = 'd')]
    pub dir: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Name of the gem to download
    pub package: String,

    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Directory the gem is installed into
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Compile Ruby sources to bytecode with mrbc while installing
    #[clap(long)]
    pub compile: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Mount point of the device storage
    pub storage: Option<PathBuf>,

    /// Keep running and copy files again whenever they change
    #[clap(long, short)]
    pub watch: bool,

    /// Milliseconds between two scans in watch mode
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Only report whether a newer release exists
    #[clap(long)]
    pub check: bool,
}
