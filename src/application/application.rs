use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;

use crate::application::RuntimeConfig;
use crate::cli::{Cli, Command};
use crate::commands::{self, AddError, ListError, SyncCommandError, UpdateError};
use crate::config::{ConfigError, ProjectConfig};
use crate::output;
use crate::update::{self, CURRENT_VERSION};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let Cli {
            command,
            root,
            no_update_check,
            ..
        } = cli;

        let project = ProjectConfig::read(&root).await.context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", project);
        let config = RuntimeConfig::new(root, project);

        if !no_update_check && !matches!(command, Command::Update(_)) {
            Self::notify_about_updates();
        }

        debug!("Running command '{}'", command.name());
        match command {
            Command::Add(args) => commands::add::run(&config, args).await.context(AddSnafu)?,
            Command::List(args) => commands::list::run(&config, args).await.context(ListSnafu)?,
            Command::Sync(args) => commands::sync::run(&config, args).await.context(SyncSnafu)?,
            Command::Update(args) => commands::update::run(args).await.context(UpdateSnafu)?,
        }

        Ok(())
    }

    fn notify_about_updates() {
        if let Some(latest) = update::check_for_updates(&update::release_remote()) {
            output::line(format!(
                "New version available: {latest} (current: {CURRENT_VERSION})"
            ));
            output::line("To update, run: picogem update");
            output::blank();
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    Config { source: ConfigError },
    #[snafu(display("Failed to add the gem"))]
    Add { source: AddError },
    #[snafu(display("Failed to list the gems"))]
    List { source: ListError },
    #[snafu(display("Failed to sync to storage"))]
    Sync { source: SyncCommandError },
    #[snafu(display("Failed to update picogem"))]
    Update { source: UpdateError },
}
