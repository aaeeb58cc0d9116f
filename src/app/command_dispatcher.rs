//! CLI command routing: runs the handler for the parsed subcommand.
//!
//! Only `bundle` can end in a partial or failed outcome; every other handler
//! either succeeds or returns an error.

use anyhow::Result;

use crate::app::config_runtime::RuntimeSettings;
use crate::app_config::LoadedConfig;
use crate::cli::{Cli, Command};
use crate::{ProcessExit, commands};

pub(crate) async fn dispatch(
    cli: &Cli,
    settings: &RuntimeSettings,
    loaded_config: &LoadedConfig,
) -> Result<ProcessExit> {
    match &cli.command {
        Command::Subjects(args) => {
            commands::run_subjects_command(args, settings).await?;
        }
        Command::Years(args) => {
            commands::run_years_command(args, settings).await?;
        }
        Command::Bundle(args) => {
            return commands::run_bundle_command(args, settings).await;
        }
        Command::Index(args) => {
            commands::run_index_command(args).await?;
        }
        Command::Config => {
            commands::run_config_show_command(settings, loaded_config);
        }
    }

    Ok(ProcessExit::Success)
}
