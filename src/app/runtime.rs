use anyhow::Result;
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::{command_dispatcher, config_runtime, terminal};
use crate::app_config::load_default_file_config;

pub(crate) async fn run_pastpapers() -> Result<ProcessExit> {
    let (cli, cli_sources) = config_runtime::parse_cli_with_sources();

    let loaded_config = load_default_file_config()?;
    let settings = config_runtime::resolve_runtime_settings(
        &cli.global,
        &cli_sources,
        loaded_config.config.as_ref(),
    )?;

    let default_level = config_runtime::resolve_default_log_level(&settings);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli_sources);
    let no_color = terminal::should_disable_color(
        terminal::no_color_env_requested(),
        terminal::is_dumb_terminal(),
    );
    terminal::init_tracing(default_level, force_cli_log_level, no_color);

    debug!(
        config_loaded = loaded_config.loaded_from_file,
        base_url = %settings.base_url,
        "CLI arguments parsed"
    );
    info!("pastpapers starting");

    command_dispatcher::dispatch(&cli, &settings, &loaded_config).await
}
