//! Config command handler: show effective configuration.

use crate::app::config_runtime::{RuntimeSettings, verbosity_label};
use crate::app_config::LoadedConfig;

pub(crate) fn run_config_show_command(settings: &RuntimeSettings, loaded_config: &LoadedConfig) {
    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("base_url = {}", settings.base_url);
    println!("index_path = {}", settings.index_path);
    println!(
        "site_dir = {}",
        settings
            .site_dir
            .as_ref()
            .map_or_else(|| "<none>".to_string(), |dir| dir.display().to_string())
    );
    println!(
        "output_dir = {}",
        settings
            .output_dir
            .as_ref()
            .map_or_else(|| ".".to_string(), |dir| dir.display().to_string())
    );
    println!("connect_timeout_secs = {}", settings.timeouts.connect_secs);
    println!("read_timeout_secs = {}", settings.timeouts.read_secs);
    println!(
        "verbosity = {}",
        verbosity_label(settings.verbose, settings.quiet)
    );
}
