//! CLI command handlers.

mod bundle;
mod config;
mod index;
mod subjects;
mod years;

pub(crate) use bundle::run_bundle_command;
pub(crate) use config::run_config_show_command;
pub(crate) use index::run_index_command;
pub(crate) use subjects::run_subjects_command;
pub(crate) use years::run_years_command;

use anyhow::{Result, bail};
use pastpapers_core::{AppState, HttpClient, IndexClient, LocalIndex};
use tracing::debug;

use crate::app::config_runtime::RuntimeSettings;

pub(crate) fn http_client(settings: &RuntimeSettings) -> Result<HttpClient> {
    Ok(HttpClient::with_timeouts(
        settings.timeouts.connect_secs,
        settings.timeouts.read_secs,
    )?)
}

/// Loads the catalog from the local site checkout when configured, else over HTTP.
pub(crate) async fn load_catalog(settings: &RuntimeSettings) -> Result<AppState> {
    let mut state = AppState::new();

    if let Some(site_dir) = &settings.site_dir {
        let index_file = site_dir.join(settings.index_path.trim_start_matches('/'));
        debug!(path = %index_file.display(), "Loading local index");
        state.load_data(&LocalIndex::new(index_file)).await;
    } else {
        let client = IndexClient::for_site(
            http_client(settings)?,
            &settings.base_url,
            &settings.index_path,
        )?;
        debug!(url = %client.index_url(), "Loading index");
        state.load_data(&client).await;
    }

    if let Some(error) = state.error() {
        bail!("{error}");
    }
    Ok(state)
}
