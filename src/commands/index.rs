//! `index` command: scans a paper tree and emits the index document.

use anyhow::{Context, Result};
use pastpapers_core::{IndexOptions, build_index};
use tracing::info;

use crate::cli::IndexArgs;

pub(crate) async fn run_index_command(args: &IndexArgs) -> Result<()> {
    let root = args.root.clone();
    let options = IndexOptions {
        site_root: args.site_root.clone(),
    };

    let document = tokio::task::spawn_blocking(move || build_index(&root, &options))
        .await
        .context("Index task did not complete")??;

    match &args.output {
        Some(path) => {
            let written = document.write_site_data(path)?;
            info!(path = %path.display(), files = written.len(), "Index written");
        }
        None => println!("{}", document.to_json()?),
    }
    Ok(())
}
