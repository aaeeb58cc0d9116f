//! `bundle` command: zips one year's papers into the output directory.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use pastpapers_core::archive::FileFetcher;
use pastpapers_core::projection::format_year_label;
use pastpapers_core::{
    AppState, ArchiveBuilder, ArchiveOutcome, HttpFileFetcher, LocalFileFetcher, ProjectedYear,
};
use tracing::{info, warn};

use super::{http_client, load_catalog};
use crate::ProcessExit;
use crate::app::config_runtime::RuntimeSettings;
use crate::app::exit_handler::determine_exit_outcome;
use crate::app::progress_manager::{ProgressFetcher, bundle_progress};
use crate::app::subject_lookup::find_subject;
use crate::app::terminal;
use crate::cli::BundleArgs;

pub(crate) async fn run_bundle_command(
    args: &BundleArgs,
    settings: &RuntimeSettings,
) -> Result<ProcessExit> {
    let mut state = load_catalog(settings).await?;
    let key = find_subject(state.subjects(), &args.subject)?.key.clone();
    state.select_subject(&key);
    state.switch_exam(args.exam);
    state.switch_language(args.language);

    let years = state.sorted_years();
    let year = select_year(&years, &args.year)?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| settings.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    info!(
        subject = %key,
        year = %year.year,
        files = year.files.len(),
        output_dir = %output_dir.display(),
        "Bundling papers"
    );

    let use_progress = terminal::should_use_progress(
        io::stderr().is_terminal(),
        settings.quiet,
        terminal::is_dumb_terminal(),
    );
    let progress = bundle_progress(use_progress, year.files.len());

    let outcome = if let Some(site_dir) = &settings.site_dir {
        let fetcher =
            ProgressFetcher::new(LocalFileFetcher::new(site_dir.clone()), progress.clone());
        bundle_year(&mut state, fetcher, output_dir, year).await
    } else {
        let fetcher = ProgressFetcher::new(
            HttpFileFetcher::new(http_client(settings)?, settings.base_url.clone()),
            progress.clone(),
        );
        bundle_year(&mut state, fetcher, output_dir, year).await
    };
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    let outcome = outcome?;

    for skipped in &outcome.skipped {
        warn!(file = %skipped.name, reason = %skipped.reason, "Not included in archive");
    }
    println!("Saved {}", outcome.location);
    println!(
        "{} file(s) included, {} skipped",
        outcome.included.len(),
        outcome.skipped.len()
    );

    Ok(determine_exit_outcome(
        outcome.included.len(),
        outcome.skipped.len(),
    ))
}

async fn bundle_year(
    state: &mut AppState,
    fetcher: impl FileFetcher + 'static,
    output_dir: PathBuf,
    year: &ProjectedYear,
) -> Result<ArchiveOutcome> {
    let builder = ArchiveBuilder::zip_to_directory(fetcher, output_dir);
    match state.download_year(&builder, year).await {
        Some(outcome) => Ok(outcome),
        None => Err(anyhow!(
            "{}",
            state
                .take_alert()
                .unwrap_or_else(|| "Bundling failed".to_string())
        )),
    }
}

/// Matches a year by its raw label or its compact label (`SP`, `PP`).
fn select_year<'a>(years: &'a [ProjectedYear], wanted: &str) -> Result<&'a ProjectedYear> {
    let wanted = wanted.trim();
    if let Some(year) = years.iter().find(|year| {
        year.year.eq_ignore_ascii_case(wanted)
            || format_year_label(&year.year).eq_ignore_ascii_case(wanted)
    }) {
        return Ok(year);
    }

    if years.is_empty() {
        bail!("No papers available for this exam and language");
    }
    let available = years
        .iter()
        .map(|year| format_year_label(&year.year))
        .collect::<Vec<_>>()
        .join(", ");
    bail!("Year '{wanted}' not found. Available: {available}");
}
