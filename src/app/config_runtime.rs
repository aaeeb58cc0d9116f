use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};
use pastpapers_core::http::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use pastpapers_core::source::DEFAULT_INDEX_PATH;
use url::Url;

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{Cli, GlobalArgs};

/// Site used when neither the command line nor the config names one.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HttpTimeoutSettings {
    pub(crate) connect_secs: u64,
    pub(crate) read_secs: u64,
}

impl Default for HttpTimeoutSettings {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Settings after merging command line, config file and defaults.
#[derive(Debug, Clone)]
pub(crate) struct RuntimeSettings {
    pub(crate) base_url: Url,
    pub(crate) index_path: String,
    pub(crate) site_dir: Option<PathBuf>,
    /// Output directory from the config file; `bundle -o` overrides it.
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) verbose: u8,
    pub(crate) quiet: bool,
    pub(crate) timeouts: HttpTimeoutSettings,
}

pub(crate) fn parse_cli_with_sources() -> (Cli, CliValueSources) {
    let command = Cli::command();
    let matches = command.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    let sources = CliValueSources {
        verbose: is_commandline_value(&matches, "verbose"),
        quiet: is_commandline_value(&matches, "quiet"),
    };
    (cli, sources)
}

/// Global args may be given before or after the subcommand, so the
/// subcommand's matches are checked too.
fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    let here = matches.try_contains_id(id).unwrap_or(false)
        && matches.value_source(id) == Some(ValueSource::CommandLine);
    here || matches
        .subcommand()
        .is_some_and(|(_, sub_matches)| is_commandline_value(sub_matches, id))
}

pub(crate) fn resolve_runtime_settings(
    global: &GlobalArgs,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<RuntimeSettings> {
    let base_url = match global
        .base_url
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.base_url.clone()))
    {
        Some(url) => url,
        None => Url::parse(DEFAULT_BASE_URL)
            .with_context(|| format!("Invalid default base URL '{DEFAULT_BASE_URL}'"))?,
    };
    let index_path = global
        .index_path
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.index_path.clone()))
        .unwrap_or_else(|| DEFAULT_INDEX_PATH.to_string());
    let site_dir = global
        .site_dir
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.site_dir.clone()));

    let mut settings = RuntimeSettings {
        base_url,
        index_path,
        site_dir,
        output_dir: file_config.and_then(|cfg| cfg.output_dir.clone()),
        verbose: global.verbose,
        quiet: global.quiet,
        timeouts: resolve_http_timeouts(file_config),
    };

    if !cli_sources.verbose
        && !cli_sources.quiet
        && let Some(verbosity) = file_config.and_then(|cfg| cfg.verbosity)
    {
        apply_config_verbosity(&mut settings, verbosity);
    }

    Ok(settings)
}

fn apply_config_verbosity(settings: &mut RuntimeSettings, verbosity: VerbositySetting) {
    let (verbose, quiet) = match verbosity {
        VerbositySetting::Default => (0, false),
        VerbositySetting::Verbose => (1, false),
        VerbositySetting::Quiet => (0, true),
        VerbositySetting::Debug => (2, false),
    };
    settings.verbose = verbose;
    settings.quiet = quiet;
}

pub(crate) fn resolve_http_timeouts(file_config: Option<&FileConfig>) -> HttpTimeoutSettings {
    let mut settings = HttpTimeoutSettings::default();
    let Some(file_config) = file_config else {
        return settings;
    };

    if let Some(value) = file_config.connect_timeout_secs {
        settings.connect_secs = value;
    }
    if let Some(value) = file_config.read_timeout_secs {
        settings.read_secs = value;
    }
    settings
}

pub(crate) fn resolve_default_log_level(settings: &RuntimeSettings) -> &'static str {
    if settings.quiet {
        "error"
    } else {
        match settings.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}

pub(crate) fn verbosity_label(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        VerbositySetting::Quiet.as_str()
    } else if verbose == 0 {
        VerbositySetting::Default.as_str()
    } else if verbose == 1 {
        VerbositySetting::Verbose.as_str()
    } else {
        VerbositySetting::Debug.as_str()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with(mutate: impl FnOnce(&mut FileConfig)) -> FileConfig {
        let mut cfg = FileConfig::default();
        mutate(&mut cfg);
        cfg
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = resolve_runtime_settings(
            &GlobalArgs::default(),
            &CliValueSources::default(),
            None,
        )
        .unwrap();
        assert_eq!(settings.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(settings.index_path, DEFAULT_INDEX_PATH);
        assert!(settings.site_dir.is_none());
        assert_eq!(settings.timeouts, HttpTimeoutSettings::default());
        assert_eq!(resolve_default_log_level(&settings), "info");
    }

    #[test]
    fn test_config_fills_unset_cli_values() {
        let cfg = config_with(|cfg| {
            cfg.base_url = Some(Url::parse("https://papers.example.com/").unwrap());
            cfg.index_path = Some("data/index.json".to_string());
            cfg.output_dir = Some(PathBuf::from("/tmp/zips"));
            cfg.read_timeout_secs = Some(30);
        });
        let settings = resolve_runtime_settings(
            &GlobalArgs::default(),
            &CliValueSources::default(),
            Some(&cfg),
        )
        .unwrap();
        assert_eq!(settings.base_url.as_str(), "https://papers.example.com/");
        assert_eq!(settings.index_path, "data/index.json");
        assert_eq!(settings.output_dir, Some(PathBuf::from("/tmp/zips")));
        assert_eq!(settings.timeouts.read_secs, 30);
        assert_eq!(settings.timeouts.connect_secs, CONNECT_TIMEOUT_SECS);
    }

    #[test]
    fn test_cli_values_win_over_config() {
        let cfg = config_with(|cfg| {
            cfg.base_url = Some(Url::parse("https://config.example.com/").unwrap());
            cfg.site_dir = Some(PathBuf::from("/srv/config"));
        });
        let global = GlobalArgs {
            base_url: Some(Url::parse("https://cli.example.com/").unwrap()),
            site_dir: Some(PathBuf::from("/srv/cli")),
            ..GlobalArgs::default()
        };
        let settings =
            resolve_runtime_settings(&global, &CliValueSources::default(), Some(&cfg)).unwrap();
        assert_eq!(settings.base_url.as_str(), "https://cli.example.com/");
        assert_eq!(settings.site_dir, Some(PathBuf::from("/srv/cli")));
    }

    #[test]
    fn test_config_verbosity_applies_without_cli_flags() {
        let cfg = config_with(|cfg| cfg.verbosity = Some(VerbositySetting::Quiet));
        let settings = resolve_runtime_settings(
            &GlobalArgs::default(),
            &CliValueSources::default(),
            Some(&cfg),
        )
        .unwrap();
        assert!(settings.quiet);
        assert_eq!(resolve_default_log_level(&settings), "error");
    }

    #[test]
    fn test_cli_verbose_flag_overrides_config_verbosity() {
        let cfg = config_with(|cfg| cfg.verbosity = Some(VerbositySetting::Quiet));
        let global = GlobalArgs {
            verbose: 1,
            ..GlobalArgs::default()
        };
        let sources = CliValueSources {
            verbose: true,
            quiet: false,
        };
        let settings = resolve_runtime_settings(&global, &sources, Some(&cfg)).unwrap();
        assert!(!settings.quiet);
        assert_eq!(resolve_default_log_level(&settings), "debug");
        assert!(should_force_cli_log_level(&sources));
    }

    #[test]
    fn test_config_debug_verbosity_is_trace() {
        let cfg = config_with(|cfg| cfg.verbosity = Some(VerbositySetting::Debug));
        let settings = resolve_runtime_settings(
            &GlobalArgs::default(),
            &CliValueSources::default(),
            Some(&cfg),
        )
        .unwrap();
        assert_eq!(resolve_default_log_level(&settings), "trace");
    }

    #[test]
    fn test_verbosity_label() {
        assert_eq!(verbosity_label(0, false), "default");
        assert_eq!(verbosity_label(1, false), "verbose");
        assert_eq!(verbosity_label(3, false), "debug");
        assert_eq!(verbosity_label(0, true), "quiet");
    }
}
