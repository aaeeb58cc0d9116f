//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pastpapers_core::{ExamKind, Language};
use url::Url;

/// Browse and bundle Hong Kong public examination past papers.
///
/// Reads the paper index published with the site, groups subjects by
/// category, lists years and files per exam and language, and bundles a
/// year's papers into one zip archive.
#[derive(Parser, Debug)]
#[command(name = "pastpapers")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Site base URL the index and papers are served from
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<Url>,

    /// Index document path relative to the site root
    #[arg(long, value_name = "PATH", global = true)]
    pub index_path: Option<String>,

    /// Read the index and papers from a local site checkout instead of HTTP
    #[arg(long, value_name = "DIR", global = true)]
    pub site_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List subjects grouped by category
    Subjects(SubjectsArgs),

    /// Show the years and files of one subject
    Years(YearsArgs),

    /// Bundle one year's files into a zip archive
    Bundle(BundleArgs),

    /// Generate the index document from a paper directory tree
    Index(IndexArgs),

    /// Show the effective configuration
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct SubjectsArgs {
    /// Display language for subject and category names (zh, en)
    #[arg(long = "lang", default_value = "zh")]
    pub language: Language,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct YearsArgs {
    /// Subject key or name (e.g. phy, Physics, 物理)
    pub subject: String,

    /// Exam system (dse, ce, al)
    #[arg(long, default_value = "dse")]
    pub exam: ExamKind,

    /// Paper language (zh, en)
    #[arg(long = "lang", default_value = "zh")]
    pub language: Language,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BundleArgs {
    /// Subject key or name
    pub subject: String,

    /// Year label as shown by `years` (e.g. 2020, SP)
    pub year: String,

    /// Exam system (dse, ce, al)
    #[arg(long, default_value = "dse")]
    pub exam: ExamKind,

    /// Paper language (zh, en)
    #[arg(long = "lang", default_value = "zh")]
    pub language: Language,

    /// Directory the archive is written to (default: current directory)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Paper tree root laid out as subject/exam/lang/year/file
    pub root: PathBuf,

    /// Directory file paths are made relative to (default: parent of ROOT)
    #[arg(long, value_name = "DIR")]
    pub site_root: Option<PathBuf>,

    /// Write the index here, with stats.json and subjects/ beside it, instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_subjects_defaults() {
        let cli = Cli::try_parse_from(["pastpapers", "subjects"]).unwrap();
        assert_eq!(cli.global.verbose, 0);
        assert!(!cli.global.quiet);
        let Command::Subjects(args) = cli.command else {
            panic!("expected subjects command");
        };
        assert_eq!(args.language, Language::Zh);
        assert!(!args.json);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["pastpapers", "-vv", "subjects"]).unwrap();
        assert_eq!(cli.global.verbose, 2);

        let cli = Cli::try_parse_from(["pastpapers", "subjects", "--verbose"]).unwrap();
        assert_eq!(cli.global.verbose, 1);
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pastpapers",
            "years",
            "phy",
            "--base-url",
            "https://papers.example.com/",
            "--index-path",
            "data/index.json",
        ])
        .unwrap();
        assert_eq!(
            cli.global.base_url.as_ref().map(Url::as_str),
            Some("https://papers.example.com/")
        );
        assert_eq!(cli.global.index_path.as_deref(), Some("data/index.json"));
    }

    #[test]
    fn test_cli_years_parses_exam_and_language() {
        let cli =
            Cli::try_parse_from(["pastpapers", "years", "Physics", "--exam", "ce", "--lang", "en"])
                .unwrap();
        let Command::Years(args) = cli.command else {
            panic!("expected years command");
        };
        assert_eq!(args.subject, "Physics");
        assert_eq!(args.exam, ExamKind::Ce);
        assert_eq!(args.language, Language::En);
    }

    #[test]
    fn test_cli_rejects_unknown_exam() {
        let result = Cli::try_parse_from(["pastpapers", "years", "phy", "--exam", "gce"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_rejects_invalid_base_url() {
        let result = Cli::try_parse_from(["pastpapers", "--base-url", "not a url", "subjects"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_bundle_requires_year() {
        let result = Cli::try_parse_from(["pastpapers", "bundle", "phy"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_bundle_output_dir() {
        let cli = Cli::try_parse_from(["pastpapers", "bundle", "phy", "2020", "-o", "/tmp/zips"])
            .unwrap();
        let Command::Bundle(args) = cli.command else {
            panic!("expected bundle command");
        };
        assert_eq!(args.year, "2020");
        assert_eq!(args.output_dir, Some(PathBuf::from("/tmp/zips")));
        assert_eq!(args.exam, ExamKind::Dse);
    }

    #[test]
    fn test_cli_index_args() {
        let cli = Cli::try_parse_from([
            "pastpapers",
            "index",
            "papers",
            "--site-root",
            ".",
            "--output",
            "public/data/index.json",
        ])
        .unwrap();
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };
        assert_eq!(args.root, PathBuf::from("papers"));
        assert_eq!(args.site_root, Some(PathBuf::from(".")));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["pastpapers"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Cli::try_parse_from(["pastpapers", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Cli::try_parse_from(["pastpapers", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
