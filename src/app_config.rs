//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use url::Url;

/// TOML-backed file configuration for pastpapers defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Site the index and papers are served from.
    pub base_url: Option<Url>,
    /// Index document location relative to the site root.
    pub index_path: Option<String>,
    /// Local site checkout to read instead of the network.
    pub site_dir: Option<PathBuf>,
    /// Default output directory for bundled archives.
    pub output_dir: Option<PathBuf>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// Optional HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Optional HTTP read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url
            && !matches!(base_url.scheme(), "http" | "https")
        {
            bail!(
                "Invalid config value for `base_url`: {base_url}. \
                 Expected an http(s) URL; use `site_dir` for local checkouts"
            );
        }
        if let Some(index_path) = &self.index_path
            && index_path.trim().is_empty()
        {
            bail!("Invalid config value for `index_path`: must not be empty");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/pastpapers/config.toml`
/// 2. `$HOME/.config/pastpapers/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("pastpapers")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("pastpapers")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let line_number = line_index + 1;

        match key {
            "base_url" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `base_url` value on line {line_number}"))?;
                let url = Url::parse(&parsed).with_context(|| {
                    format!("Invalid `base_url` value '{parsed}' on line {line_number}")
                })?;
                cfg.base_url = Some(url);
            }
            "index_path" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `index_path` value on line {line_number}"))?;
                cfg.index_path = Some(parsed);
            }
            "site_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `site_dir` value on line {line_number}"))?;
                cfg.site_dir = Some(PathBuf::from(parsed));
            }
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_number}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_number}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_number}")
                })?);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_number}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            "read_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `read_timeout_secs` value on line {line_number}")
                })?;
                cfg.read_timeout_secs = Some(parsed);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
base_url = "https://papers.example.com/"
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(
            cfg.base_url.as_ref().map(Url::as_str),
            Some("https://papers.example.com/")
        );
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.output_dir.is_none());
    }

    #[test]
    fn test_parse_config_paths() {
        let cfg = parse_config_str(
            r#"
index_path = "data/index.json"
site_dir = "/srv/pastpapers"
output_dir = "/tmp/zips"
"#,
        )
        .expect("path config should parse");
        assert_eq!(cfg.index_path.as_deref(), Some("data/index.json"));
        assert_eq!(cfg.site_dir, Some(PathBuf::from("/srv/pastpapers")));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/zips")));
    }

    #[test]
    fn test_parse_config_rejects_file_base_url() {
        let err = parse_config_str(r#"base_url = "file:///srv/site/""#)
            .expect_err("file base_url expected to fail");
        assert!(err.to_string().contains("base_url"), "Expected key in: {err}");
    }

    #[test]
    fn test_parse_config_rejects_unparseable_base_url() {
        let err = parse_config_str(r#"base_url = "not a url""#).expect_err("invalid url expected");
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_parse_config_rejects_empty_index_path() {
        let err = parse_config_str(r#"index_path = "  ""#).expect_err("empty path expected");
        assert!(err.to_string().contains("index_path"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
output_dir = "zips#1" # hash inside quotes is kept
verbosity = "quiet" # preferred noise level
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.output_dir, Some(PathBuf::from("zips#1")));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Quiet));
    }

    #[test]
    fn test_parse_config_timeout_fields() {
        let cfg = parse_config_str(
            r#"
connect_timeout_secs = 15
read_timeout_secs = 300
"#,
        )
        .expect("timeout config should parse");
        assert_eq!(cfg.connect_timeout_secs, Some(15));
        assert_eq!(cfg.read_timeout_secs, Some(300));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err =
            parse_config_str("connect_timeout_secs = 0").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err = parse_config_str("read_timeout_secs = 4 trailing")
            .expect_err("expected trailing token error");
        assert!(err.to_string().contains("read_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("output_dir = /tmp").expect_err("unquoted string expected");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("verbosity").expect_err("syntax error expected");
        assert!(err.to_string().contains("expected key = value"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_verbosity_as_str() {
        assert_eq!(VerbositySetting::Default.as_str(), "default");
        assert_eq!(VerbositySetting::Verbose.as_str(), "verbose");
        assert_eq!(VerbositySetting::Quiet.as_str(), "quiet");
        assert_eq!(VerbositySetting::Debug.as_str(), "debug");
    }
}
