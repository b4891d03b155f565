use crate::cli::Args;
use crate::error::{ErrorContext, Result};
use crate::types::{Config, ScanError, SourceKind};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// On-disk shape of the TOML configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    fetch_timeout_secs: Option<u64>,
    probe_timeout_secs: Option<u64>,
    concurrency: Option<usize>,
    user_agent: Option<String>,
    output_dir: Option<PathBuf>,
    source: Option<String>,
    crtsh_url: Option<String>,
    accept_invalid_certs: Option<bool>,
}

/// Builds the effective configuration: defaults, then the config file,
/// then `CRTPROBE_*` environment variables, then command-line flags.
pub fn resolve(args: &Args) -> Result<Config> {
    let mut config = match &args.config_path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    apply_args(&mut config, args)?;
    validate_config(&config)?;

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(ScanError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let file: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    let mut config = Config::default();
    if let Some(secs) = file.fetch_timeout_secs {
        config.fetch_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.probe_timeout_secs {
        config.probe_timeout = Duration::from_secs(secs);
    }
    if let Some(concurrency) = file.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(user_agent) = file.user_agent {
        config.user_agent = user_agent;
    }
    if let Some(output_dir) = file.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(source) = file.source {
        config.source = source.parse()?;
    }
    if let Some(crtsh_url) = file.crtsh_url {
        config.crtsh_url = crtsh_url;
    }
    if let Some(insecure) = file.accept_invalid_certs {
        config.accept_invalid_certs = insecure;
    }

    validate_config(&config)?;
    Ok(config)
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("CRTPROBE_FETCH_TIMEOUT") {
        let secs: u64 = value
            .trim()
            .parse()
            .with_context(|| "Invalid CRTPROBE_FETCH_TIMEOUT".to_string())?;
        config.fetch_timeout = Duration::from_secs(secs);
    }
    if let Some(value) = lookup("CRTPROBE_PROBE_TIMEOUT") {
        let secs: u64 = value
            .trim()
            .parse()
            .with_context(|| "Invalid CRTPROBE_PROBE_TIMEOUT".to_string())?;
        config.probe_timeout = Duration::from_secs(secs);
    }
    if let Some(value) = lookup("CRTPROBE_CONCURRENCY") {
        config.concurrency = value
            .trim()
            .parse()
            .with_context(|| "Invalid CRTPROBE_CONCURRENCY".to_string())?;
    }
    if let Some(value) = lookup("CRTPROBE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(value);
    }
    if let Some(value) = lookup("CRTPROBE_CRTSH_URL") {
        config.crtsh_url = value;
    }
    Ok(())
}

fn apply_args(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(secs) = args.fetch_timeout {
        config.fetch_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args.probe_timeout {
        config.probe_timeout = Duration::from_secs(secs);
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(source) = &args.source {
        config.source = source.parse::<SourceKind>()?;
    }
    if args.insecure {
        config.accept_invalid_certs = true;
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    if config.fetch_timeout.is_zero() {
        return Err(ScanError::Config("Fetch timeout must be greater than 0".to_string()));
    }
    if config.probe_timeout.is_zero() {
        return Err(ScanError::Config("Probe timeout must be greater than 0".to_string()));
    }
    if config.concurrency == 0 {
        return Err(ScanError::Config("Concurrency must be greater than 0".to_string()));
    }
    url::Url::parse(&config.crtsh_url)
        .with_context(|| format!("Invalid crt.sh URL {}", config.crtsh_url))?;
    Ok(())
}
