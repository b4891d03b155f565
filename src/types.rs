// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CRTSH_URL: &str = "https://crt.sh/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Timeout for the certificate-transparency query
    pub fetch_timeout: Duration,
    /// Timeout for each individual liveness attempt
    pub probe_timeout: Duration,
    /// Maximum number of candidates probed at once
    pub concurrency: usize,
    pub user_agent: String,
    pub output_dir: PathBuf,
    pub source: SourceKind,
    pub crtsh_url: String,
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(5),
            concurrency: 10,
            user_agent: format!("crtprobe/{}", env!("CARGO_PKG_VERSION")),
            output_dir: PathBuf::from("."),
            source: SourceKind::CrtSh,
            crtsh_url: DEFAULT_CRTSH_URL.to_string(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    /// HTML result table of crt.sh
    CrtSh,
    /// JSON output of crt.sh
    CrtShJson,
}

impl FromStr for SourceKind {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crtsh" => Ok(SourceKind::CrtSh),
            "crtsh-json" => Ok(SourceKind::CrtShJson),
            other => Err(ScanError::Config(format!("Unknown source: {}", other))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::CrtSh => write!(f, "crtsh"),
            SourceKind::CrtShJson => write!(f, "crtsh-json"),
        }
    }
}

/// Outcome of scanning one input domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainReport {
    pub domain: String,
    pub candidates: usize,
    pub alive: Vec<String>,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub domains_processed: usize,
    pub candidates_found: usize,
    pub alive_found: usize,
    pub files_written: usize,
    pub failed_writes: usize,
    pub duration: Duration,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {}", .0.display())]
    TargetFileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Source error in {source_name}: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl ScanError {
    /// Errors that must stop the whole run rather than a single domain.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanError::Config(_) | ScanError::TargetFileNotFound(_))
    }
}
