use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "crtprobe",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ", built ", env!("BUILD_TIME"), ")"),
    about = "Crawl subdomains from crt.sh and check if they are alive",
    long_about = "crtprobe harvests candidate subdomains from certificate-transparency logs (crt.sh)\nand probes each one over HTTP and HTTPS, saving the responsive hosts to <domain>_alive_subdomains.txt."
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["target", "target_file"]),
))]
pub struct Args {
    /// Single domain to scan
    #[arg(short = 't', long = "target", value_name = "DOMAIN")]
    pub target: Option<String>,

    /// File containing list of domains to scan, one per line
    #[arg(short = 'T', long = "target-file", value_name = "FILE")]
    pub target_file: Option<PathBuf>,

    /// Configuration file path (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Directory for the result files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of candidates probed concurrently
    #[arg(short = 'j', long = "concurrency")]
    pub concurrency: Option<usize>,

    /// Per-attempt liveness probe timeout in seconds
    #[arg(long = "probe-timeout", value_name = "SECS")]
    pub probe_timeout: Option<u64>,

    /// Certificate-transparency query timeout in seconds
    #[arg(long = "fetch-timeout", value_name = "SECS")]
    pub fetch_timeout: Option<u64>,

    /// Harvest source: crtsh (HTML table) or crtsh-json
    #[arg(short = 's', long = "source")]
    pub source: Option<String>,

    /// Accept invalid TLS certificates when probing over HTTPS
    #[arg(long = "insecure")]
    pub insecure: bool,

    /// Silent mode (no banner or progress output)
    #[arg(long = "silent")]
    pub silent: bool,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_single_target() {
        let args = Args::try_parse_from(["crtprobe", "--target", "example.com"]).unwrap();
        assert_eq!(args.target.as_deref(), Some("example.com"));
        assert!(args.target_file.is_none());
    }

    #[test]
    fn test_target_file_short_flag() {
        let args = Args::try_parse_from(["crtprobe", "-T", "domains.txt", "-vv"]).unwrap();
        assert_eq!(args.target_file, Some(PathBuf::from("domains.txt")));
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_target_required() {
        let err = Args::try_parse_from(["crtprobe"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_target_and_file_conflict() {
        let err = Args::try_parse_from(["crtprobe", "-t", "example.com", "-T", "domains.txt"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }
}
