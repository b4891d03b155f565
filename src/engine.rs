use crate::output::OutputManager;
use crate::prober::{HttpTransport, Prober, Transport};
use crate::session::Session;
use crate::sources::{create_source, harvest, Source};
use crate::types::{Config, DomainReport, ScanError, ScanStats};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::sync::Arc;
use std::time::Instant;

pub struct ScanEngine {
    session: Session,
    source: Arc<dyn Source>,
    prober: Prober,
    output: OutputManager,
    silent: bool,
}

impl ScanEngine {
    pub fn new(config: &Config, silent: bool) -> Result<Self, ScanError> {
        let source = create_source(config)?;
        let transport = Arc::new(HttpTransport::new(config)?);
        Self::with_parts(config, source, transport, silent)
    }

    /// Builds an engine around an explicit harvest source and probe transport.
    pub fn with_parts(
        config: &Config,
        source: Arc<dyn Source>,
        transport: Arc<dyn Transport>,
        silent: bool,
    ) -> Result<Self, ScanError> {
        Ok(Self {
            session: Session::new(config)?,
            source,
            prober: Prober::new(transport, config.concurrency),
            output: OutputManager::new(config.output_dir.clone()),
            silent,
        })
    }

    /// Scans each domain in order. A domain that fails to harvest or whose
    /// result file cannot be written does not stop the remaining domains.
    pub async fn run(&self, domains: &[String]) -> ScanStats {
        info!(
            "Starting scan of {} domains using {}, writing to {}",
            domains.len(),
            self.source.name(),
            self.output.output_dir().display()
        );
        let start_time = Instant::now();
        let mut stats = ScanStats::default();

        for domain in domains {
            let report = self.scan_domain(domain).await;

            stats.domains_processed += 1;
            stats.candidates_found += report.candidates;
            stats.alive_found += report.alive.len();
            if report.output_file.is_some() {
                stats.files_written += 1;
            } else {
                stats.failed_writes += 1;
            }
        }

        stats.duration = start_time.elapsed();
        stats
    }

    pub async fn scan_domain(&self, domain: &str) -> DomainReport {
        self.progress(&format!("\n[+] Processing: {}", domain));

        let candidates = harvest(self.source.as_ref(), domain, &self.session).await;
        self.progress(&format!("[+] Found {} candidate subdomains", candidates.len()));

        let bar = self.progress_bar(candidates.len() as u64);
        let alive = self
            .prober
            .probe_all(&candidates, |host, is_alive| {
                bar.inc(1);
                if is_alive && !self.silent {
                    bar.suspend(|| println!("[+] Alive: {}", host));
                }
            })
            .await;
        bar.finish_and_clear();

        let output_file = match self.output.write_alive(domain, &alive) {
            Ok(path) => {
                self.progress(&format!("[+] Saved alive subdomains to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                error!("Failed to save results for {}: {}", domain, e);
                None
            }
        };

        info!(
            "Completed {}: {} alive out of {} candidates",
            domain,
            alive.len(),
            candidates.len()
        );

        DomainReport {
            domain: domain.to_string(),
            candidates: candidates.len(),
            alive,
            output_file,
        }
    }

    fn progress(&self, message: &str) {
        if !self.silent {
            println!("{}", message);
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if self.silent || len == 0 {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(len);
        let style = ProgressStyle::with_template("{elapsed_precise} {bar:36.cyan/blue} {pos:>4}/{len:4} probing")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }
}
