// src/sources/mod.rs
use crate::session::Session;
use crate::types::{Config, ScanError, SourceKind};
use async_trait::async_trait;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;

mod crtsh;
mod crtsh_json;

pub use crtsh::CrtShSource;
pub use crtsh_json::CrtShJsonSource;

/// A certificate-transparency search backend that yields candidate hostnames.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &str;
    async fn enumerate(&self, domain: &str, session: &Session) -> Result<HashSet<String>, ScanError>;
}

pub fn create_source(config: &Config) -> Result<Arc<dyn Source>, ScanError> {
    let source: Arc<dyn Source> = match config.source {
        SourceKind::CrtSh => Arc::new(CrtShSource::new(&config.crtsh_url)?),
        SourceKind::CrtShJson => Arc::new(CrtShJsonSource::new(&config.crtsh_url)),
    };
    Ok(source)
}

/// Queries `source` for `domain`, failing soft: any transport, status or
/// parse error is logged and yields an empty candidate set.
pub async fn harvest(source: &dyn Source, domain: &str, session: &Session) -> HashSet<String> {
    match source.enumerate(domain, session).await {
        Ok(candidates) => {
            info!("{}: Found {} candidates for {}", source.name(), candidates.len(), domain);
            candidates
        }
        Err(e) => {
            warn!("Failed to retrieve data from {} for {}: {}", source.name(), domain, e);
            HashSet::new()
        }
    }
}
