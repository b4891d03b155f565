// src/sources/crtsh_json.rs
use crate::session::Session;
use crate::sources::Source;
use crate::types::ScanError;
use crate::utils::normalize_candidate;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use url::Url;

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    name_value: String,
}

/// crt.sh certificate transparency search via its JSON output
#[derive(Debug, Clone)]
pub struct CrtShJsonSource {
    name: String,
    base_url: String,
}

impl CrtShJsonSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            name: "crtsh-json".to_string(),
            base_url: base_url.to_string(),
        }
    }

    fn parse(&self, body: &str) -> Result<HashSet<String>, ScanError> {
        // crt.sh answers an empty body instead of `[]` for some queries
        if body.trim().is_empty() {
            return Ok(HashSet::new());
        }

        let entries: Vec<CrtShEntry> = serde_json::from_str(body).map_err(|e| ScanError::Source {
            source_name: self.name.clone(),
            message: format!("Failed to parse JSON: {}", e),
        })?;

        // name_value can contain multiple names separated by newlines
        Ok(entries
            .iter()
            .flat_map(|entry| entry.name_value.lines())
            .filter_map(normalize_candidate)
            .collect())
    }
}

#[async_trait]
impl Source for CrtShJsonSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enumerate(&self, domain: &str, session: &Session) -> Result<HashSet<String>, ScanError> {
        let url = Url::parse_with_params(&self.base_url, &[("q", domain), ("output", "json")])
            .map_err(|e| ScanError::Config(format!("Invalid crt.sh URL {}: {}", self.base_url, e)))?;

        let body = session.get_text(url.as_str()).await?;
        self.parse(&body)
    }
}
