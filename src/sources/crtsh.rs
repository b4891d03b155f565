// src/sources/crtsh.rs
use crate::session::Session;
use crate::sources::Source;
use crate::types::ScanError;
use crate::utils::normalize_candidate;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// Index of the identity cell in a crt.sh result row. This is a convention of
/// the crt.sh HTML layout, not a documented interface: if crt.sh reorders its
/// columns this is the only place that needs to change.
const IDENTITY_COLUMN: usize = 4;

/// crt.sh certificate transparency search, scraped from the HTML result table
#[derive(Debug, Clone)]
pub struct CrtShSource {
    name: String,
    base_url: String,
    row_start: Regex,
    row_end: Regex,
    cell: Regex,
    line_break: Regex,
    tag: Regex,
}

impl CrtShSource {
    pub fn new(base_url: &str) -> Result<Self, ScanError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ScanError::Parse(format!("Regex error: {}", e)))
        };

        Ok(Self {
            name: "crtsh".to_string(),
            base_url: base_url.to_string(),
            row_start: compile(r"(?i)<tr[\s>]")?,
            row_end: compile(r"(?i)</tr\s*>")?,
            cell: compile(r"(?is)<td[^>]*>(.*?)</td\s*>")?,
            line_break: compile(r"(?i)<br\s*/?>")?,
            tag: compile(r"<[^>]*>")?,
        })
    }

    fn query_url(&self, domain: &str) -> Result<Url, ScanError> {
        Url::parse_with_params(&self.base_url, &[("q", domain)])
            .map_err(|e| ScanError::Config(format!("Invalid crt.sh URL {}: {}", self.base_url, e)))
    }

    /// Extracts candidate hostnames from a crt.sh result page.
    ///
    /// Rows with fewer than `IDENTITY_COLUMN + 1` cells (headers, layout rows)
    /// are skipped. A cell may list several names separated by `<BR>`; each is
    /// normalized on its own.
    pub fn parse(&self, html: &str) -> HashSet<String> {
        let mut candidates = HashSet::new();

        // Splitting on row openings keeps nested layout tables from swallowing
        // the result rows.
        for chunk in self.row_start.split(html).skip(1) {
            let row = match self.row_end.find(chunk) {
                Some(end) => &chunk[..end.start()],
                None => chunk,
            };

            let cells: Vec<&str> = self
                .cell
                .captures_iter(row)
                .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
                .collect();

            let Some(cell) = cells.get(IDENTITY_COLUMN) else {
                continue;
            };

            for name in self.cell_text(cell).split_whitespace() {
                if let Some(candidate) = normalize_candidate(name) {
                    candidates.insert(candidate);
                }
            }
        }

        candidates
    }

    fn cell_text(&self, cell: &str) -> String {
        let text = self.line_break.replace_all(cell, "\n");
        let text = self.tag.replace_all(&text, "");
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }
}

#[async_trait]
impl Source for CrtShSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enumerate(&self, domain: &str, session: &Session) -> Result<HashSet<String>, ScanError> {
        let url = self.query_url(domain)?;
        let html = session.get_text(url.as_str()).await?;
        Ok(self.parse(&html))
    }
}
