// src/utils.rs
use crate::types::ScanError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads lines from a file into a vector of strings.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

/// Resolves the list of domains to scan from either a single target or a
/// line-delimited file. Blank lines are skipped and file order is kept.
pub fn resolve_targets(
    target: Option<&str>,
    target_file: Option<&Path>,
) -> Result<Vec<String>, ScanError> {
    match (target, target_file) {
        (Some(domain), None) => {
            let domain = domain.trim();
            if domain.is_empty() {
                return Err(ScanError::Config("Target domain is empty".to_string()));
            }
            Ok(vec![domain.to_string()])
        }
        (None, Some(path)) => {
            if !path.exists() {
                return Err(ScanError::TargetFileNotFound(path.to_path_buf()));
            }
            let domains = read_lines(path)?
                .into_iter()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect();
            Ok(domains)
        }
        _ => Err(ScanError::Config(
            "Exactly one of --target or --target-file is required".to_string(),
        )),
    }
}

/// Normalizes a raw certificate identity into a candidate hostname.
///
/// Strips a leading wildcard label, lowercases, and drops anything that does
/// not contain a dot (bare labels, empty cells).
pub fn normalize_candidate(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let name = trimmed.strip_prefix("*.").unwrap_or(trimmed);

    if !name.contains('.') {
        return None;
    }

    Some(name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_wildcard() {
        assert_eq!(
            normalize_candidate("*.foo.example.com"),
            Some("foo.example.com".to_string())
        );
        assert_eq!(
            normalize_candidate("  WWW.Example.com \n"),
            Some("www.example.com".to_string())
        );
    }

    #[test]
    fn test_normalize_requires_dot() {
        assert_eq!(normalize_candidate(""), None);
        assert_eq!(normalize_candidate("localhost"), None);
        assert_eq!(normalize_candidate("*.com"), None);
        assert_eq!(normalize_candidate("a.b"), Some("a.b".to_string()));
    }

    #[test]
    fn test_resolve_single_target() {
        let domains = resolve_targets(Some(" example.com "), None).unwrap();
        assert_eq!(domains, vec!["example.com".to_string()]);
        assert!(resolve_targets(Some("   "), None).is_err());
    }

    #[test]
    fn test_resolve_target_file_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "example.com\n\n  \nexample.org  ").unwrap();

        let domains = resolve_targets(None, Some(file.path())).unwrap();
        assert_eq!(domains, vec!["example.com".to_string(), "example.org".to_string()]);
    }

    #[test]
    fn test_missing_target_file() {
        let err = resolve_targets(None, Some(Path::new("/nonexistent/domains.txt"))).unwrap_err();
        assert!(matches!(err, ScanError::TargetFileNotFound(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_requires_exactly_one_input() {
        assert!(resolve_targets(None, None).is_err());
        assert!(resolve_targets(Some("example.com"), Some(Path::new("d.txt"))).is_err());
    }
}
