pub use crate::types::ScanError;

pub type Result<T> = std::result::Result<T, ScanError>;

pub trait ErrorContext<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| ScanError::Config(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_wraps_as_config_error() {
        let parsed: std::result::Result<u64, _> = "ten".parse::<u64>();
        let err = parsed.with_context(|| "Invalid concurrency".to_string()).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().starts_with("Configuration error: Invalid concurrency:"));
    }
}
