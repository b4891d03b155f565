// src/output.rs
use crate::types::ScanError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct OutputManager {
    output_dir: PathBuf,
}

impl OutputManager {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn file_name(domain: &str) -> String {
        format!("{}_alive_subdomains.txt", domain)
    }

    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.output_dir.join(Self::file_name(domain))
    }

    /// Writes the alive hosts of `domain`, one per line, replacing any
    /// earlier result file for the same domain.
    pub fn write_alive(&self, domain: &str, hosts: &[String]) -> Result<PathBuf, ScanError> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| ScanError::Output(format!("Failed to create directory: {}", e)))?;

        let path = self.path_for(domain);
        let file = File::create(&path)
            .map_err(|e| ScanError::Output(format!("Failed to create {}: {}", path.display(), e)))?;

        let mut writer = BufWriter::new(file);
        write_lines(&mut writer, hosts)?;
        writer
            .flush()
            .map_err(|e| ScanError::Output(e.to_string()))?;

        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn write_lines<W: Write>(writer: &mut W, hosts: &[String]) -> Result<(), ScanError> {
    for host in hosts {
        writeln!(writer, "{}", host).map_err(|e| ScanError::Output(e.to_string()))?;
    }
    Ok(())
}
