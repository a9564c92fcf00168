use std::io::Write;

use crate::error::Result;

pub const DEFAULT_SKIP_LOG: &str = "skipped_matches.log";

/// Append-only log of match URLs that failed to ingest. One URL per line,
/// written as failures happen so a crashed run loses nothing.
pub struct SkipLog {
    path: std::path::PathBuf,
}

impl SkipLog {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn append(&self, url: &str) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{}", url)?;

        Ok(())
    }

    /// All logged URLs in file order, blank lines skipped. A missing log file
    /// reads as empty.
    pub fn entries(&self) -> Result<Vec<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Rewrite the log keeping only the first occurrence of each URL.
    /// Returns the number of unique entries kept.
    pub fn dedup(&self) -> Result<usize> {
        let entries = self.entries()?;

        let mut seen = std::collections::HashSet::new();
        let unique: Vec<&String> = entries
            .iter()
            .filter(|url| seen.insert(url.as_str()))
            .collect();

        let mut content = String::new();
        for url in &unique {
            content.push_str(url);
            content.push('\n');
        }
        std::fs::write(&self.path, content)?;

        Ok(unique.len())
    }

    /// Drain the log for a retry pass: read every entry, then truncate so
    /// that only still-failing URLs get re-appended.
    pub fn drain(&self) -> Result<Vec<String>> {
        let entries = self.entries()?;

        if !entries.is_empty() || self.path.exists() {
            std::fs::write(&self.path, "")?;
        }

        Ok(entries)
    }
}
