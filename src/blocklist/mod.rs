//! Tracker blocklists: loading, URL matching, and building new lists from
//! public filter sources.
//!
//! - [`sources`]: extract domains / patterns from EasyPrivacy text and
//!   Disconnect JSON.
//! - [`compact`]: merge extracted entries into a sorted list, or compress
//!   them into a frequency-ranked hybrid list.
//! - [`fetch`]: async download of the configured sources.

pub mod compact;
pub mod fetch;
pub mod sources;

use std::path::Path;

use anyhow::{Context, Result};

/// `matches` stops collecting once it has more than this many hits for one URL.
pub const MAX_MATCHES_PER_URL: usize = 21;

/// A list of lowercase substrings that identify tracker requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blocklist {
    entries: Vec<String>,
}

impl Blocklist {
    /// Parse one entry per line; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read blocklist {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { entries: entries.into_iter().map(Into::into).collect() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries contained in `url` (case-insensitive), in list order.
    pub fn matches(&self, url: &str) -> Vec<&str> {
        let lower = url.to_lowercase();
        let mut found = Vec::new();
        for entry in &self.entries {
            if lower.contains(entry.as_str()) {
                found.push(entry.as_str());
                if found.len() >= MAX_MATCHES_PER_URL {
                    break;
                }
            }
        }
        found
    }

    /// Write one entry per line.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut content = self.entries.join("\n");
        content.push('\n');
        std::fs::write(path, content)
            .with_context(|| format!("failed to write blocklist {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let list = Blocklist::parse("# generated\n\ndoubleclick.net\r\n  Criteo.com  \n#x\n");
        assert_eq!(list.entries(), ["doubleclick.net", "criteo.com"]);
    }

    #[test]
    fn test_matches_case_insensitive() {
        let list = Blocklist::from_entries(["doubleclick.net", "adnxs.com", "quantserve"]);
        assert_eq!(
            list.matches("https://STATS.G.DoubleClick.net/r/collect"),
            vec!["doubleclick.net"]
        );
        assert!(list.matches("https://example.org/app.js").is_empty());
    }

    #[test]
    fn test_matches_capped() {
        let list = Blocklist::from_entries((0..40).map(|i| format!("{}", i % 10)));
        assert_eq!(list.matches("0123456789").len(), MAX_MATCHES_PER_URL);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("blocklist.txt");
        let list = Blocklist::from_entries(["a.com", "b.net"]);
        list.save(&path).unwrap();
        assert_eq!(Blocklist::load(&path).unwrap(), list);
    }
}
