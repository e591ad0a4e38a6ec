use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::Band;

pub const EASYPRIVACY_URL: &str = "https://easylist-downloads.adblockplus.org/easyprivacy.txt";
pub const DISCONNECT_URL: &str =
    "https://raw.githubusercontent.com/disconnectme/disconnect-tracking-protection/master/services.json";

/// Root configuration structure, deserialized from `.data-guardian/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub blocklist: BlocklistConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// `score` exits with code 1 when any domain lands in this band or above.
    pub fail_on: Band,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { fail_on: Band::High }
    }
}

/// Where tracker blocklists are fetched from and how they are compacted.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BlocklistConfig {
    pub sources: Vec<String>,
    pub output: PathBuf,
    /// Entries shorter than this are dropped as junk.
    pub min_length: usize,
    pub timeout_secs: u64,
    pub top_trackers: usize,
    pub pixel_patterns: usize,
    pub script_patterns: usize,
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            sources: vec![EASYPRIVACY_URL.to_string(), DISCONNECT_URL.to_string()],
            output: PathBuf::from("blocklist.txt"),
            min_length: 4,
            timeout_secs: 20,
            top_trackers: 2000,
            pixel_patterns: 2000,
            script_patterns: 1000,
        }
    }
}

/// Remote `/score` endpoints tried in order before falling back to local scoring.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub backends: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self { backends: Vec::new(), timeout_secs: 10 }
    }
}

/// Load configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<cwd>/.data-guardian/config.toml`
/// 3. `~/.config/data-guardian/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(cwd: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local = cwd.join(".data-guardian").join("config.toml");
    if local.exists() {
        return read_config(&local);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("data-guardian").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.report.fail_on, Band::High);
        assert_eq!(cfg.blocklist.sources.len(), 2);
        assert_eq!(cfg.blocklist.min_length, 4);
        assert!(cfg.remote.backends.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[report]
fail_on = "medium"

[remote]
backends = ["http://127.0.0.1:8000/score"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.report.fail_on, Band::Medium);
        assert_eq!(cfg.remote.backends, vec!["http://127.0.0.1:8000/score"]);
        assert_eq!(cfg.remote.timeout_secs, 10);
        assert_eq!(cfg.blocklist.top_trackers, 2000);
    }

    #[test]
    fn test_project_config_discovered() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".data-guardian");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[blocklist]\nmin_length = 6\n").unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.blocklist.min_length, 6);
    }

    #[test]
    fn test_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[report]\nfail_on = \"low\"\n").unwrap();

        let cfg = load_config(dir.path(), Some(&path)).unwrap();
        assert_eq!(cfg.report.fail_on, Band::Low);
    }

    #[test]
    fn test_invalid_band_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[report]\nfail_on = \"severe\"\n").unwrap();

        assert!(load_config(dir.path(), Some(&path)).is_err());
    }
}
