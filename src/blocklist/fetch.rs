use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{info, warn};

use super::compact::{self, HybridLimits};
use super::sources::{self, SourceKind};

/// Body of one downloaded source.
#[derive(Debug, Clone)]
pub struct FetchedSource {
    pub url: String,
    pub kind: SourceKind,
    pub body: String,
}

/// Download every source concurrently. Any HTTP failure aborts the whole fetch.
pub async fn fetch_sources(urls: &[String], timeout: Duration, quiet: bool) -> Result<Vec<FetchedSource>> {
    let client = Client::builder().timeout(timeout).build()?;

    let pb = if !quiet {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let futures: Vec<_> = urls
        .iter()
        .map(|url| {
            let client = client.clone();
            let pb = pb.clone();
            async move {
                let body = fetch_one(&client, url).await;
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                body.map(|body| FetchedSource {
                    url: url.clone(),
                    kind: SourceKind::for_url(url),
                    body,
                })
            }
        })
        .collect();

    let results = join_all(futures).await;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    results.into_iter().collect()
}

async fn fetch_one(client: &Client, url: &str) -> Result<String> {
    info!(%url, "fetching blocklist source");
    let response = client
        .get(url)
        .header("User-Agent", concat!("data-guardian/", env!("CARGO_PKG_VERSION")))
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?
        .error_for_status()
        .with_context(|| format!("{} returned an error status", url))?;
    Ok(response.text().await?)
}

/// Parse a Disconnect body, logging and skipping it when it is not valid JSON.
fn parse_disconnect(source: &FetchedSource) -> Result<Vec<String>> {
    match serde_json::from_str(&source.body) {
        Ok(doc) => sources::extract_disconnect_domains(&doc),
        Err(e) => {
            warn!(url = %source.url, error = %e, "failed to parse Disconnect JSON");
            Ok(Vec::new())
        }
    }
}

/// Build a sorted, de-duplicated domain list from fetched sources.
pub fn build_merged(fetched: &[FetchedSource], min_length: usize) -> Result<Vec<String>> {
    let mut sets = Vec::with_capacity(fetched.len());
    for source in fetched {
        let set: BTreeSet<String> = match source.kind {
            SourceKind::FilterText => sources::extract_text_domains(&source.body)?,
            SourceKind::Disconnect => parse_disconnect(source)?.into_iter().collect(),
        };
        info!(url = %source.url, entries = set.len(), "extracted domains");
        sets.push(set);
    }
    Ok(compact::merge(sets, min_length))
}

/// Build a frequency-ranked hybrid list of domains and pixel/script patterns.
pub fn build_hybrid(fetched: &[FetchedSource], limits: HybridLimits) -> Result<Vec<String>> {
    let mut raw = Vec::new();
    for source in fetched {
        match source.kind {
            SourceKind::FilterText => raw.extend(sources::extract_easyprivacy_raw(&source.body)?),
            SourceKind::Disconnect => raw.extend(parse_disconnect(source)?),
        }
    }
    info!(raw = raw.len(), "raw entries extracted");
    Ok(compact::hybrid(&raw, limits))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched() -> Vec<FetchedSource> {
        vec![
            FetchedSource {
                url: "https://lists.example/easyprivacy.txt".into(),
                kind: SourceKind::FilterText,
                body: "! comment\n||adnxs.com^\n||abc.io^\n/beacon/track.gif\n".into(),
            },
            FetchedSource {
                url: "https://lists.example/services.json".into(),
                kind: SourceKind::Disconnect,
                body: r#"{"Advertising": {"Criteo": {"domains": ["criteo.com", "adnxs.com"]}}}"#.into(),
            },
        ]
    }

    #[test]
    fn test_build_merged() {
        let merged = build_merged(&fetched(), 4).unwrap();
        assert_eq!(merged, vec!["abc.io", "adnxs.com", "criteo.com", "track.gif"]);
    }

    #[test]
    fn test_build_hybrid() {
        let limits = HybridLimits { top_trackers: 1, pixel_patterns: 10, script_patterns: 10 };
        let list = build_hybrid(&fetched(), limits).unwrap();
        assert_eq!(list, vec!["adnxs.com", "/beacon/track.gif"]);
    }

    #[test]
    fn test_invalid_disconnect_json_is_skipped() {
        let mut sources = fetched();
        sources[1].body = "not json".into();
        let merged = build_merged(&sources, 4).unwrap();
        assert!(!merged.contains(&"criteo.com".to_string()));
        assert!(merged.contains(&"adnxs.com".to_string()));
    }

    #[test]
    fn test_hybrid_counts_domains_case_insensitively() {
        let mut sources = fetched();
        sources[0].body = "||Adnxs.COM^$third-party\n||abc.io^\n".into();
        let limits = HybridLimits { top_trackers: 1, pixel_patterns: 0, script_patterns: 0 };
        let list = build_hybrid(&sources, limits).unwrap();
        assert_eq!(list, vec!["adnxs.com"]);
    }
}
