use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::models::ScanRequest;

/// Scan requests read from one input, remembering whether it was a JSON array.
#[derive(Debug)]
pub struct RequestBatch {
    pub requests: Vec<ScanRequest>,
    pub is_array: bool,
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse one scan request or a JSON array of them.
///
/// The document is decoded in two steps so serde reports which field is wrong.
pub fn parse_requests(text: &str, origin: &str) -> Result<RequestBatch> {
    let value: Value = serde_json::from_str(text)
        .with_context(|| format!("failed to parse scan request(s) from {}", origin))?;

    if value.is_array() {
        let requests = Vec::<ScanRequest>::deserialize(value)
            .with_context(|| format!("invalid scan requests in {}", origin))?;
        Ok(RequestBatch { requests, is_array: true })
    } else {
        let request = ScanRequest::deserialize(value)
            .with_context(|| format!("invalid scan request in {}", origin))?;
        Ok(RequestBatch { requests: vec![request], is_array: false })
    }
}

pub fn load_requests(path: &Path) -> Result<RequestBatch> {
    parse_requests(&read_source(path)?, &display_name(path))
}

/// Read and parse any JSON document from a file or stdin.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_source(path)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", display_name(path)))
}

fn display_name(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageCapture;

    #[test]
    fn test_single_object() {
        let batch = parse_requests(r#"{"domain": "a.com", "cookies_count": 3}"#, "test").unwrap();
        assert!(!batch.is_array);
        assert_eq!(batch.requests.len(), 1);
        assert_eq!(batch.requests[0].signals.cookies_count, 3);
    }

    #[test]
    fn test_array() {
        let batch = parse_requests(r#"[{"domain": "a.com"}, {"domain": "b.com"}]"#, "test").unwrap();
        assert!(batch.is_array);
        let domains: Vec<&str> = batch.requests.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(domains, vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_wrong_type_rejected_with_origin() {
        let err = parse_requests(r#"{"domain": "a.com", "cookies_count": "many"}"#, "scan.json")
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("scan.json"));
        assert!(message.contains("expected i64"), "{}", message);
    }

    #[test]
    fn test_wrong_type_in_array_names_field() {
        let err = parse_requests(r#"[{"domain": "a.com"}, {"domain": 7}]"#, "batch.json").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("batch.json"));
        assert!(message.contains("expected a string"), "{}", message);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = parse_requests("{\"domain\": ", "scan.json").unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse scan request(s) from scan.json"));
    }

    #[test]
    fn test_non_string_tracker_rejected() {
        assert!(parse_requests(r#"{"domain": "a.com", "trackers": [1, 2]}"#, "t").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        std::fs::write(&path, r#"{"domain": "c.com", "scripts": ["https://x/ttq.js"]}"#).unwrap();

        let capture: PageCapture = load_json(&path).unwrap();
        assert_eq!(capture.domain, "c.com");
        assert_eq!(capture.scripts.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_requests(Path::new("/nonexistent/scan.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/scan.json"));
    }
}
