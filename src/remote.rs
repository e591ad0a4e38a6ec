use anyhow::Result;
use reqwest::Client;
use tracing::warn;

use crate::models::{ScanRequest, ScanResponse, ScoreOrigin, ScoredScan};
use crate::service::handle_scan_detailed;

/// Score `req` with the first backend that answers, falling back to the local engine.
///
/// A backend answers when it returns a 2xx status whose body parses as a
/// [`ScanResponse`]. Failures are logged and never surfaced.
pub async fn score_with_fallback(client: &Client, backends: &[String], req: &ScanRequest) -> ScoredScan {
    for url in backends {
        match post_scan(client, url, req).await {
            Ok(Some(response)) => {
                return ScoredScan {
                    response,
                    breakdown: None,
                    origin: ScoreOrigin::Remote(url.clone()),
                }
            }
            Ok(None) => warn!(%url, domain = %req.domain, "backend returned an error status"),
            Err(e) => warn!(%url, domain = %req.domain, error = %e, "backend request failed"),
        }
    }
    score_locally(req)
}

pub fn score_locally(req: &ScanRequest) -> ScoredScan {
    let (response, breakdown) = handle_scan_detailed(req);
    ScoredScan { response, breakdown: Some(breakdown), origin: ScoreOrigin::Local }
}

async fn post_scan(client: &Client, url: &str, req: &ScanRequest) -> Result<Option<ScanResponse>> {
    let response = client
        .post(url)
        .header("User-Agent", concat!("data-guardian/", env!("CARGO_PKG_VERSION")))
        .json(req)
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    Ok(Some(response.json().await?))
}
