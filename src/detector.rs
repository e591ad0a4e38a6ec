use anyhow::Result;
use indexmap::IndexSet;
use regex::Regex;
use tracing::debug;

use crate::blocklist::Blocklist;
use crate::models::{PageCapture, ScanRequest, Signals};

/// Substrings of `<script src>` URLs that identify a tracker. The matching
/// pattern itself becomes the tracker name.
pub const SCRIPT_PATTERNS: &[&str] = &[
    "doubleclick", "googletagmanager", "google-analytics", "analytics", "adsystem",
    "adservice", "adnxs", "taboola", "outbrain", "criteo", "facebook", "pixel",
    "tracking", "quantserve", "scorecardresearch", "snowplow", "pubmatic", "adsrvr",
    "adtech", "adform", "hotjar", "segment", "mixpanel", "matomo", "yandex", "ttq",
    "bing",
];

/// Substrings of `<iframe src>` URLs that identify an embedded tracker or ad frame.
pub const IFRAME_PATTERNS: &[&str] = &[
    "doubleclick", "taboola", "outbrain", "adservice", "adsystem", "adnxs", "criteo",
    "adtech", "pubmatic", "cookielaw", "brightcove", "jwplayer", "vidcdn", "player",
];

/// Tracker name recorded for redirect / click-through ad requests.
pub const REDIRECT_AD: &str = "redirect-ad";

const PIXEL_PATTERN: &str = r"(?i)/pixel|/track|/collect|/beacon|\.gif($|\?)";
const REDIRECT_PATTERN: &str = r"(?i)redir|click|clk|adservice|adserver|adclick|adv";

/// Turns a [`PageCapture`] into the signals the scoring engine consumes.
pub struct Detector {
    blocklist: Blocklist,
    pixel_re: Regex,
    redirect_re: Regex,
}

impl Detector {
    pub fn new(blocklist: Blocklist) -> Result<Self> {
        Ok(Self {
            blocklist,
            pixel_re: Regex::new(PIXEL_PATTERN)?,
            redirect_re: Regex::new(REDIRECT_PATTERN)?,
        })
    }

    /// Build a scan request from the capture.
    ///
    /// Trackers are de-duplicated in first-seen order: script patterns, then
    /// iframe patterns, then blocklist and redirect hits from network requests.
    pub fn detect(&self, capture: &PageCapture) -> ScanRequest {
        let mut trackers: IndexSet<String> = IndexSet::new();

        for src in &capture.scripts {
            trackers.extend(pattern_hits(src, SCRIPT_PATTERNS));
        }
        for src in &capture.iframes {
            trackers.extend(pattern_hits(src, IFRAME_PATTERNS));
        }

        let mut pixels: IndexSet<String> = IndexSet::new();
        for url in &capture.requests {
            let hits = self.blocklist.matches(url);
            if !hits.is_empty() {
                debug!(%url, hits = hits.len(), "blocklist match");
            }
            trackers.extend(hits.into_iter().map(str::to_string));

            if self.redirect_re.is_match(url) {
                trackers.insert(REDIRECT_AD.to_string());
            }
            if self.pixel_re.is_match(url) {
                pixels.insert(url.to_lowercase());
            }
        }

        ScanRequest {
            domain: capture.domain.clone(),
            signals: Signals {
                trackers: trackers.into_iter().collect(),
                cookies_count: capture.cookies_count,
                permissions: capture.permissions.clone(),
                pixels: pixels.into_iter().collect(),
                fingerprint_flags: capture
                    .fingerprint_flags
                    .iter()
                    .cloned()
                    .collect::<IndexSet<_>>()
                    .into_iter()
                    .collect(),
            },
        }
    }
}

fn pattern_hits<'a>(url: &str, patterns: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    let lower = url.to_lowercase();
    patterns
        .iter()
        .filter(move |p| lower.contains(*p))
        .map(|p| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector(entries: &[&str]) -> Detector {
        Detector::new(Blocklist::from_entries(entries.iter().copied())).unwrap()
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_capture() {
        let capture = PageCapture { domain: "plain.example".into(), ..Default::default() };
        let req = detector(&[]).detect(&capture);
        assert_eq!(req.domain, "plain.example");
        assert_eq!(req.signals, Signals::default());
    }

    #[test]
    fn test_script_and_iframe_patterns() {
        let capture = PageCapture {
            domain: "news.example".into(),
            scripts: urls(&[
                "https://www.Google-Analytics.com/analytics.js",
                "https://cdn.taboola.com/loader.js",
            ]),
            iframes: urls(&["https://player.vimeo.com/video/1", "https://cdn.taboola.com/frame"]),
            ..Default::default()
        };
        let req = detector(&[]).detect(&capture);
        assert_eq!(
            req.signals.trackers,
            vec!["google-analytics", "analytics", "taboola", "player"]
        );
    }

    #[test]
    fn test_requests_blocklist_redirect_and_pixels() {
        let capture = PageCapture {
            domain: "shop.example".into(),
            requests: urls(&[
                "https://ib.adnxs.com/getuid",
                "https://ads.example/redirect?to=x",
                "https://metrics.example/Collect?v=1",
                "https://static.example/logo.gif",
                "https://static.example/app.js",
                "https://static.example/LOGO.gif",
            ]),
            ..Default::default()
        };
        let req = detector(&["adnxs.com"]).detect(&capture);
        assert_eq!(req.signals.trackers, vec!["adnxs.com", REDIRECT_AD]);
        assert_eq!(
            req.signals.pixels,
            vec!["https://metrics.example/collect?v=1", "https://static.example/logo.gif"]
        );
    }

    #[test]
    fn test_passthrough_fields() {
        let mut capture = PageCapture {
            domain: "maps.example".into(),
            cookies_count: 42,
            fingerprint_flags: urls(&["canvas", "audio", "canvas"]),
            ..Default::default()
        };
        capture.permissions.insert("geolocation".into(), "granted".into());
        capture.permissions.insert("notifications".into(), "default".into());

        let req = detector(&[]).detect(&capture);
        assert_eq!(req.signals.cookies_count, 42);
        assert_eq!(req.signals.fingerprint_flags, vec!["canvas", "audio"]);
        assert_eq!(req.signals.permissions, capture.permissions);
    }

    #[test]
    fn test_detected_request_scores_redirect_ad_highest() {
        let capture = PageCapture {
            domain: "spam.example".into(),
            requests: urls(&["https://x.example/adclick?id=9"]),
            ..Default::default()
        };
        let req = detector(&[]).detect(&capture);
        let resp = crate::service::handle_scan(&req);
        assert_eq!(resp.reasons, vec!["Tracker detected: redirect-ad (severity 5)"]);
        assert_eq!(resp.score, 5);
    }
}
