use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The privacy-relevant signals observed on one domain.
///
/// `permissions` keeps insertion order so reasons and suggestions come out in
/// the order the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    #[serde(default)]
    pub trackers: Vec<String>,
    #[serde(default)]
    pub cookies_count: i64,
    #[serde(default)]
    pub permissions: IndexMap<String, String>,
    #[serde(default)]
    pub pixels: Vec<String>,
    #[serde(default)]
    pub fingerprint_flags: Vec<String>,
}

/// A scan request: the domain (informational only) plus its signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub domain: String,
    #[serde(flatten)]
    pub signals: Signals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub domain: String,
    pub score: i64,
    pub band: Band,
    pub reasons: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Coarse risk category derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Low => write!(f, "low"),
            Band::Medium => write!(f, "medium"),
            Band::High => write!(f, "high"),
        }
    }
}

/// Points contributed by each signal category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub trackers: i64,
    pub pixels: i64,
    pub cookies: i64,
    pub fingerprinting: i64,
    pub permissions: i64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.trackers + self.pixels + self.cookies + self.fingerprinting + self.permissions
    }

    /// `(label, points)` pairs in reason order, for renderers.
    pub fn categories(&self) -> [(&'static str, i64); 5] {
        [
            ("Trackers", self.trackers),
            ("Pixels / beacons", self.pixels),
            ("Cookies", self.cookies),
            ("Fingerprinting", self.fingerprinting),
            ("Permissions", self.permissions),
        ]
    }
}

/// Full output of the scoring pass over one set of signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
}

impl Assessment {
    pub fn score(&self) -> i64 {
        self.breakdown.total()
    }
}

/// Where a response came from when remote backends are configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScoreOrigin {
    Local,
    Remote(String),
}

impl std::fmt::Display for ScoreOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreOrigin::Local => write!(f, "local"),
            ScoreOrigin::Remote(url) => write!(f, "remote ({})", url),
        }
    }
}

/// A scored domain as handed to the report renderers.
#[derive(Debug, Clone)]
pub struct ScoredScan {
    pub response: ScanResponse,
    /// Present when the score was computed locally.
    pub breakdown: Option<ScoreBreakdown>,
    pub origin: ScoreOrigin,
}

/// Raw observations captured from a loaded page, before tracker detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageCapture {
    pub domain: String,
    /// URLs of every network request the page completed.
    #[serde(default)]
    pub requests: Vec<String>,
    /// `src` attributes of `<script>` elements.
    #[serde(default)]
    pub scripts: Vec<String>,
    /// `src` attributes of `<iframe>` elements.
    #[serde(default)]
    pub iframes: Vec<String>,
    #[serde(default)]
    pub cookies_count: i64,
    #[serde(default)]
    pub permissions: IndexMap<String, String>,
    #[serde(default)]
    pub fingerprint_flags: Vec<String>,
}

/// Liveness status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}
