use tracing::debug;

use crate::models::{Assessment, Band, ScoreBreakdown, Signals};
use crate::scoring::severity::tracker_severity;

/// Points per pixel/beacon endpoint.
const PIXEL_POINTS: i64 = 1;
/// Pixel count above which a reason is reported.
const PIXEL_REASON_THRESHOLD: usize = 5;
/// Cookies per point, and the cap on cookie points.
const COOKIES_PER_POINT: i64 = 10;
const MAX_COOKIE_POINTS: i64 = 10;
/// Cookie count above which a reason is reported.
const COOKIE_REASON_THRESHOLD: i64 = 50;
const FINGERPRINT_POINTS: i64 = 2;
const PERMISSION_POINTS: i64 = 5;

/// Permission state that contributes to the score. Every other state is ignored.
pub const GRANTED: &str = "granted";

/// Upper bound (exclusive) of the low band.
pub const MEDIUM_THRESHOLD: i64 = 5;
/// Lower bound (inclusive) of the high band.
pub const HIGH_THRESHOLD: i64 = 12;

/// Compute the risk score and the ordered list of reasons for `signals`.
pub fn compute_score(signals: &Signals) -> (i64, Vec<String>) {
    let assessment = assess(signals);
    (assessment.score(), assessment.reasons)
}

/// Score `signals` category by category.
///
/// Reasons are emitted in a fixed order: trackers, pixel count, cookie count,
/// fingerprint flags, then granted permissions.
pub fn assess(signals: &Signals) -> Assessment {
    let mut breakdown = ScoreBreakdown::default();
    let mut reasons = Vec::new();

    for tracker in &signals.trackers {
        let severity = tracker_severity(tracker);
        debug!(tracker = %tracker, severity, "tracker severity");
        breakdown.trackers += i64::from(severity);
        reasons.push(format!("Tracker detected: {} (severity {})", tracker, severity));
    }

    let pixel_count = signals.pixels.len();
    breakdown.pixels = pixel_count as i64 * PIXEL_POINTS;
    if pixel_count > PIXEL_REASON_THRESHOLD {
        reasons.push(format!(
            "Multiple pixel/beacon endpoints detected: {}",
            pixel_count
        ));
    }

    // Floor division keeps malformed negative counts on the same rule.
    breakdown.cookies = signals
        .cookies_count
        .div_euclid(COOKIES_PER_POINT)
        .min(MAX_COOKIE_POINTS);
    if signals.cookies_count > COOKIE_REASON_THRESHOLD {
        reasons.push(format!("High cookie count: {}", signals.cookies_count));
    }

    for flag in &signals.fingerprint_flags {
        breakdown.fingerprinting += FINGERPRINT_POINTS;
        reasons.push(format!("Fingerprinting technique detected: {}", flag));
    }

    for (name, state) in &signals.permissions {
        if state == GRANTED {
            breakdown.permissions += PERMISSION_POINTS;
            reasons.push(format!("Permission used: {}", name));
        }
    }

    Assessment { breakdown, reasons }
}

/// Classify a score into its [`Band`].
pub fn score_band(score: i64) -> Band {
    if score < MEDIUM_THRESHOLD {
        Band::Low
    } else if score < HIGH_THRESHOLD {
        Band::Medium
    } else {
        Band::High
    }
}
