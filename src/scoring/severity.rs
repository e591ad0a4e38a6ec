/// Severity assigned to a tracker that matches no table entry.
pub const DEFAULT_SEVERITY: u32 = 1;

/// Tracker-name substrings and their severity (1–5).
///
/// Order matters: the first entry contained in a tracker name wins, so
/// `google-analytics` is listed ahead of the broader `analytics`.
pub const TRACKER_SEVERITY: &[(&str, u32)] = &[
    // Ad exchanges / retargeting
    ("doubleclick", 4),
    ("adservice", 4),
    ("adnxs", 4),
    ("criteo", 4),
    // Content recommendation networks
    ("pubmatic", 3),
    ("taboola", 3),
    ("outbrain", 3),
    // Analytics
    ("google-analytics", 1),
    ("analytics", 1),
    ("snowplow", 1),
    ("quantserve", 1),
    ("scorecardresearch", 1),
    // Redirect / click-through ad spam
    ("redirect-ad", 5),
];

/// Look up the severity of a tracker by case-insensitive substring match.
pub fn tracker_severity(tracker: &str) -> u32 {
    let key = tracker.to_lowercase();
    TRACKER_SEVERITY
        .iter()
        .find(|(pattern, _)| key.contains(pattern))
        .map(|&(_, severity)| severity)
        .unwrap_or(DEFAULT_SEVERITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name() {
        assert_eq!(tracker_severity("doubleclick"), 4);
        assert_eq!(tracker_severity("taboola"), 3);
        assert_eq!(tracker_severity("redirect-ad"), 5);
    }

    #[test]
    fn test_substring_of_hostname() {
        assert_eq!(tracker_severity("stats.g.doubleclick.net"), 4);
        assert_eq!(tracker_severity("ib.adnxs.com"), 4);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(tracker_severity("DoubleClick.NET"), 4);
        assert_eq!(tracker_severity("CDN.Taboola.com"), 3);
    }

    #[test]
    fn test_first_declared_match_wins() {
        // Contains both "doubleclick" (4) and "analytics" (1).
        assert_eq!(tracker_severity("doubleclick-analytics"), 4);
        // Contains both "analytics" (1) and "redirect-ad" (5); analytics is declared first.
        assert_eq!(tracker_severity("analytics-redirect-ad"), 1);
    }

    #[test]
    fn test_unknown_defaults_to_one() {
        assert_eq!(tracker_severity("hotjar"), DEFAULT_SEVERITY);
        assert_eq!(tracker_severity(""), DEFAULT_SEVERITY);
    }

    #[test]
    fn test_table_is_well_formed() {
        for (pattern, severity) in TRACKER_SEVERITY {
            assert_eq!(*pattern, pattern.to_lowercase());
            assert!((1..=5).contains(severity));
        }
    }
}
