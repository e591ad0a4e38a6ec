use indexmap::IndexSet;

pub const COOKIE_ADVICE: &str = "Clear cookies or enable strict cookie blocking.";
pub const TRACKER_ADVICE: &str =
    "Block trackers using privacy settings or use uBlock / Privacy Badger.";
pub const PERMISSION_ADVICE: &str = "Revoke unnecessary permissions in browser settings.";
pub const FINGERPRINT_ADVICE: &str =
    "Enable anti-fingerprinting protections or use a private browsing session.";
pub const FALLBACK_ADVICE: &str = "Review privacy settings for this site.";

/// Keyword → advice, checked top to bottom; the first keyword found wins.
const ADVICE_RULES: &[(&str, &str)] = &[
    ("cookie", COOKIE_ADVICE),
    ("tracker", TRACKER_ADVICE),
    ("permission used", PERMISSION_ADVICE),
    ("fingerprinting", FINGERPRINT_ADVICE),
];

/// Advice for a single reason, matched case-insensitively.
pub fn advice_for(reason: &str) -> &'static str {
    let lower = reason.to_lowercase();
    ADVICE_RULES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, advice)| advice)
        .unwrap_or(FALLBACK_ADVICE)
}

/// Derive mitigation suggestions from reasons.
///
/// Each suggestion appears once, at the position of the first reason that
/// produced it.
pub fn suggest_actions<S: AsRef<str>>(reasons: &[S]) -> Vec<String> {
    reasons
        .iter()
        .map(|r| advice_for(r.as_ref()))
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
