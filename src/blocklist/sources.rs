use std::collections::BTreeSet;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

const DOMAIN_PATTERN: &str = r"(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}";

/// Substrings that mark an EasyPrivacy filter line as a pixel/script pattern.
const PIXEL_LINE_HINTS: &[&str] = &["pixel", "track", "collect", ".gif", ".js"];

/// How a fetched source body should be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Adblock-style filter text (EasyPrivacy).
    FilterText,
    /// Disconnect `services.json`.
    Disconnect,
}

impl SourceKind {
    pub fn for_url(url: &str) -> Self {
        if url.ends_with(".json") {
            SourceKind::Disconnect
        } else {
            SourceKind::FilterText
        }
    }
}

/// Every domain-like token on non-comment lines, lowercased.
pub fn extract_text_domains(text: &str) -> Result<BTreeSet<String>> {
    let re = Regex::new(DOMAIN_PATTERN)?;
    let mut found = BTreeSet::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('!') || line.starts_with('#') {
            continue;
        }
        for m in re.find_iter(line) {
            found.insert(m.as_str().to_lowercase());
        }
    }
    Ok(found)
}

/// Raw EasyPrivacy entries for hybrid compression, duplicates kept.
///
/// Contributes the lowercased domain of each `||domain^` anchor, plus the
/// whole filter line when it looks like a pixel or script pattern.
pub fn extract_easyprivacy_raw(text: &str) -> Result<Vec<String>> {
    let anchor = Regex::new(r"(?i)\|\|([a-z0-9.-]+\.[a-z]{2,})")?;
    let mut out = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || ["!", "[", "@@", "#"].iter().any(|p| line.starts_with(p)) {
            continue;
        }
        out.extend(anchor.captures_iter(line).map(|c| c[1].to_lowercase()));

        let lower = line.to_lowercase();
        if PIXEL_LINE_HINTS.iter().any(|h| lower.contains(h)) {
            out.push(line.to_string());
        }
    }
    Ok(out)
}

/// Domains listed in a Disconnect services document, lowercased, duplicates kept.
///
/// Accepts the legacy shapes `{category: {service: {"domains": [..]}}}` and
/// `{category: [{"domains": [..]}]}`, and the current
/// `{"categories": {category: [{company: {homepage: [..]}}]}}` layout.
pub fn extract_disconnect_domains(doc: &Value) -> Result<Vec<String>> {
    let full = Regex::new(&format!("^{}$", DOMAIN_PATTERN))?;
    let root = doc.get("categories").unwrap_or(doc);

    let mut raw: Vec<&str> = Vec::new();
    if let Some(categories) = root.as_object() {
        for entries in categories.values() {
            match entries {
                Value::Object(services) => {
                    for meta in services.values() {
                        collect_domains_field(meta, &mut raw);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if item.get("domains").is_some() {
                            collect_domains_field(item, &mut raw);
                            continue;
                        }
                        // {company: {homepage: [domains]}}
                        let companies = item.as_object().into_iter().flat_map(|o| o.values());
                        for sites in companies.filter_map(Value::as_object) {
                            for list in sites.values().filter_map(Value::as_array) {
                                raw.extend(list.iter().filter_map(Value::as_str));
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(raw
        .into_iter()
        .filter(|d| full.is_match(d))
        .map(str::to_lowercase)
        .collect())
}

fn collect_domains_field<'a>(meta: &'a Value, out: &mut Vec<&'a str>) {
    if let Some(domains) = meta.get("domains").and_then(Value::as_array) {
        out.extend(domains.iter().filter_map(Value::as_str));
    }
}
