use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

/// Size limits for each section of a hybrid list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridLimits {
    pub top_trackers: usize,
    pub pixel_patterns: usize,
    pub script_patterns: usize,
}

const PIXEL_HINTS: &[&str] = &["pixel", "track", "collect", ".gif"];
const SCRIPT_HINT: &str = ".js";

/// Union of all extracted sets, minus entries shorter than `min_length`, sorted.
pub fn merge<I>(sets: I, min_length: usize) -> Vec<String>
where
    I: IntoIterator<Item = BTreeSet<String>>,
{
    let mut all = BTreeSet::new();
    for set in sets {
        all.extend(set);
    }
    all.into_iter().filter(|d| d.len() >= min_length).collect()
}

/// Compress raw entries into a hybrid list.
///
/// Sections, in order: the most frequent entries (ties keep first-seen
/// order), then pixel-like entries, then script entries. An entry already
/// present in an earlier section is not repeated.
pub fn hybrid(raw: &[String], limits: HybridLimits) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for entry in raw {
        *counts.entry(entry.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let unique: IndexSet<&str> = raw.iter().map(String::as_str).collect();

    let top = ranked.iter().map(|(e, _)| *e).take(limits.top_trackers);
    let pixels = unique
        .iter()
        .copied()
        .filter(|e| {
            let lower = e.to_lowercase();
            PIXEL_HINTS.iter().any(|h| lower.contains(h))
        })
        .take(limits.pixel_patterns);
    let scripts = unique
        .iter()
        .copied()
        .filter(|e| e.to_lowercase().contains(SCRIPT_HINT))
        .take(limits.script_patterns);

    top.chain(pixels)
        .chain(scripts)
        .collect::<IndexSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn raw(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_sorted_and_filtered() {
        let merged = merge(vec![set(&["b.com", "a.io", "x.y"]), set(&["a.io", "c.net"])], 4);
        assert_eq!(merged, vec!["a.io", "b.com", "c.net"]);
    }

    #[test]
    fn test_hybrid_ranks_by_frequency() {
        let input = raw(&["a.com", "b.com", "b.com", "c.com", "c.com", "c.com"]);
        let limits = HybridLimits { top_trackers: 2, pixel_patterns: 0, script_patterns: 0 };
        assert_eq!(hybrid(&input, limits), vec!["c.com", "b.com"]);
    }

    #[test]
    fn test_hybrid_ties_keep_first_seen() {
        let input = raw(&["z.com", "y.com", "x.com"]);
        let limits = HybridLimits { top_trackers: 3, pixel_patterns: 0, script_patterns: 0 };
        assert_eq!(hybrid(&input, limits), vec!["z.com", "y.com", "x.com"]);
    }

    #[test]
    fn test_hybrid_sections_without_repeats() {
        let input = raw(&["ads.com", "ads.com", "/Pixel.gif", "/track.js", "/lib.js", "/lib.js"]);
        let limits = HybridLimits { top_trackers: 1, pixel_patterns: 5, script_patterns: 5 };
        assert_eq!(
            hybrid(&input, limits),
            vec!["ads.com", "/Pixel.gif", "/track.js", "/lib.js"]
        );
    }
}
