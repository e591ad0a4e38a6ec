//! Report renderers for scored domains.
//!
//! - [`terminal`]: colored summary, category breakdown table, reasons and
//!   suggestions; respects `--verbose` / `--quiet`.
//! - [`pdf`]: cover page with band counts, then one page per domain.

pub mod pdf;
pub mod terminal;

use crate::models::{Band, ScoredScan};

/// Number of scans in each band, in `[low, medium, high]` order.
pub fn band_counts(scans: &[ScoredScan]) -> [usize; 3] {
    let count = |band: Band| scans.iter().filter(|s| s.response.band == band).count();
    [count(Band::Low), count(Band::Medium), count(Band::High)]
}

/// Cut `s` to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}
