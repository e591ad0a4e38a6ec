use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::truncate;
use crate::models::{Band, ScoreBreakdown, ScoreOrigin, ScoredScan};

/// Render a colored terminal report.
pub fn render(scans: &[ScoredScan], verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        for scan in scans {
            println!("{}", summary_line(scan));
        }
        return Ok(());
    }

    println!("\n {} v{}\n", "data-guardian".bold(), env!("CARGO_PKG_VERSION"));

    for scan in scans {
        render_scan(scan, verbose);
    }

    if scans.len() > 1 {
        let [low, medium, high] = super::band_counts(scans);
        println!(
            " Domains: {}  Low: {}  Medium: {}  High: {}\n",
            scans.len(),
            low.to_string().green(),
            medium.to_string().yellow(),
            high.to_string().red(),
        );
    }

    Ok(())
}

const BOX_WIDTH: usize = 48;

/// One line inside the summary box. Padding is measured on `plain` so ANSI
/// escapes in `styled` do not shift the right border.
fn box_row(plain: &str, styled: impl std::fmt::Display) -> String {
    let pad = BOX_WIDTH.saturating_sub(plain.chars().count());
    format!(" │  {}{} │", styled, " ".repeat(pad))
}

fn render_scan(scan: &ScoredScan, verbose: bool) {
    let resp = &scan.response;

    println!(" ┌────────────────────────────────────────────────────┐");
    let domain = truncate(&resp.domain, BOX_WIDTH);
    println!("{}", box_row(&domain, domain.bold()));
    let score = format!("Score : {}", resp.score);
    println!("{}", box_row(&score, &score));
    let risk = format!("Risk  : {}", resp.band.to_string().to_uppercase());
    println!("{}", box_row(&risk, format!("Risk  : {}", band_label(resp.band))));
    if verbose || scan.origin != ScoreOrigin::Local {
        let source = format!("Source: {}", scan.origin);
        println!("{}", box_row(&source, &source));
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    if let Some(breakdown) = &scan.breakdown {
        render_breakdown(breakdown, verbose);
        println!();
    }

    if resp.reasons.is_empty() {
        println!(" {} No privacy-relevant signals detected.\n", "✓".green());
    } else {
        println!(" {} Why this score:\n", "[REASONS]".yellow().bold());
        for reason in &resp.reasons {
            println!("   • {}", reason);
        }
        println!();
    }

    println!(" {} What you can do:\n", "[ACTIONS]".cyan().bold());
    if resp.suggestions.is_empty() {
        println!("   No immediate actions");
    }
    for (i, suggestion) in resp.suggestions.iter().enumerate() {
        println!("   {}. {}", i + 1, suggestion);
    }
    println!();
}

/// Points per category; zero rows are hidden unless `verbose`.
fn render_breakdown(breakdown: &ScoreBreakdown, verbose: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Points").add_attribute(Attribute::Bold),
        ]);

    for (label, points) in breakdown.categories() {
        if points == 0 && !verbose {
            continue;
        }
        table.add_row(vec![
            Cell::new(label),
            Cell::new(points).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(breakdown.total())
            .add_attribute(Attribute::Bold)
            .fg(band_color(crate::scoring::engine::score_band(breakdown.total())))
            .set_alignment(CellAlignment::Right),
    ]);

    println!("{}", table);
}

fn summary_line(scan: &ScoredScan) -> String {
    let resp = &scan.response;
    format!(
        "{}  score: {}  risk: {}  reasons: {}",
        resp.domain,
        resp.score,
        band_label(resp.band),
        resp.reasons.len()
    )
}

fn band_label(band: Band) -> ColoredString {
    let label = band.to_string().to_uppercase();
    match band {
        Band::Low => label.green().bold(),
        Band::Medium => label.yellow().bold(),
        Band::High => label.red().bold(),
    }
}

fn band_color(band: Band) -> Color {
    match band {
        Band::Low => Color::Green,
        Band::Medium => Color::Yellow,
        Band::High => Color::Red,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScanRequest, Signals};
    use crate::remote::score_locally;

    #[test]
    fn test_summary_line() {
        colored::control::set_override(false);
        let scan = score_locally(&ScanRequest {
            domain: "example.com".into(),
            signals: Signals { trackers: vec!["criteo".into()], ..Signals::default() },
        });
        assert_eq!(summary_line(&scan), "example.com  score: 4  risk: LOW  reasons: 1");
    }

    #[test]
    fn test_box_row_ignores_ansi_width() {
        let plain = box_row("Risk  : HIGH", "Risk  : HIGH");
        let styled = box_row("Risk  : HIGH", "Risk  : \x1b[1;31mHIGH\x1b[0m");
        assert_eq!(styled.replace("\x1b[1;31m", "").replace("\x1b[0m", ""), plain);
        assert_eq!(plain.chars().count(), " │  ".chars().count() + BOX_WIDTH + " │".chars().count());
    }
}
