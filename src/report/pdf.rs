use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use super::truncate;
use crate::models::{Band, ScoreBreakdown, ScoredScan};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const T_END: f32 = PAGE_W - MARGIN;
const COVER_HDR_H: f32 = 72.0;
const BOT_MARGIN: f32 = 28.0;

type Rgb3 = (f32, f32, f32);

const BG: Rgb3 = (1.00, 1.00, 1.00);
const PANEL: Rgb3 = (1.00, 1.00, 1.00);
const PANEL_ALT: Rgb3 = (0.95, 0.96, 0.99);
const PANEL_BORDER: Rgb3 = (0.85, 0.87, 0.92);
const ACCENT_TEAL: Rgb3 = (0.05, 0.55, 0.55);
const ACCENT_BLU: Rgb3 = (0.20, 0.46, 0.95);
const TEXT_PRI: Rgb3 = (0.07, 0.08, 0.14);
const TEXT_SEC: Rgb3 = (0.36, 0.40, 0.52);
const TEXT_MUT: Rgb3 = (0.58, 0.63, 0.72);
const WHITE: Rgb3 = (1.00, 1.00, 1.00);
const WHITE_DIM: Rgb3 = (0.82, 0.95, 1.00);

const LOW_BG: Rgb3 = (0.90, 0.98, 0.92);
const LOW_FG: Rgb3 = (0.07, 0.52, 0.22);
const MED_BG: Rgb3 = (1.00, 0.95, 0.87);
const MED_FG: Rgb3 = (0.70, 0.40, 0.02);
const HIGH_BG: Rgb3 = (1.00, 0.91, 0.91);
const HIGH_FG: Rgb3 = (0.76, 0.09, 0.13);

const R_PANEL: f32 = 2.5;
const R_BADGE: f32 = 1.5;

const LINE_H: f32 = 4.8;
const TEXT_WRAP: usize = 92;
const BAR_MAX_W: f32 = 96.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render a PDF report: cover page → one detail section per domain.
pub fn render(scans: &[ScoredScan], output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Privacy Risk Report");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    add_cover_page(&doc, &fonts, scans);
    for scan in scans {
        add_domain_pages(&doc, &fonts, scan);
    }

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(doc: &PdfDocumentReference, fonts: &Fonts, scans: &[ScoredScan]) {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);
    let [low, medium, high] = super::band_counts(scans);

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_TEAL, ACCENT_BLU, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("data-guardian v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 40.0), Mm(PAGE_H - 10.5), &fonts.regular,
    );
    set_color(&layer, WHITE);
    layer.use_text("Privacy Risk", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &fonts.bold);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &fonts.bold);

    // Stat cards
    let rule_y = hdr_bot - 12.0;
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &fonts.bold);

    let card_y = rule_y - 42.0;
    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (T_END - MARGIN - gap * 3.0) / 4.0;
    let cards: [(&str, usize, Rgb3); 4] = [
        ("DOMAINS", scans.len(), ACCENT_BLU),
        ("LOW", low, LOW_FG),
        ("MEDIUM", medium, MED_FG),
        ("HIGH", high, HIGH_FG),
    ];
    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, fonts, cx, card_y, card_w, card_h, label, *value, *accent);
    }

    // Domains table
    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("DOMAINS SCANNED", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &fonts.bold);

    let tbl_hdr_y = section_y - 14.0;
    let col_domain = MARGIN + 2.0;
    let col_score = MARGIN + 110.0;
    let col_band = MARGIN + 135.0;
    layer.use_text("DOMAIN", 6.5, Mm(col_domain), Mm(tbl_hdr_y), &fonts.bold);
    layer.use_text("SCORE", 6.5, Mm(col_score), Mm(tbl_hdr_y), &fonts.bold);
    layer.use_text("RISK", 6.5, Mm(col_band), Mm(tbl_hdr_y), &fonts.bold);
    draw_hline(&layer, MARGIN, T_END, tbl_hdr_y - 2.0, PANEL_BORDER);

    const MAX_ROWS: usize = 18;
    let show = scans.len().min(MAX_ROWS);
    for (i, scan) in scans.iter().take(show).enumerate() {
        let row_y = tbl_hdr_y - 7.5 - i as f32 * 6.5;
        if i % 2 == 0 {
            fill_rect(&layer, MARGIN, row_y - 1.5, T_END - MARGIN, 6.5, PANEL_ALT);
        }
        set_color(&layer, TEXT_PRI);
        layer.use_text(truncate(&scan.response.domain, 52), 8.0, Mm(col_domain), Mm(row_y), &fonts.regular);
        set_color(&layer, TEXT_SEC);
        layer.use_text(scan.response.score.to_string(), 8.0, Mm(col_score), Mm(row_y), &fonts.regular);
        draw_band_badge(&layer, fonts, col_band - 0.5, row_y - 1.2, scan.response.band);
    }
    if scans.len() > MAX_ROWS {
        set_color(&layer, TEXT_MUT);
        layer.use_text(
            format!("+ {} more…", scans.len() - MAX_ROWS),
            7.5, Mm(col_domain), Mm(tbl_hdr_y - 7.5 - show as f32 * 6.5), &fonts.regular,
        );
    }

    draw_footer(&layer, fonts);
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: usize,
    accent: Rgb3,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value.to_string(), 20.0, Mm(x + 5.0), Mm(y + h * 0.38), &fonts.bold);
    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), &fonts.regular);
}

fn draw_band_badge(layer: &PdfLayerReference, fonts: &Fonts, x: f32, y: f32, band: Band) {
    let (bg, fg) = band_colors(band);
    fill_rounded_rect(layer, x, y, 20.0, 4.5, R_BADGE, bg);
    set_color(layer, fg);
    layer.use_text(band.to_string().to_uppercase(), 7.0, Mm(x + 2.5), Mm(y + 1.1), &fonts.bold);
}

// ── Per-domain pages ──────────────────────────────────────────────────────────

/// Writes top-down onto the current page, starting a continuation page when
/// the next block would run into the footer.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    fonts: &'a Fonts,
    title: String,
    layer: PdfLayerReference,
    y: f32,
    pages: u32,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, fonts: &'a Fonts, title: String) -> Self {
        let layer = new_detail_page(doc, fonts, &title, 1);
        Self { doc, fonts, title, layer, y: 262.0, pages: 1 }
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < BOT_MARGIN {
            self.pages += 1;
            self.layer = new_detail_page(self.doc, self.fonts, &self.title, self.pages);
            self.y = 262.0;
        }
    }
}

fn new_detail_page(doc: &PdfDocumentReference, fonts: &Fonts, title: &str, page: u32) -> PdfLayerReference {
    let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Domain");
    let layer = doc.get_page(pi).get_layer(li);

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_TEAL, ACCENT_BLU, 21);

    set_color(&layer, TEXT_PRI);
    let heading = if page == 1 { title.to_string() } else { format!("{} (cont.)", title) };
    layer.use_text(truncate(&heading, 44), 18.0, Mm(MARGIN), Mm(278.5), &fonts.bold);
    set_color(&layer, TEXT_MUT);
    layer.use_text(format!("Page {}", page), 8.0, Mm(T_END - 14.0), Mm(279.0), &fonts.regular);
    draw_hline(&layer, MARGIN, T_END, 272.5, PANEL_BORDER);

    draw_footer(&layer, fonts);
    layer
}

fn add_domain_pages(doc: &PdfDocumentReference, fonts: &Fonts, scan: &ScoredScan) {
    let resp = &scan.response;
    let mut cur = PageCursor::new(doc, fonts, resp.domain.clone());

    // Score panel
    let panel_h = 22.0;
    let panel_y = cur.y - panel_h;
    let (bg, fg) = band_colors(resp.band);
    fill_rounded_rect(&cur.layer, MARGIN, panel_y, T_END - MARGIN, panel_h, R_PANEL, bg);
    set_color(&cur.layer, fg);
    cur.layer.use_text(resp.score.to_string(), 24.0, Mm(MARGIN + 6.0), Mm(panel_y + 8.0), &fonts.bold);
    cur.layer.use_text(
        format!("{} RISK", resp.band.to_string().to_uppercase()),
        11.0, Mm(MARGIN + 36.0), Mm(panel_y + 12.0), &fonts.bold,
    );
    set_color(&cur.layer, TEXT_SEC);
    cur.layer.use_text(
        format!("Scored by: {}", scan.origin),
        8.0, Mm(MARGIN + 36.0), Mm(panel_y + 6.0), &fonts.regular,
    );
    cur.y = panel_y - 10.0;

    if let Some(breakdown) = &scan.breakdown {
        draw_breakdown(&mut cur, breakdown);
    }

    draw_text_section(&mut cur, "WHY THIS SCORE", &resp.reasons, "No privacy-relevant signals detected.");
    draw_text_section(&mut cur, "WHAT YOU CAN DO", &resp.suggestions, "No immediate actions");
}

fn draw_breakdown(cur: &mut PageCursor<'_>, breakdown: &ScoreBreakdown) {
    let rows = breakdown.categories();
    let max = rows.iter().map(|(_, p)| *p).max().unwrap_or(0).max(1) as f32;

    cur.ensure_space(12.0 + rows.len() as f32 * 7.0);
    set_color(&cur.layer, TEXT_MUT);
    cur.layer.use_text("SCORE BREAKDOWN", 6.5, Mm(MARGIN), Mm(cur.y), &cur.fonts.bold);
    cur.y -= 8.0;

    for (label, points) in rows {
        set_color(&cur.layer, TEXT_PRI);
        cur.layer.use_text(label, 8.0, Mm(MARGIN + 2.0), Mm(cur.y), &cur.fonts.regular);

        let bar_x = MARGIN + 44.0;
        fill_rounded_rect(&cur.layer, bar_x, cur.y - 0.8, BAR_MAX_W, 3.6, R_BADGE, PANEL_ALT);
        if points > 0 {
            let w = (points as f32 / max * BAR_MAX_W).max(2.0);
            fill_rounded_rect(&cur.layer, bar_x, cur.y - 0.8, w, 3.6, R_BADGE, ACCENT_TEAL);
        }
        set_color(&cur.layer, TEXT_SEC);
        cur.layer.use_text(points.to_string(), 8.0, Mm(bar_x + BAR_MAX_W + 4.0), Mm(cur.y), &cur.fonts.bold);
        cur.y -= 7.0;
    }
    cur.y -= 4.0;
}

fn draw_text_section(cur: &mut PageCursor<'_>, heading: &str, items: &[String], empty: &str) {
    cur.ensure_space(16.0);
    draw_hline(&cur.layer, MARGIN, T_END, cur.y + 3.0, PANEL_BORDER);
    set_color(&cur.layer, TEXT_MUT);
    cur.layer.use_text(heading, 6.5, Mm(MARGIN), Mm(cur.y - 3.0), &cur.fonts.bold);
    cur.y -= 10.0;

    if items.is_empty() {
        set_color(&cur.layer, TEXT_SEC);
        cur.layer.use_text(empty, 8.5, Mm(MARGIN + 5.0), Mm(cur.y), &cur.fonts.regular);
        cur.y -= LINE_H + 4.0;
        return;
    }

    for item in items {
        let lines = wrap_text(item, TEXT_WRAP);
        cur.ensure_space(lines.len() as f32 * LINE_H + 1.5);
        fill_rounded_rect(&cur.layer, MARGIN + 1.0, cur.y + 0.4, 2.0, 2.0, 1.0, ACCENT_TEAL);
        set_color(&cur.layer, TEXT_PRI);
        for line in &lines {
            cur.layer.use_text(line.as_str(), 8.5, Mm(MARGIN + 5.0), Mm(cur.y), &cur.fonts.regular);
            cur.y -= LINE_H;
        }
        cur.y -= 1.5;
    }
    cur.y -= 4.0;
}

fn draw_footer(layer: &PdfLayerReference, fonts: &Fonts) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by data-guardian v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), &fonts.regular,
    );
}

fn band_colors(band: Band) -> (Rgb3, Rgb3) {
    match band {
        Band::Low => (LOW_BG, LOW_FG),
        Band::Medium => (MED_BG, MED_FG),
        Band::High => (HIGH_BG, HIGH_FG),
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): Rgb3) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: Rgb3) {
    layer.set_fill_color(rgb(color));
}

fn fill_polygon(layer: &PdfLayerReference, ring: Vec<(Point, bool)>, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3) {
    let ring = vec![
        (Point::new(Mm(x), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y)), false),
        (Point::new(Mm(x + w), Mm(y + h)), false),
        (Point::new(Mm(x), Mm(y + h)), false),
    ];
    fill_polygon(layer, ring, color);
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    const SEGS: usize = 8;
    let r = r.min(w / 2.0).min(h / 2.0);
    let corners = [
        (x + w - r, y + r, 270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0, 90.0),
        (x + r, y + h - r, 90.0, 180.0),
        (x + r, y + r, 180.0, 270.0),
    ];
    corners
        .iter()
        .flat_map(|&(cx, cy, start, end)| {
            (0..=SEGS).map(move |i| {
                let angle = (start + (end - start) * i as f32 / SEGS as f32).to_radians();
                (Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false)
            })
        })
        .collect()
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    fill_polygon(layer, rounded_rect_ring(x, y, w, h, r), color);
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient made of `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, from: Rgb3, to: Rgb3, steps: usize) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Greedy word wrap; a single word longer than `max_chars` gets its own line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ScanRequest, Signals};
    use crate::remote::score_locally;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("https://a-very-long-pixel-url.example/p.gif", 10).len(), 1);
    }

    #[test]
    fn test_render_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.pdf");

        let mut signals = Signals {
            trackers: vec!["doubleclick".into(), "taboola".into()],
            cookies_count: 90,
            pixels: (0..8).map(|i| format!("https://t.example/p{}.gif", i)).collect(),
            fingerprint_flags: vec!["canvas".into()],
            ..Signals::default()
        };
        signals.permissions.insert("geolocation".into(), "granted".into());
        let scans = vec![
            score_locally(&ScanRequest { domain: "busy.example".into(), signals }),
            score_locally(&ScanRequest { domain: "quiet.example".into(), signals: Signals::default() }),
        ];

        render(&scans, &out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
