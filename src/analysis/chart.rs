//! Minimal SVG bar chart around a zero baseline.

use std::fmt::Write;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render one bar per `(label, value)`. Positive values rise above the
/// baseline and negative values hang below it; non-finite values are
/// drawn as empty slots.
pub fn render_bar_chart(title: &str, y_label: &str, bars: &[(String, f64)]) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let max_abs = bars
        .iter()
        .map(|(_, v)| v.abs())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let scale = if max_abs > 0.0 { (plot_h / 2.0) / max_abs } else { 0.0 };
    let baseline = MARGIN_TOP + plot_h / 2.0;
    let slot = if bars.is_empty() { plot_w } else { plot_w / bars.len() as f64 };
    let bar_w = slot * 0.6;

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="28" font-size="18" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    );
    let _ = writeln!(
        svg,
        r#"  <text x="18" y="{baseline:.1}" font-size="12" text-anchor="middle" transform="rotate(-90 18 {baseline:.1})">{}</text>"#,
        escape(y_label)
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black"/>"#,
        WIDTH - MARGIN_RIGHT
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">0</text>"#,
        MARGIN_LEFT - 6.0,
        baseline + 4.0
    );

    for (i, (label, value)) in bars.iter().enumerate() {
        let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
        if value.is_finite() {
            let h = value.abs() * scale;
            let y = if *value >= 0.0 { baseline - h } else { baseline };
            let fill = if *value >= 0.0 { "#c8102e" } else { "#33006f" };
            let _ = writeln!(
                svg,
                r#"  <rect x="{:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{fill}"/>"#,
                center - bar_w / 2.0
            );
            let label_y = if *value >= 0.0 { y - 6.0 } else { y + h + 14.0 };
            let _ = writeln!(
                svg,
                r#"  <text x="{center:.1}" y="{label_y:.1}" font-size="11" text-anchor="middle">{value:.3}</text>"#
            );
        }
        let _ = writeln!(
            svg,
            r#"  <text x="{center:.1}" y="{:.1}" font-size="12" text-anchor="end" transform="rotate(-45 {center:.1} {:.1})">{}</text>"#,
            HEIGHT - MARGIN_BOTTOM + 20.0,
            HEIGHT - MARGIN_BOTTOM + 20.0,
            escape(label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}
