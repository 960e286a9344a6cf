//! Standalone HTML charts with inline SVG.

use std::f64::consts::PI;

use crate::aggregates::utility::{pct, saturating_total};

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 420.0;
const MARGIN: f64 = 60.0;

const PALETTE: &[&str] = &[
    "#66c5cc", "#f6cf71", "#f89c74", "#dcb0f2", "#87c55f", "#9eb9f3", "#fe88b1", "#c9db74",
    "#8be0a4", "#b497e7",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Line,
    Bar,
}

/// Label shown for a category; blank categories get a placeholder.
pub fn display_label(label: &str) -> &str {
    if label.is_empty() { "(blank)" } else { label }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn pie_svg(series: &[(String, u64)]) -> Vec<String> {
    let total = saturating_total(series.iter().map(|(_, v)| *v));
    let (cx, cy, r) = (WIDTH / 2.0 - 100.0, HEIGHT / 2.0 + 10.0, 150.0);
    let mut shapes = Vec::new();

    if total == 0 {
        shapes.push(format!(r##"<circle cx="{cx}" cy="{cy}" r="{r}" fill="#eeeeee"/>"##));
    }

    let mut angle = -PI / 2.0;
    for (i, (label, value)) in series.iter().enumerate() {
        if total > 0 && *value > 0 {
            let fraction = *value as f64 / total as f64;
            if fraction >= 1.0 {
                shapes.push(format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#, color(i)));
            } else {
                let end = angle + fraction * 2.0 * PI;
                let large_arc = if fraction > 0.5 { 1 } else { 0 };
                shapes.push(format!(
                    r##"<path d="M {cx:.2} {cy:.2} L {:.2} {:.2} A {r} {r} 0 {large_arc} 1 {:.2} {:.2} Z" fill="{}" stroke="#ffffff"/>"##,
                    cx + r * angle.cos(),
                    cy + r * angle.sin(),
                    cx + r * end.cos(),
                    cy + r * end.sin(),
                    color(i),
                ));
                angle = end;
            }
        }

        let legend_y = 80.0 + i as f64 * 22.0;
        shapes.push(format!(
            r#"<rect x="{}" y="{:.2}" width="14" height="14" fill="{}"/><text x="{}" y="{:.2}">{} ({}, {:.2}%)</text>"#,
            WIDTH - 230.0,
            legend_y - 12.0,
            color(i),
            WIDTH - 210.0,
            legend_y,
            escape_html(display_label(label)),
            value,
            pct(*value, total),
        ));
    }
    shapes
}

fn axes() -> String {
    format!(
        r##"<line x1="{MARGIN}" y1="{}" x2="{}" y2="{}" stroke="#444444"/><line x1="{MARGIN}" y1="{MARGIN}" x2="{MARGIN}" y2="{}" stroke="#444444"/>"##,
        HEIGHT - MARGIN,
        WIDTH - MARGIN,
        HEIGHT - MARGIN,
        HEIGHT - MARGIN,
    )
}

fn scale_y(value: u64, max: u64) -> f64 {
    let plot = HEIGHT - 2.0 * MARGIN;
    if max == 0 {
        HEIGHT - MARGIN
    } else {
        HEIGHT - MARGIN - value as f64 / max as f64 * plot
    }
}

fn line_svg(series: &[(String, u64)]) -> Vec<String> {
    let mut shapes = vec![axes()];
    let max = series.iter().map(|(_, v)| *v).max().unwrap_or(0);
    let step = if series.len() > 1 {
        (WIDTH - 2.0 * MARGIN) / (series.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |i: usize| {
        if series.len() > 1 {
            MARGIN + i as f64 * step
        } else {
            WIDTH / 2.0
        }
    };

    let points: Vec<String> = series
        .iter()
        .enumerate()
        .map(|(i, (_, v))| format!("{:.2},{:.2}", x_at(i), scale_y(*v, max)))
        .collect();
    shapes.push(format!(
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        points.join(" "),
        color(5),
    ));

    for (i, (label, value)) in series.iter().enumerate() {
        let (x, y) = (x_at(i), scale_y(*value, max));
        shapes.push(format!(
            r#"<circle cx="{x:.2}" cy="{y:.2}" r="3" fill="{}"><title>{}: {value}</title></circle>"#,
            color(5),
            escape_html(label),
        ));
    }

    if let (Some((first, _)), Some((last, _))) = (series.first(), series.last()) {
        shapes.push(format!(
            r#"<text x="{MARGIN}" y="{}">{}</text><text x="{}" y="{}" text-anchor="end">{}</text>"#,
            HEIGHT - MARGIN + 20.0,
            escape_html(first),
            WIDTH - MARGIN,
            HEIGHT - MARGIN + 20.0,
            escape_html(last),
        ));
    }
    shapes.push(format!(
        r#"<text x="{}" y="{}" text-anchor="end">{max}</text>"#,
        MARGIN - 6.0,
        MARGIN + 4.0
    ));
    shapes
}

fn bar_svg(series: &[(String, u64)]) -> Vec<String> {
    let mut shapes = vec![axes()];
    let max = series.iter().map(|(_, v)| *v).max().unwrap_or(0);
    let slot = (WIDTH - 2.0 * MARGIN) / series.len().max(1) as f64;
    let bar_width = slot * 0.7;

    for (i, (label, value)) in series.iter().enumerate() {
        let x = MARGIN + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = scale_y(*value, max);
        shapes.push(format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{bar_width:.2}" height="{:.2}" fill="{}"><title>{value}</title></rect>"#,
            HEIGHT - MARGIN - y,
            color(i),
        ));
        shapes.push(format!(
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{value}</text><text x="{:.2}" y="{}" text-anchor="middle">{}</text>"#,
            x + bar_width / 2.0,
            y - 6.0,
            x + bar_width / 2.0,
            HEIGHT - MARGIN + 20.0,
            escape_html(display_label(label)),
        ));
    }
    shapes
}

/// Renders a complete HTML page holding one chart.
pub fn render_chart(title: &str, kind: ChartKind, series: &[(String, u64)]) -> String {
    let shapes = match kind {
        ChartKind::Pie => pie_svg(series),
        ChartKind::Line => line_svg(series),
        ChartKind::Bar => bar_svg(series),
    };
    let svg = shapes.join("\n");

    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>body {{ font-family: sans-serif; margin: 2em; }} text {{ font-size: 12px; fill: #333333; }}</style>
</head>
<body>
<h1>{title}</h1>
<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">
{svg}
</svg>
</body>
</html>
"#
    )
}
