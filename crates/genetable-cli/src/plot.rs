//! Gene availability bar chart, rendered as SVG

use crate::error::{CliError, Result};
use crate::features::GeneCount;
use std::path::{Path, PathBuf};
use svg::node::element::{Line, Rectangle, Text};
use svg::Document;

/// Frequency at which the horizontal reference line is drawn
pub const REFERENCE_FREQUENCY: u64 = 3;

const H: f64 = 550.0;
const MIN_W: f64 = 800.0;
const BAR_SLOT: f64 = 24.0;
const LEFT: f64 = 80.0;
const RIGHT: f64 = 30.0;
const TOP: f64 = 60.0;
const BOTTOM: f64 = 180.0;

/// `Homo sapiens` → `Homo_sapiens_GeneAvailability.svg`
pub fn chart_file_name(term: &str) -> String {
    format!("{}_GeneAvailability.svg", term.replace(' ', "_"))
}

/// Integer tick spacing giving at most about five ticks
fn tick_step(max: u64) -> u64 {
    max.div_ceil(5).max(1)
}

/// Render one bar per row, in row order
pub fn render_chart(term: &str, rows: &[GeneCount]) -> String {
    let width = MIN_W.max(LEFT + RIGHT + BAR_SLOT * rows.len() as f64);
    let plot_w = width - LEFT - RIGHT;
    let plot_h = H - TOP - BOTTOM;
    let baseline = TOP + plot_h;

    let max = rows
        .iter()
        .map(|r| r.frequency)
        .max()
        .unwrap_or(0)
        .max(REFERENCE_FREQUENCY);
    let step = tick_step(max);
    let y_max = (max.div_ceil(step) * step).max(step) as f64;
    let y_of = |value: f64| baseline - value / y_max * plot_h;

    let mut doc = Document::new()
        .set("viewBox", (0, 0, width, H))
        .set("width", width)
        .set("height", H)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", H)
                .set("fill", "#ffffff"),
        )
        .add(
            Text::new(format!("Gene availability of {}", term))
                .set("x", LEFT + plot_w / 2.0)
                .set("y", TOP / 2.0)
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", 16),
        );

    let mut tick = 0;
    while tick as f64 <= y_max {
        let y = y_of(tick as f64);
        doc = doc
            .add(
                Line::new()
                    .set("x1", LEFT - 5.0)
                    .set("y1", y)
                    .set("x2", LEFT)
                    .set("y2", y)
                    .set("stroke", "#333333")
                    .set("stroke-width", 1),
            )
            .add(
                Text::new(tick.to_string())
                    .set("x", LEFT - 8.0)
                    .set("y", y + 4.0)
                    .set("text-anchor", "end")
                    .set("font-family", "sans-serif")
                    .set("font-size", 11),
            );
        tick += step;
    }

    let slot = if rows.is_empty() {
        plot_w
    } else {
        plot_w / rows.len() as f64
    };
    let bar_w = slot * 0.8;

    for (i, row) in rows.iter().enumerate() {
        let center = LEFT + slot * (i as f64 + 0.5);
        let top = y_of(row.frequency as f64);

        doc = doc
            .add(
                Rectangle::new()
                    .set("class", "bar")
                    .set("x", center - bar_w / 2.0)
                    .set("y", top)
                    .set("width", bar_w)
                    .set("height", baseline - top)
                    .set("fill", "#1f77b4")
                    .set("fill-opacity", 0.5),
            )
            .add(
                Text::new(row.gene.clone())
                    .set("x", center)
                    .set("y", baseline + 10.0)
                    .set("text-anchor", "end")
                    .set("transform", format!("rotate(-87 {} {})", center, baseline + 10.0))
                    .set("font-family", "sans-serif")
                    .set("font-size", 11),
            );
    }

    let reference_y = y_of(REFERENCE_FREQUENCY as f64);
    doc = doc
        .add(
            Line::new()
                .set("class", "reference")
                .set("x1", LEFT)
                .set("y1", reference_y)
                .set("x2", LEFT + plot_w)
                .set("y2", reference_y)
                .set("stroke", "#000000")
                .set("stroke-width", 1),
        )
        .add(
            Line::new()
                .set("x1", LEFT)
                .set("y1", baseline)
                .set("x2", LEFT + plot_w)
                .set("y2", baseline)
                .set("stroke", "#333333")
                .set("stroke-width", 1),
        )
        .add(
            Line::new()
                .set("x1", LEFT)
                .set("y1", TOP)
                .set("x2", LEFT)
                .set("y2", baseline)
                .set("stroke", "#333333")
                .set("stroke-width", 1),
        )
        .add(
            Text::new("Genes")
                .set("x", LEFT + plot_w / 2.0)
                .set("y", H - 12.0)
                .set("text-anchor", "middle")
                .set("font-family", "sans-serif")
                .set("font-size", 13),
        )
        .add(
            Text::new("Frequency")
                .set("x", 20.0)
                .set("y", TOP + plot_h / 2.0)
                .set("text-anchor", "middle")
                .set("transform", format!("rotate(-90 20 {})", TOP + plot_h / 2.0))
                .set("font-family", "sans-serif")
                .set("font-size", 13),
        );

    doc.to_string()
}

/// Write the chart for `term` into `dir`, returning the file path
pub fn save_chart(dir: &Path, term: &str, rows: &[GeneCount]) -> Result<PathBuf> {
    let path = dir.join(chart_file_name(term));
    std::fs::write(&path, render_chart(term, rows))
        .map_err(|e| CliError::chart(format!("{}: {}", path.display(), e)))?;
    Ok(path)
}
