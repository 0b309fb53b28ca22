//! Minimal SVG plotting primitives
//!
//! Documents are built as strings: a [`Canvas`] holds the markup and one or
//! more [`Axes`] panels map data coordinates onto pixel rectangles.

use crate::report::{ReportError, ReportResult};
use std::path::Path;

pub const BACKGROUND: &str = "#ffffff";
pub const GRID: &str = "#e5e7eb";
pub const INK: &str = "#1f2937";

/// matplotlib's tab20 palette
pub const TAB20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Default series colours (tab10 subset)
pub const SERIES: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];

/// Viridis control points, evenly spaced over [0, 1]
const VIRIDIS: [(f64, f64, f64); 5] = [
    (68.0, 1.0, 84.0),
    (59.0, 82.0, 139.0),
    (33.0, 145.0, 140.0),
    (94.0, 201.0, 98.0),
    (253.0, 231.0, 37.0),
];

/// Viridis colour for `t` in [0, 1]
pub fn viridis(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let f = scaled - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let mix = |x: f64, y: f64| (x + (y - x) * f).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// An SVG document under construction
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    body: String,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        let mut canvas = Self {
            width,
            height,
            body: String::new(),
        };
        canvas.rect(0.0, 0.0, width, height, BACKGROUND, 1.0);
        canvas
    }

    /// Canvas for a matplotlib-style figure size in inches
    pub fn for_figure(width_in: f64, height_in: f64, dpi: u32) -> Self {
        Self::new(width_in * dpi as f64, height_in * dpi as f64)
    }

    /// Text size that keeps the same physical size at any dpi
    pub fn font(&self, points: f64) -> f64 {
        points * self.width / 1000.0
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        self.body.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}" fill-opacity="{opacity:.2}"/>"#
        ));
    }

    pub fn outlined_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: &str, opacity: f64) {
        self.body.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{fill}" fill-opacity="{opacity:.2}" stroke="{stroke}" stroke-width="0.5"/>"#
        ));
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: &str, width: f64, opacity: f64) {
        self.body.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{stroke}" stroke-width="{width:.1}" stroke-opacity="{opacity:.2}"/>"#,
            from.0, from.1, to.0, to.1
        ));
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64, dashed: bool) {
        if points.len() < 2 {
            return;
        }
        let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
        let dash = if dashed {
            format!(r#" stroke-dasharray="{:.1},{:.1}""#, width * 4.0, width * 3.0)
        } else {
            String::new()
        };
        self.body.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="{width:.1}"{dash}/>"#,
            coords.join(" ")
        ));
    }

    pub fn circle(&mut self, center: (f64, f64), r: f64, fill: &str, opacity: f64) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{r:.1}" fill="{fill}" fill-opacity="{opacity:.2}"/>"#,
            center.0, center.1
        ));
    }

    pub fn ring(&mut self, center: (f64, f64), r: f64, stroke: &str, width: f64) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{r:.1}" fill="none" stroke="{stroke}" stroke-width="{width:.1}"/>"#,
            center.0, center.1
        ));
    }

    pub fn square(&mut self, center: (f64, f64), half: f64, fill: &str) {
        self.rect(center.0 - half, center.1 - half, 2.0 * half, 2.0 * half, fill, 1.0);
    }

    /// `anchor` is `start`, `middle` or `end`
    pub fn text(&mut self, at: (f64, f64), size: f64, anchor: &str, content: &str) {
        self.body.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{size:.1}" text-anchor="{anchor}" fill="{INK}">{}</text>"#,
            at.0,
            at.1,
            escape(content)
        ));
    }

    /// Text rotated a quarter turn counter-clockwise (y-axis labels)
    pub fn vertical_text(&mut self, at: (f64, f64), size: f64, content: &str) {
        self.body.push_str(&format!(
            r#"<text x="{x:.1}" y="{y:.1}" font-family="sans-serif" font-size="{size:.1}" text-anchor="middle" fill="{INK}" transform="rotate(-90 {x:.1} {y:.1})">{}</text>"#,
            escape(content),
            x = at.0,
            y = at.1,
        ));
    }

    /// Legend box in the top-right corner of `axes`
    pub fn legend(&mut self, axes: &Axes, entries: &[(&str, &str)]) {
        if entries.is_empty() {
            return;
        }
        let size = self.font(11.0);
        let row = size * 1.5;
        let width = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0) as f64 * size * 0.6
            + size * 3.0;
        let x = axes.x + axes.width - width - size;
        let y = axes.y + size;
        self.outlined_rect(x, y, width, row * entries.len() as f64 + size * 0.5, BACKGROUND, GRID, 0.9);
        for (i, (label, colour)) in entries.iter().enumerate() {
            let cy = y + row * (i as f64 + 0.5) + size * 0.25;
            self.square((x + size, cy), size * 0.35, colour);
            self.text((x + size * 2.0, cy + size * 0.35), size, "start", label);
        }
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" xmlns="http://www.w3.org/2000/svg">{}</svg>"#,
            self.width, self.height, self.width, self.height, self.body
        )
    }

    pub fn save(self, path: &Path) -> ReportResult<()> {
        std::fs::write(path, self.finish()).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Mapping from data values to the unit interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Linear { min: f64, max: f64 },
    /// Non-positive values are not drawable
    Log { min: f64, max: f64 },
}

impl Scale {
    /// Linear scale over the data with 5% padding on each side
    pub fn linear_fit<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = bounds(values.into_iter()).unwrap_or((0.0, 1.0));
        let span = if max > min { max - min } else { 1.0 };
        Scale::Linear {
            min: min - span * 0.05,
            max: max + span * 0.05,
        }
    }

    /// Log scale over the positive data, padded to whole decades
    pub fn log_fit<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = bounds(values.into_iter().filter(|&v| v > 0.0)).unwrap_or((1.0, 10.0));
        let lo = 10f64.powf(min.log10().floor());
        let mut hi = 10f64.powf(max.log10().ceil());
        if hi <= lo {
            hi = lo * 10.0;
        }
        Scale::Log { min: lo, max: hi }
    }

    pub fn unit(&self, value: f64) -> Option<f64> {
        match *self {
            Scale::Linear { min, max } => Some((value - min) / (max - min)),
            Scale::Log { min, max } => {
                (value > 0.0).then(|| (value.log10() - min.log10()) / (max.log10() - min.log10()))
            }
        }
    }

    /// Tick positions
    pub fn ticks(&self) -> Vec<f64> {
        match *self {
            Scale::Linear { min, max } => {
                let raw = (max - min) / 5.0;
                if !(raw > 0.0 && raw.is_finite()) {
                    return vec![min];
                }
                let magnitude = 10f64.powf(raw.log10().floor());
                let step = [1.0, 2.0, 2.5, 5.0, 10.0]
                    .iter()
                    .map(|m| m * magnitude)
                    .find(|&s| s >= raw)
                    .unwrap_or(raw);
                let mut ticks = Vec::new();
                let mut t = (min / step).ceil() * step;
                while t <= max + step * 1e-9 {
                    ticks.push(t);
                    t += step;
                }
                ticks
            }
            Scale::Log { min, max } => {
                let mut ticks = Vec::new();
                let mut t = min;
                while t <= max * (1.0 + 1e-9) {
                    ticks.push(t);
                    t *= 10.0;
                }
                ticks
            }
        }
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn tick_label(value: f64) -> String {
    let abs = value.abs();
    if value == 0.0 {
        "0".to_string()
    } else if abs >= 1e4 || abs < 1e-3 {
        format!("{value:.0e}")
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').to_string()
    }
}

/// A plotting panel occupying a pixel rectangle of the canvas
#[derive(Debug, Clone)]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub x_scale: Scale,
    pub y_scale: Scale,
}

impl Axes {
    /// Panel inside a grid cell, leaving margins for labels
    pub fn in_cell(canvas: &Canvas, rows: usize, cols: usize, row: usize, col: usize, x_scale: Scale, y_scale: Scale) -> Self {
        let cell_w = canvas.width / cols as f64;
        let cell_h = canvas.height / rows as f64;
        let left = cell_w * 0.14;
        let right = cell_w * 0.05;
        let top = cell_h * 0.12;
        let bottom = cell_h * 0.14;
        Self {
            x: cell_w * col as f64 + left,
            y: cell_h * row as f64 + top,
            width: cell_w - left - right,
            height: cell_h - top - bottom,
            x_scale,
            y_scale,
        }
    }

    /// Pixel position of a data point; `None` if it cannot be drawn
    pub fn project(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let ux = self.x_scale.unit(x)?;
        let uy = self.y_scale.unit(y)?;
        if !(ux.is_finite() && uy.is_finite()) {
            return None;
        }
        Some((self.x + ux * self.width, self.y + (1.0 - uy) * self.height))
    }

    fn clamp_y(&self, py: f64) -> f64 {
        py.clamp(self.y, self.y + self.height)
    }

    /// Frame, grid, ticks, title and axis labels
    pub fn draw_frame(&self, canvas: &mut Canvas, title: &str, x_label: &str, y_label: &str) {
        let size = canvas.font(10.0);
        canvas.rect(self.x, self.y, self.width, self.height, BACKGROUND, 1.0);

        for t in self.x_scale.ticks() {
            if let Some(u) = self.x_scale.unit(t) {
                let px = self.x + u * self.width;
                canvas.line((px, self.y), (px, self.y + self.height), GRID, 1.0, 1.0);
                canvas.text((px, self.y + self.height + size * 1.4), size, "middle", &tick_label(t));
            }
        }
        for t in self.y_scale.ticks() {
            if let Some(u) = self.y_scale.unit(t) {
                let py = self.y + (1.0 - u) * self.height;
                canvas.line((self.x, py), (self.x + self.width, py), GRID, 1.0, 1.0);
                canvas.text((self.x - size * 0.5, py + size * 0.35), size, "end", &tick_label(t));
            }
        }

        canvas.outlined_rect(self.x, self.y, self.width, self.height, "none", INK, 0.0);
        canvas.text(
            (self.x + self.width / 2.0, self.y - size * 1.0),
            size * 1.3,
            "middle",
            title,
        );
        canvas.text(
            (self.x + self.width / 2.0, self.y + self.height + size * 3.0),
            size * 1.1,
            "middle",
            x_label,
        );
        canvas.vertical_text((self.x - size * 4.5, self.y + self.height / 2.0), size * 1.1, y_label);
    }

    pub fn scatter(&self, canvas: &mut Canvas, points: &[(f64, f64)], radius: f64, colour: &str, opacity: f64) {
        for &(x, y) in points {
            if let Some(p) = self.project(x, y) {
                canvas.circle(p, radius, colour, opacity);
            }
        }
    }

    /// Line through the drawable points
    pub fn plot(&self, canvas: &mut Canvas, points: &[(f64, f64)], colour: &str, width: f64, dashed: bool) {
        let projected: Vec<(f64, f64)> = points
            .iter()
            .filter_map(|&(x, y)| self.project(x, y))
            .map(|(px, py)| (px, self.clamp_y(py)))
            .collect();
        canvas.polyline(&projected, colour, width, dashed);
    }

    /// Horizontal line across the panel at `y`
    pub fn hline(&self, canvas: &mut Canvas, y: f64, colour: &str, width: f64) {
        if let Some(u) = self.y_scale.unit(y) {
            let py = self.y + (1.0 - u) * self.height;
            canvas.polyline(&[(self.x, py), (self.x + self.width, py)], colour, width, true);
        }
    }

    /// Vertical error bars with caps
    pub fn error_bars(&self, canvas: &mut Canvas, points: &[(f64, f64, f64)], colour: &str, width: f64) {
        let cap = canvas.font(5.0);
        for &(x, y, err) in points {
            let (Some(lo), Some(hi)) = (self.project(x, y - err), self.project(x, y + err)) else {
                continue;
            };
            let (lo_y, hi_y) = (self.clamp_y(lo.1), self.clamp_y(hi.1));
            canvas.line((lo.0, lo_y), (hi.0, hi_y), colour, width, 1.0);
            canvas.line((lo.0 - cap, lo_y), (lo.0 + cap, lo_y), colour, width, 1.0);
            canvas.line((hi.0 - cap, hi_y), (hi.0 + cap, hi_y), colour, width, 1.0);
        }
    }

    /// Bars for a histogram computed by [`histogram`]
    pub fn bars(&self, canvas: &mut Canvas, hist: &Histogram, colour: &str, opacity: f64) {
        for (i, &count) in hist.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let base = match self.y_scale {
                Scale::Linear { min, .. } => min.max(0.0),
                Scale::Log { min, .. } => min,
            };
            let (Some(a), Some(b)) = (
                self.project(hist.edges[i], count as f64),
                self.project(hist.edges[i + 1], base),
            ) else {
                continue;
            };
            let top = self.clamp_y(a.1);
            let bottom = self.clamp_y(b.1);
            canvas.outlined_rect(a.0, top, (b.0 - a.0).max(0.5), bottom - top, colour, INK, opacity);
        }
    }
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin `values` into `bins` equal-width bins spanning their range; the last bin
/// is closed on the right
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let (min, max) = bounds(values.iter().copied()).unwrap_or((0.0, 1.0));
    let (min, max) = if max > min { (min, max) } else { (min - 0.5, min + 0.5) };
    let width = (max - min) / bins as f64;

    let edges = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    Histogram { edges, counts }
}
