//! The analysis figures

use super::layout::force_layout;
use super::svg::{histogram, viridis, Axes, Canvas, Scale, INK, SERIES, TAB20};
use crate::analysis::powerlaw::PowerLawFit;
use crate::analysis::{derive_seed, CentralityTable, CommunityDetection, RobustnessReport, SeedStream};
use crate::config::VisualizationConfig;
use crate::report::ReportResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const TARGETED: &str = "#d62728";
const RANDOM: &str = "#1f77b4";
const THRESHOLD: &str = "#7f7f7f";

/// Linear histogram of degrees next to the log-log degree frequency with the
/// fitted power law
pub fn plot_degree_distribution(
    path: &Path,
    degrees: &[usize],
    fit: Option<&PowerLawFit>,
    dpi: u32,
) -> ReportResult<()> {
    let mut canvas = Canvas::for_figure(12.0, 5.0, dpi);
    let values: Vec<f64> = degrees.iter().map(|&d| d as f64).collect();

    let hist = histogram(&values, 50);
    let linear = Axes::in_cell(
        &canvas,
        1,
        2,
        0,
        0,
        Scale::linear_fit(hist.edges.iter().copied()),
        Scale::linear_fit([0.0, hist.max_count() as f64]),
    );
    linear.draw_frame(&mut canvas, "Degree Distribution", "Degree", "Count");
    linear.bars(&mut canvas, &hist, SERIES[0], 0.7);

    let mut frequency: BTreeMap<usize, usize> = BTreeMap::new();
    for &d in degrees {
        *frequency.entry(d).or_insert(0) += 1;
    }
    let points: Vec<(f64, f64)> = frequency
        .iter()
        .filter(|(&d, _)| d > 0)
        .map(|(&d, &c)| (d as f64, c as f64))
        .collect();

    let log = Axes::in_cell(
        &canvas,
        1,
        2,
        0,
        1,
        Scale::log_fit(points.iter().map(|p| p.0)),
        Scale::log_fit(points.iter().map(|p| p.1)),
    );
    log.draw_frame(&mut canvas, "Degree Distribution (Log-Log)", "Degree", "Count");
    let radius = canvas.font(3.0);
    log.scatter(&mut canvas, &points, radius, SERIES[0], 0.6);

    let label;
    let mut legend = Vec::new();
    let fit_width = canvas.font(2.0);
    if let (Some(fit), Some(x_min), Some(x_max), Some(y_max)) = (
        fit,
        points.first().map(|p| p.0),
        points.last().map(|p| p.0),
        points.iter().map(|p| p.1).reduce(f64::max),
    ) {
        // Anchored so the line passes through (max degree, max count)
        let (lo, hi) = (x_min.log10(), x_max.log10());
        let line: Vec<(f64, f64)> = (0..100)
            .map(|i| {
                let x = 10f64.powf(lo + (hi - lo) * i as f64 / 99.0);
                (x, x.powf(-fit.alpha) * y_max * x_max.powf(fit.alpha))
            })
            .collect();
        log.plot(&mut canvas, &line, TARGETED, fit_width, false);
        label = format!("Power-law fit (γ={:.2})", fit.alpha);
        legend.push((label.as_str(), TARGETED));
    }
    canvas.legend(&log, &legend);

    canvas.save(path)?;
    info!(path = %path.display(), "Saved degree distribution");
    Ok(())
}

/// Degree against PageRank, coloured by betweenness, top 10 PageRank ringed
pub fn plot_power_structure(path: &Path, table: &CentralityTable, dpi: u32) -> ReportResult<()> {
    let mut canvas = Canvas::for_figure(10.0, 8.0, dpi);
    let mut axes = Axes::in_cell(
        &canvas,
        1,
        1,
        0,
        0,
        Scale::linear_fit(table.rows.iter().map(|r| r.degree as f64)),
        Scale::linear_fit(table.rows.iter().map(|r| r.pagerank)),
    );
    // Room for the colour bar
    axes.width *= 0.88;
    axes.draw_frame(
        &mut canvas,
        "Power Structure Map (Color = Betweenness Centrality)",
        "Degree",
        "PageRank",
    );

    let max_betweenness = table.rows.iter().map(|r| r.betweenness).fold(0.0, f64::max);
    let radius = canvas.font(4.0);
    for row in &table.rows {
        let t = if max_betweenness > 0.0 { row.betweenness / max_betweenness } else { 0.0 };
        if let Some(p) = axes.project(row.degree as f64, row.pagerank) {
            canvas.circle(p, radius, &viridis(t), 0.6);
        }
    }

    let ring = canvas.font(8.0);
    let ring_width = canvas.font(1.5);
    for row in table.top_pagerank(10) {
        if let Some(p) = axes.project(row.degree as f64, row.pagerank) {
            canvas.ring(p, ring, TARGETED, ring_width);
        }
    }
    canvas.legend(&axes, &[("Top 10 PageRank", TARGETED)]);

    // Colour bar
    let bar_x = axes.x + axes.width + canvas.width * 0.03;
    let bar_w = canvas.width * 0.02;
    let steps = 64;
    let step_h = axes.height / steps as f64;
    for i in 0..steps {
        let t = 1.0 - i as f64 / (steps - 1) as f64;
        canvas.rect(bar_x, axes.y + step_h * i as f64, bar_w, step_h + 0.5, &viridis(t), 1.0);
    }
    let size = canvas.font(9.0);
    canvas.text((bar_x + bar_w + size * 0.3, axes.y + size), size, "start", &format!("{max_betweenness:.3}"));
    canvas.text((bar_x + bar_w + size * 0.3, axes.y + axes.height), size, "start", "0");
    canvas.vertical_text((bar_x + bar_w + size * 3.5, axes.y + axes.height / 2.0), size * 1.1, "Betweenness");

    canvas.save(path)?;
    info!(path = %path.display(), "Saved power structure map");
    Ok(())
}

/// Pairwise centrality scatters and the normalised distributions
pub fn plot_centrality_correlation(path: &Path, table: &CentralityTable, dpi: u32) -> ReportResult<()> {
    let mut canvas = Canvas::for_figure(12.0, 10.0, dpi);
    let radius = canvas.font(2.5);

    let degree: Vec<f64> = table.rows.iter().map(|r| r.degree as f64).collect();
    let pagerank: Vec<f64> = table.rows.iter().map(|r| r.pagerank).collect();
    let betweenness: Vec<f64> = table.rows.iter().map(|r| r.betweenness).collect();

    let pairs: [(&[f64], &[f64], &str, &str, (usize, usize)); 3] = [
        (degree.as_slice(), pagerank.as_slice(), "Degree", "PageRank", (0, 0)),
        (degree.as_slice(), betweenness.as_slice(), "Degree", "Betweenness", (0, 1)),
        (pagerank.as_slice(), betweenness.as_slice(), "PageRank", "Betweenness", (1, 0)),
    ];
    for (xs, ys, x_label, y_label, (row, col)) in pairs {
        let axes = Axes::in_cell(
            &canvas,
            2,
            2,
            row,
            col,
            Scale::linear_fit(xs.iter().copied()),
            Scale::linear_fit(ys.iter().copied()),
        );
        axes.draw_frame(&mut canvas, &format!("{x_label} vs {y_label}"), x_label, y_label);
        let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        axes.scatter(&mut canvas, &points, radius, SERIES[0], 0.5);
    }

    let series = [
        ("Degree", table.rows.iter().map(|r| r.degree_norm).collect::<Vec<_>>()),
        ("PageRank", table.rows.iter().map(|r| r.pagerank_norm).collect()),
        ("Betweenness", table.rows.iter().map(|r| r.betweenness_norm).collect()),
    ];
    let hists: Vec<_> = series.iter().map(|(_, v)| histogram(v, 30)).collect();
    let max_count = hists.iter().map(|h| h.max_count()).max().unwrap_or(1).max(1);
    let axes = Axes::in_cell(
        &canvas,
        2,
        2,
        1,
        1,
        Scale::Linear { min: -0.05, max: 1.05 },
        Scale::log_fit([1.0, max_count as f64]),
    );
    axes.draw_frame(&mut canvas, "Centrality Distributions", "Normalized Centrality", "Count");
    for (hist, colour) in hists.iter().zip(SERIES) {
        axes.bars(&mut canvas, hist, colour, 0.5);
    }
    let legend: Vec<(&str, &str)> = series.iter().zip(SERIES).map(|((name, _), c)| (*name, c)).collect();
    canvas.legend(&axes, &legend);

    canvas.save(path)?;
    info!(path = %path.display(), "Saved centrality correlation");
    Ok(())
}

/// Force-directed drawing of a node sample coloured by community
pub fn plot_communities(
    path: &Path,
    detection: &CommunityDetection,
    config: &VisualizationConfig,
    seed: u64,
) -> ReportResult<()> {
    let component = &detection.component;
    let n = component.node_count;
    let mut rng = StdRng::seed_from_u64(derive_seed(seed, SeedStream::Layout));

    let mut keep = vec![n <= config.community_sample_nodes; n];
    if n > config.community_sample_nodes {
        for idx in rand::seq::index::sample(&mut rng, n, config.community_sample_nodes).into_vec() {
            keep[idx] = true;
        }
    }
    let members: Vec<usize> = (0..n).filter(|&i| keep[i]).collect();
    let sample = component.induced_subgraph(&keep);
    info!(nodes = sample.node_count, edges = sample.undirected_edge_count(), "Laying out community sample");

    let positions = force_layout(&sample, config.layout_iterations, derive_seed(seed, SeedStream::Layout));

    let mut canvas = Canvas::for_figure(12.0, 10.0, config.figure_dpi);
    let (width, height) = (canvas.width, canvas.height);
    let margin = width * 0.05;
    let top = height * 0.08;
    let side = (width - 2.0 * margin).min(height - top - margin);
    let origin = ((width - side) / 2.0, top);
    let to_px = |i: usize| (origin.0 + positions[i].x * side, origin.1 + positions[i].y * side);

    let edge_width = canvas.font(0.5);
    for u in 0..sample.node_count {
        for &v in sample.neighbors(u) {
            if v > u {
                canvas.line(to_px(u), to_px(v), INK, edge_width, 0.2);
            }
        }
    }

    let radius = canvas.font(3.5);
    for (i, &member) in members.iter().enumerate() {
        let colour = TAB20[detection.partition[member] % TAB20.len()];
        canvas.circle(to_px(i), radius, colour, 0.8);
    }

    let size = canvas.font(13.0);
    canvas.text(
        (width / 2.0, top * 0.6),
        size,
        "middle",
        &format!(
            "Community Structure ({} communities, {} sampled nodes)",
            detection.report.num_communities,
            members.len()
        ),
    );

    canvas.save(path)?;
    info!(path = %path.display(), "Saved community visualization");
    Ok(())
}

/// Largest component against removal percentage for both strategies
pub fn plot_robustness(path: &Path, report: &RobustnessReport, dpi: u32) -> ReportResult<()> {
    let mut canvas = Canvas::for_figure(10.0, 6.0, dpi);

    let targeted: Vec<(f64, f64)> = report
        .targeted_attack
        .iter()
        .map(|(&pct, r)| (pct as f64, r.largest_component_pct))
        .collect();
    let random: Vec<(f64, f64, f64)> = report
        .random_failure
        .iter()
        .map(|(&pct, r)| (pct as f64, r.largest_component_pct, r.std))
        .collect();

    let xs = targeted.iter().map(|p| p.0).chain(random.iter().map(|p| p.0));
    let axes = Axes::in_cell(
        &canvas,
        1,
        1,
        0,
        0,
        Scale::linear_fit(xs.chain([0.0])),
        Scale::Linear { min: 0.0, max: 105.0 },
    );
    axes.draw_frame(
        &mut canvas,
        "Network Robustness: Targeted vs Random",
        "Percentage of Nodes Removed (%)",
        "Largest Component Size (% of original)",
    );

    let line = canvas.font(2.0);
    let marker = canvas.font(4.0);
    let threshold_width = canvas.font(1.0);
    axes.hline(&mut canvas, 50.0, THRESHOLD, threshold_width);

    axes.plot(&mut canvas, &targeted, TARGETED, line, false);
    axes.scatter(&mut canvas, &targeted, marker, TARGETED, 1.0);

    let random_line: Vec<(f64, f64)> = random.iter().map(|&(x, y, _)| (x, y)).collect();
    axes.error_bars(&mut canvas, &random, RANDOM, line * 0.75);
    axes.plot(&mut canvas, &random_line, RANDOM, line, false);
    for &(x, y) in &random_line {
        if let Some(p) = axes.project(x, y) {
            canvas.square(p, marker, RANDOM);
        }
    }

    canvas.legend(
        &axes,
        &[("Targeted Attack", TARGETED), ("Random Failure", RANDOM), ("50% Threshold", THRESHOLD)],
    );

    canvas.save(path)?;
    info!(path = %path.display(), "Saved robustness analysis");
    Ok(())
}
