//! End-to-end analysis run
//!
//! load → basic metrics → centrality → power structure → communities →
//! network properties → robustness → figures. Every step writes its results
//! under the configured output directory as soon as it finishes.

use crate::analysis::{
    calculate_small_world, compute_basic_metrics, compute_centralities, detect_communities,
    identify_power_structure, simulate_random_failure, simulate_targeted_attack, test_scale_free,
    BasicMetrics, CentralityTable, CommunityReport, NetworkProperties, PowerStructure,
    RobustnessReport,
};
use crate::config::{AnalysisConfig, ConfigError};
use crate::graph::{load_graph, LoadError};
use crate::report::{self, ReportError};
use crate::viz;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load graph: {0}")]
    Load(#[from] LoadError),

    #[error("Failed to write results: {0}")]
    Report(#[from] ReportError),

    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Steps to leave out of a run
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    pub skip_viz: bool,
    pub skip_robustness: bool,
    pub skip_properties: bool,
    pub skip_community: bool,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub basic: BasicMetrics,
    pub centrality: CentralityTable,
    pub power: PowerStructure,
    pub communities: Option<CommunityReport>,
    pub properties: Option<NetworkProperties>,
    pub robustness: Option<RobustnessReport>,
    /// Files written, in order
    pub written: Vec<PathBuf>,
    pub output_dir: PathBuf,
}

struct Outputs {
    metrics: PathBuf,
    plots: PathBuf,
    written: Vec<PathBuf>,
}

impl Outputs {
    fn metric(&self, name: &str) -> PathBuf {
        self.metrics.join(name)
    }

    fn plot(&self, name: &str) -> PathBuf {
        self.plots.join(name)
    }

    fn record(&mut self, path: PathBuf) {
        if !self.written.contains(&path) {
            self.written.push(path);
        }
    }
}

fn create_dir(path: &Path) -> PipelineResult<()> {
    std::fs::create_dir_all(path).map_err(|source| PipelineError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn step(number: usize, name: &str) {
    info!("STEP {}: {}", number, name);
}

fn skipped(number: usize, name: &str) {
    info!("STEP {}: {} - SKIPPED", number, name);
}

/// Run the full analysis
pub fn run(config: &AnalysisConfig, options: &PipelineOptions) -> PipelineResult<AnalysisSummary> {
    config.validate()?;
    let started = Instant::now();
    let seed = config.analysis.seed;

    let mut out = Outputs {
        metrics: config.metrics_dir(),
        plots: config.plots_dir(),
        written: Vec::new(),
    };
    create_dir(&out.metrics)?;
    create_dir(&out.plots)?;
    info!(
        data = %config.data.input_file.display(),
        output = %config.data.output_dir.display(),
        seed,
        "Starting analysis"
    );

    step(1, "Loading Graph");
    let graph = load_graph(&config.data.input_file)?;
    let view = &graph.view;

    step(2, "Computing Basic Metrics");
    let mut basic = compute_basic_metrics(&graph, seed);
    let basic_path = out.metric("basic_stats.json");
    report::write_json(&basic_path, &basic)?;
    out.record(basic_path.clone());

    let mut summary = AnalysisSummary {
        basic: basic.clone(),
        centrality: CentralityTable::default(),
        power: PowerStructure::default(),
        communities: None,
        properties: None,
        robustness: None,
        written: Vec::new(),
        output_dir: config.data.output_dir.clone(),
    };

    if graph.node_count() == 0 {
        warn!("Graph is empty, skipping the remaining steps");
        summary.written = out.written;
        return Ok(summary);
    }

    step(3, "Centrality Analysis");
    let centrality = compute_centralities(view, &config.analysis.centrality, seed);
    let centrality_path = out.metric("centrality.csv");
    report::write_centrality_csv(&centrality_path, &centrality)?;
    out.record(centrality_path);

    step(4, "Power Structure Analysis");
    let power = identify_power_structure(&centrality, &config.analysis.power_structure);
    let power_path = out.metric("power_structure.json");
    report::write_json(&power_path, &power)?;
    out.record(power_path);

    if options.skip_community {
        skipped(5, "Community Detection");
    } else {
        step(5, "Community Detection");
        let detection = detect_communities(view, &config.analysis.community, seed);
        let report_path = out.metric("communities.json");
        report::write_json(&report_path, &detection.report)?;
        out.record(report_path);
        let assignments_path = out.metric("community_assignments.csv");
        report::write_community_assignments_csv(&assignments_path, &detection.component, &detection.partition)?;
        out.record(assignments_path);

        if !options.skip_viz {
            let plot = out.plot("community_visualization.svg");
            viz::plot_communities(&plot, &detection, &config.visualization, seed)?;
            out.record(plot);
        }
        summary.communities = Some(detection.report);
    }

    if options.skip_properties {
        skipped(6, "Network Properties Analysis");
    } else {
        step(6, "Network Properties Analysis");
        let degrees: Vec<usize> = (0..view.node_count).map(|i| view.degree(i)).collect();
        let (power_law, fit) = test_scale_free(&degrees);
        if !options.skip_viz {
            let plot = out.plot("degree_distribution.svg");
            viz::plot_degree_distribution(&plot, &degrees, fit.as_ref(), config.visualization.figure_dpi)?;
            out.record(plot);
        }

        let small_world = calculate_small_world(view, &config.analysis.properties, seed);
        let properties = NetworkProperties {
            power_law,
            small_world,
        };
        let properties_path = out.metric("network_properties.json");
        report::write_json(&properties_path, &properties)?;
        out.record(properties_path);

        basic.avg_path_length = properties.small_world.avg_path_length;
        report::write_json(&basic_path, &basic)?;
        summary.properties = Some(properties);
    }

    if options.skip_robustness {
        skipped(7, "Robustness Analysis");
    } else {
        step(7, "Robustness Analysis");
        let robustness_config = &config.analysis.robustness;
        let targeted = simulate_targeted_attack(view, &centrality, robustness_config);
        let random = simulate_random_failure(view, robustness_config, seed);
        let robustness = RobustnessReport::new(targeted, random);
        info!(
            critical_targeted = ?robustness.critical_point_targeted,
            critical_random = ?robustness.critical_point_random,
            "Robustness simulated"
        );

        if !options.skip_viz {
            let plot = out.plot("robustness_analysis.svg");
            viz::plot_robustness(&plot, &robustness, config.visualization.figure_dpi)?;
            out.record(plot);
        }
        let robustness_path = out.metric("robustness.json");
        report::write_json(&robustness_path, &robustness)?;
        out.record(robustness_path);
        summary.robustness = Some(robustness);
    }

    if options.skip_viz {
        skipped(8, "Generating Additional Visualizations");
    } else {
        step(8, "Generating Additional Visualizations");
        let dpi = config.visualization.figure_dpi;
        let plot = out.plot("power_structure_map.svg");
        viz::plot_power_structure(&plot, &centrality, dpi)?;
        out.record(plot);
        let plot = out.plot("centrality_correlation.svg");
        viz::plot_centrality_correlation(&plot, &centrality, dpi)?;
        out.record(plot);
    }

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        files = out.written.len(),
        "Analysis complete"
    );

    summary.basic = basic;
    summary.centrality = centrality;
    summary.power = power;
    summary.written = out.written;
    Ok(summary)
}
