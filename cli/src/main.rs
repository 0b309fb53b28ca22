//! Commgraph CLI: run the communication network analysis from the command line

use clap::Parser;
use comfy_table::{ContentArrangement, Table};
use commgraph::{AnalysisConfig, AnalysisSummary, PipelineOptions};
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "commgraph", version, about = "Communication network analysis")]
struct Cli {
    /// Configuration file (YAML); defaults apply when the default file is absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge-list file, overrides data.input_file
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output directory, overrides data.output_dir
    #[arg(long)]
    output: Option<PathBuf>,

    /// Random seed, overrides analysis.seed
    #[arg(long)]
    seed: Option<u64>,

    /// Skip visualization generation
    #[arg(long)]
    skip_viz: bool,

    /// Skip robustness analysis
    #[arg(long)]
    skip_robustness: bool,

    /// Skip network properties analysis
    #[arg(long)]
    skip_properties: bool,

    /// Skip community detection
    #[arg(long)]
    skip_community: bool,

    /// Summary format
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() {
    // stdout carries the results; diagnostics go to stderr
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig, commgraph::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => AnalysisConfig::load(DEFAULT_CONFIG)?,
        None => {
            warn!("No {} found, using default configuration", DEFAULT_CONFIG);
            AnalysisConfig::default()
        }
    };

    if let Some(data) = &cli.data {
        config.data.input_file = data.clone();
    }
    if let Some(output) = &cli.output {
        config.data.output_dir = output.clone();
    }
    if let Some(seed) = cli.seed {
        config.analysis.seed = seed;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    let options = PipelineOptions {
        skip_viz: cli.skip_viz,
        skip_robustness: cli.skip_robustness,
        skip_properties: cli.skip_properties,
        skip_community: cli.skip_community,
    };

    let summary = commgraph::run(&config, &options)?;

    match cli.format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(())
}

fn print_json(summary: &AnalysisSummary) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(&summary_json(summary))?);
    Ok(())
}

fn summary_json(summary: &AnalysisSummary) -> serde_json::Value {
    let top: Vec<_> = summary.centrality.top_pagerank(10);
    serde_json::json!({
        "basic": summary.basic,
        "top_pagerank": top,
        "power_structure": {
            "hidden_influencers": summary.power.hidden_influencers.len(),
            "information_brokers": summary.power.information_brokers.len(),
            "power_hubs": summary.power.power_hubs.len(),
        },
        "communities": summary.communities,
        "network_properties": summary.properties,
        "robustness": summary.robustness,
        "written": summary.written,
    })
}

fn format_optional(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.*}", precision, v))
}

fn print_summary(summary: &AnalysisSummary) {
    let top = summary.centrality.top_pagerank(10);
    if !top.is_empty() {
        println!("\nTop 10 nodes by PageRank:");
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["node", "degree", "pagerank", "betweenness"]);
        for row in &top {
            table.add_row(vec![
                row.node.to_string(),
                row.degree.to_string(),
                format!("{:.6}", row.pagerank),
                format!("{:.6}", row.betweenness),
            ]);
        }
        println!("{}", table);
    }

    let basic = &summary.basic;
    println!("\nRESULTS SUMMARY");
    println!("\nNetwork Stats:");
    println!("  Nodes:             {}", basic.num_nodes);
    println!("  Edges:             {}", basic.num_edges);
    println!("  Density:           {:.6}", basic.density);
    println!("  Largest component: {:.1}%", basic.lcc_fraction * 100.0);

    if let Some(first) = top.first() {
        println!("\nPower Structure:");
        println!("  Top influencer:      Node {}", first.node);
        println!("  Hidden influencers:  {}", summary.power.hidden_influencers.len());
        println!("  Information brokers: {}", summary.power.information_brokers.len());
        println!("  Power hubs:          {}", summary.power.power_hubs.len());
    }

    if let Some(communities) = &summary.communities {
        println!("\nCommunities:");
        println!("  Found:      {}", communities.num_communities);
        println!("  Modularity: {:.3}", communities.modularity);
        println!("  Largest:    {} nodes", communities.largest_community_size);
    }

    if let Some(properties) = &summary.properties {
        println!("\nNetwork Properties:");
        println!(
            "  Power-law exponent: {}",
            format_optional(properties.power_law.power_law_exponent, 2)
        );
        println!("  Scale-free:         {}", properties.power_law.is_scale_free);
        println!("  Small-world sigma:  {}", format_optional(properties.small_world.sigma, 2));
    }

    if let Some(robustness) = &summary.robustness {
        println!("\nRobustness:");
        for (pct, targeted) in &robustness.targeted_attack {
            let random = robustness.random_failure.get(pct).map(|r| r.largest_component_pct);
            println!(
                "  {:>3}% removed: targeted {:.1}% remains, random {}% remains",
                pct,
                targeted.largest_component_pct,
                format_optional(random, 1)
            );
        }
        let critical = |p: Option<u32>| p.map_or_else(|| "none".to_string(), |p| format!("{}%", p));
        println!("  Critical point (targeted): {}", critical(robustness.critical_point_targeted));
        println!("  Critical point (random):   {}", critical(robustness.critical_point_random));
    }

    println!("\nResults saved to: {}", summary.output_dir.display());
    for path in &summary.written {
        let shown = path.strip_prefix(&summary.output_dir).unwrap_or(path);
        println!("  - {}", shown.display());
    }
}
