use commgraph::{run, AnalysisConfig, PipelineOptions};
use std::fmt::Write as _;
use std::path::Path;
use tempfile::TempDir;

/// Four dense teams of 12 with a few cross-team contacts, written as an edge list
fn write_edge_list(path: &Path) {
    let mut text = String::from("# Synthetic contact network\n# FromNodeId\tToNodeId\n");
    for team in 0..4u64 {
        let base = team * 100;
        for i in 0..12 {
            for j in (i + 1)..12 {
                if (i + j) % 3 != 0 {
                    writeln!(text, "{}\t{}", base + i, base + j).unwrap();
                }
            }
        }
    }
    for (a, b) in [(0, 100), (105, 200), (210, 300), (311, 1), (50_000, 50_001)] {
        writeln!(text, "{}\t{}", a, b).unwrap();
    }
    std::fs::write(path, text).unwrap();
}

fn config_in(dir: &TempDir) -> AnalysisConfig {
    let input = dir.path().join("contacts.txt");
    write_edge_list(&input);

    let yaml = format!(
        "data:\n  input_file: {}\n  output_dir: {}\nanalysis:\n  seed: 7\n  robustness:\n    random_trials: 3\nvisualization:\n  figure_dpi: 40\n  community_sample_nodes: 30\n  layout_iterations: 10\n",
        input.display(),
        dir.path().join("outputs").display()
    );
    AnalysisConfig::from_yaml(&yaml).unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_full_run_writes_every_output() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let summary = run(&config, &PipelineOptions::default()).unwrap();

    let metrics = config.metrics_dir();
    let plots = config.plots_dir();
    for name in [
        "basic_stats.json",
        "centrality.csv",
        "power_structure.json",
        "communities.json",
        "community_assignments.csv",
        "network_properties.json",
        "robustness.json",
    ] {
        assert!(metrics.join(name).exists(), "missing {}", name);
    }
    for name in [
        "degree_distribution.svg",
        "power_structure_map.svg",
        "centrality_correlation.svg",
        "community_visualization.svg",
        "robustness_analysis.svg",
    ] {
        let path = plots.join(name);
        assert!(path.exists(), "missing {}", name);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("<svg"));
    }
    assert_eq!(summary.written.len(), 12);

    let basic = read_json(&metrics.join("basic_stats.json"));
    assert_eq!(basic["num_nodes"], 50);
    assert_eq!(basic["connected_components"], 2);
    assert_eq!(basic["lcc_nodes"], 48);
    assert_eq!(basic["is_directed"], false);
    // Filled in by the small-world step
    assert!(basic["avg_path_length"].as_f64().unwrap() > 1.0);

    let centrality = std::fs::read_to_string(metrics.join("centrality.csv")).unwrap();
    let mut lines = centrality.lines();
    assert_eq!(
        lines.next(),
        Some("node,degree,pagerank,betweenness,degree_norm,pagerank_norm,betweenness_norm")
    );
    assert_eq!(lines.count(), 50);

    let communities = read_json(&metrics.join("communities.json"));
    assert_eq!(communities["lcc_nodes"], 48);
    assert_eq!(communities["sampling_method"], "probabilistic (80%)");
    assert!(communities["modularity"].as_f64().unwrap() > 0.3);

    let assignments = std::fs::read_to_string(metrics.join("community_assignments.csv")).unwrap();
    assert_eq!(assignments.lines().count(), 49);

    let robustness = read_json(&metrics.join("robustness.json"));
    for pct in ["1", "5", "10", "20"] {
        assert!(robustness["targeted_attack"][pct].is_object());
        assert!(robustness["random_failure"][pct]["std"].is_number());
    }

    let properties = read_json(&metrics.join("network_properties.json"));
    assert!(properties["small_world"]["clustering_coeff"].as_f64().unwrap() > 0.3);
    assert!(properties["power_law"]["is_scale_free"].is_boolean());
}

#[test]
fn test_same_seed_same_results() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let options = PipelineOptions {
        skip_viz: true,
        ..Default::default()
    };

    let a = run(&config_in(&first), &options).unwrap();
    let b = run(&config_in(&second), &options).unwrap();

    assert_eq!(a.communities, b.communities);
    assert_eq!(a.robustness, b.robustness);
    assert_eq!(a.basic.diameter_lcc, b.basic.diameter_lcc);
    let top_a: Vec<u64> = a.centrality.top_pagerank(5).iter().map(|r| r.node).collect();
    let top_b: Vec<u64> = b.centrality.top_pagerank(5).iter().map(|r| r.node).collect();
    assert_eq!(top_a, top_b);
}

#[test]
fn test_skip_viz_writes_no_plots() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let options = PipelineOptions {
        skip_viz: true,
        ..Default::default()
    };
    run(&config, &options).unwrap();

    let plots: Vec<_> = std::fs::read_dir(config.plots_dir()).unwrap().collect();
    assert!(plots.is_empty());
    assert!(config.metrics_dir().join("robustness.json").exists());
}
