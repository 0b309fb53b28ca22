//! Network properties: scale-free and small-world tests

use super::powerlaw::{compare_with_exponential, fit_discrete_power_law, PowerLawFit};
use super::{derive_seed, SeedStream};
use crate::config::PropertiesConfig;
use commgraph_algorithms::{
    average_clustering, count_triangles, largest_component, mean_path_length, transitivity,
    GraphView,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Power-law fit of the degree distribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScaleFreeReport {
    pub power_law_exponent: Option<f64>,
    pub xmin: Option<u64>,
    pub ks_distance: Option<f64>,
    /// Log-likelihood ratio power law vs exponential
    pub loglikelihood_ratio: Option<f64>,
    pub p_value: Option<f64>,
    pub is_scale_free: bool,
}

/// Small-world comparison against an Erdős–Rényi graph of equal size and density
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmallWorldReport {
    pub sigma: Option<f64>,
    pub clustering_coeff: f64,
    pub transitivity: f64,
    pub triangles: usize,
    pub avg_path_length: Option<f64>,
    /// Whether `avg_path_length` comes from sampled sources
    pub path_length_sampled: bool,
    pub clustering_random: f64,
    /// `None` when the random reference is not connected (n·p ≤ 1)
    pub path_length_random: Option<f64>,
    pub is_small_world: bool,
}

/// Both reports, as written to `network_properties.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkProperties {
    pub power_law: ScaleFreeReport,
    pub small_world: SmallWorldReport,
}

/// Scale-free test of a degree sequence
///
/// Also returns the fit itself for plotting.
pub fn test_scale_free(degrees: &[usize]) -> (ScaleFreeReport, Option<PowerLawFit>) {
    info!("Fitting power law to degree distribution");
    let data: Vec<u64> = degrees.iter().map(|&d| d as u64).collect();

    let Some(fit) = fit_discrete_power_law(&data) else {
        info!("Too few distinct degrees for a power-law fit");
        let report = ScaleFreeReport {
            power_law_exponent: None,
            xmin: None,
            ks_distance: None,
            loglikelihood_ratio: None,
            p_value: None,
            is_scale_free: false,
        };
        return (report, None);
    };

    let comparison = compare_with_exponential(&data, &fit);
    let report = ScaleFreeReport {
        power_law_exponent: Some(fit.alpha),
        xmin: Some(fit.xmin),
        ks_distance: Some(fit.ks_distance),
        loglikelihood_ratio: Some(comparison.ratio),
        p_value: Some(comparison.p_value),
        is_scale_free: comparison.p_value > 0.05 && comparison.ratio > 0.0,
    };

    info!(
        alpha = fit.alpha,
        xmin = fit.xmin,
        ratio = comparison.ratio,
        p_value = comparison.p_value,
        scale_free = report.is_scale_free,
        "Power-law fit"
    );

    (report, Some(fit))
}

/// Small-world coefficient of the largest connected component
pub fn calculate_small_world(view: &GraphView, config: &PropertiesConfig, seed: u64) -> SmallWorldReport {
    let lcc = largest_component(view);
    let n = lcc.node_count;
    let m = lcc.undirected_edge_count();

    info!(nodes = n, "Computing clustering coefficient");
    let clustering = average_clustering(&lcc);
    let triangles = count_triangles(&lcc);
    let global = transitivity(&lcc);

    let sampled = n > config.path_length_samples;
    let sources: Vec<usize> = if sampled {
        let mut rng = StdRng::seed_from_u64(derive_seed(seed, SeedStream::PathLength));
        rand::seq::index::sample(&mut rng, n, config.path_length_samples).into_vec()
    } else {
        (0..n).collect()
    };
    info!(sources = sources.len(), sampled, "Computing average path length");
    let path_length = mean_path_length(&lcc, &sources);

    let p = if n > 1 { 2.0 * m as f64 / (n as f64 * (n - 1) as f64) } else { 0.0 };
    let clustering_random = p;
    let np = n as f64 * p;
    let path_length_random = if np > 1.0 { Some((n as f64).ln() / np.ln()) } else { None };

    let sigma = match (path_length, path_length_random) {
        (Some(l), Some(l_rand)) if clustering_random > 0.0 && l > 0.0 && l_rand > 0.0 => {
            Some((clustering / clustering_random) / (l / l_rand))
        }
        _ => None,
    };

    let report = SmallWorldReport {
        sigma,
        clustering_coeff: clustering,
        transitivity: global,
        triangles,
        avg_path_length: path_length,
        path_length_sampled: sampled,
        clustering_random,
        path_length_random,
        is_small_world: sigma.map_or(false, |s| s > 1.0),
    };

    info!(
        clustering = report.clustering_coeff,
        path_length = ?report.avg_path_length,
        sigma = ?report.sigma,
        small_world = report.is_small_world,
        "Small-world analysis"
    );

    report
}
