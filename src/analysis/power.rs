//! Power structure: hidden influencers, information brokers, power hubs
//!
//! - Hidden influencers rank far higher by PageRank than by degree.
//! - Brokers have high betweenness relative to their degree.
//! - Hubs score near the maximum on every measure.

use super::centrality::{CentralityRow, CentralityTable};
use crate::config::PowerStructureConfig;
use commgraph_algorithms::NodeId;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A node singled out by the power-structure analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerRecord {
    pub node: NodeId,
    pub degree: usize,
    pub pagerank: f64,
    pub betweenness: f64,
    pub degree_norm: f64,
    pub pagerank_norm: f64,
    pub betweenness_norm: f64,
    pub pagerank_rank: f64,
    pub degree_rank: f64,
    /// `degree_rank - pagerank_rank`
    pub rank_difference: f64,
    /// `betweenness / (degree + 1)`
    pub brokerage_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerStructure {
    pub hidden_influencers: Vec<PowerRecord>,
    pub information_brokers: Vec<PowerRecord>,
    pub power_hubs: Vec<PowerRecord>,
}

/// 1-based descending ranks; tied values share the mean of their positions
pub fn average_ranks_desc(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Quantile with linear interpolation between order statistics
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

fn record(row: &CentralityRow, pagerank_rank: f64, degree_rank: f64) -> PowerRecord {
    PowerRecord {
        node: row.node,
        degree: row.degree,
        pagerank: row.pagerank,
        betweenness: row.betweenness,
        degree_norm: row.degree_norm,
        pagerank_norm: row.pagerank_norm,
        betweenness_norm: row.betweenness_norm,
        pagerank_rank,
        degree_rank,
        rank_difference: degree_rank - pagerank_rank,
        brokerage_score: row.betweenness / (row.degree as f64 + 1.0),
    }
}

/// Identify hidden influencers, brokers and power hubs
pub fn identify_power_structure(table: &CentralityTable, config: &PowerStructureConfig) -> PowerStructure {
    let pagerank: Vec<f64> = table.rows.iter().map(|r| r.pagerank).collect();
    let degree: Vec<f64> = table.rows.iter().map(|r| r.degree as f64).collect();
    let betweenness: Vec<f64> = table.rows.iter().map(|r| r.betweenness).collect();

    let pagerank_rank = average_ranks_desc(&pagerank);
    let degree_rank = average_ranks_desc(&degree);
    let records: Vec<PowerRecord> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| record(row, pagerank_rank[i], degree_rank[i]))
        .collect();

    let by_pagerank = table.ranked_by(|r| r.pagerank);

    let hidden_influencers: Vec<PowerRecord> = by_pagerank
        .iter()
        .take(config.top_pagerank_pool)
        .filter(|&&i| records[i].rank_difference > config.rank_gap)
        .take(config.max_records)
        .map(|&i| records[i].clone())
        .collect();

    let information_brokers = match quantile(&betweenness, config.betweenness_threshold) {
        Some(threshold) => {
            let mut brokers: Vec<usize> =
                (0..records.len()).filter(|&i| betweenness[i] >= threshold).collect();
            // Stable: equal brokerage keeps index order
            brokers.sort_by(|&a, &b| records[b].brokerage_score.total_cmp(&records[a].brokerage_score));
            brokers
                .into_iter()
                .take(config.max_records)
                .map(|i| records[i].clone())
                .collect()
        }
        None => Vec::new(),
    };

    let t = config.hub_threshold;
    let power_hubs: Vec<PowerRecord> = by_pagerank
        .iter()
        .filter(|&&i| {
            let r = &records[i];
            r.degree_norm >= t && r.pagerank_norm >= t && r.betweenness_norm >= t
        })
        .map(|&i| records[i].clone())
        .collect();

    info!(
        hidden_influencers = hidden_influencers.len(),
        information_brokers = information_brokers.len(),
        power_hubs = power_hubs.len(),
        "Power structure identified"
    );

    PowerStructure {
        hidden_influencers,
        information_brokers,
        power_hubs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(node: NodeId, degree: usize, pagerank: f64, betweenness: f64) -> CentralityRow {
        CentralityRow {
            node,
            degree,
            pagerank,
            betweenness,
            degree_norm: 0.0,
            pagerank_norm: 0.0,
            betweenness_norm: 0.0,
        }
    }

    #[test]
    fn test_average_ranks() {
        let ranks = average_ranks_desc(&[10.0, 30.0, 10.0, 20.0]);
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&values, 0.5), Some(3.0));
        assert!((quantile(&values, 0.9).unwrap() - 4.6).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_hidden_influencer_needs_rank_gap() {
        // Node 99: low degree, top PageRank
        let mut rows = vec![row(99, 1, 0.5, 0.0)];
        for i in 0..10 {
            rows.push(row(i, 10 + i as usize, 0.01, 0.0));
        }
        let table = CentralityTable { rows };
        let config = PowerStructureConfig {
            rank_gap: 5.0,
            ..Default::default()
        };

        let power = identify_power_structure(&table, &config);
        assert_eq!(power.hidden_influencers.len(), 1);
        let hidden = &power.hidden_influencers[0];
        assert_eq!(hidden.node, 99);
        assert_eq!(hidden.pagerank_rank, 1.0);
        assert_eq!(hidden.degree_rank, 11.0);
        assert_eq!(hidden.rank_difference, 10.0);
    }

    #[test]
    fn test_brokers_sorted_by_brokerage() {
        let rows = vec![
            row(1, 9, 0.1, 0.9),
            row(2, 1, 0.1, 0.8),
            row(3, 5, 0.1, 0.0),
            row(4, 5, 0.1, 0.0),
        ];
        let table = CentralityTable { rows };
        let config = PowerStructureConfig {
            betweenness_threshold: 0.5,
            ..Default::default()
        };

        let power = identify_power_structure(&table, &config);
        let nodes: Vec<NodeId> = power.information_brokers.iter().map(|r| r.node).collect();
        // threshold = 0.4; brokerage: node 2 = 0.4, node 1 = 0.09
        assert_eq!(nodes, vec![2, 1]);
    }

    #[test]
    fn test_power_hubs_need_every_measure() {
        let mut hub = row(1, 10, 0.4, 0.5);
        hub.degree_norm = 1.0;
        hub.pagerank_norm = 1.0;
        hub.betweenness_norm = 1.0;
        let mut near = row(2, 9, 0.35, 0.1);
        near.degree_norm = 0.9;
        near.pagerank_norm = 0.9;
        near.betweenness_norm = 0.2;

        let table = CentralityTable { rows: vec![near, hub] };
        let power = identify_power_structure(&table, &PowerStructureConfig::default());
        assert_eq!(power.power_hubs.len(), 1);
        assert_eq!(power.power_hubs[0].node, 1);
    }
}
