use commgraph::analysis::community::probabilistic_sample;
use commgraph_algorithms::{
    betweenness_centrality, louvain, page_rank_scores, BetweennessConfig, GraphView, LouvainConfig,
    PageRankConfig,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Dense clusters of 50 nodes with sparse links between them
fn clustered_graph(clusters: u64, seed: u64) -> GraphView {
    let mut rng = StdRng::seed_from_u64(seed);
    let size = 50u64;
    let n = clusters * size;
    let mut edges = Vec::new();
    for c in 0..clusters {
        let base = c * size;
        for i in 0..size {
            for j in (i + 1)..size {
                if rng.gen_bool(0.15) {
                    edges.push((base + i, base + j));
                }
            }
        }
    }
    for _ in 0..(n / 5) {
        edges.push((rng.gen_range(0..n), rng.gen_range(0..n)));
    }
    GraphView::from_undirected_edges(&edges)
}

/// Benchmark PageRank to convergence
fn bench_pagerank(c: &mut Criterion) {
    let mut group = c.benchmark_group("pagerank");

    for clusters in [10u64, 100].iter() {
        let view = clustered_graph(*clusters, 1);
        group.bench_with_input(BenchmarkId::from_parameter(view.node_count), &view, |b, view| {
            b.iter(|| {
                let outcome = page_rank_scores(view, &PageRankConfig::default());
                criterion::black_box(outcome.iterations);
            });
        });
    }
    group.finish();
}

/// Benchmark sampled betweenness
fn bench_betweenness(c: &mut Criterion) {
    let mut group = c.benchmark_group("betweenness");
    group.sample_size(10);

    let view = clustered_graph(40, 2);
    for samples in [50usize, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(samples), samples, |b, &samples| {
            b.iter(|| {
                let scores = betweenness_centrality(
                    &view,
                    &BetweennessConfig {
                        samples: Some(samples),
                        seed: 7,
                        normalized: true,
                    },
                );
                criterion::black_box(scores.len());
            });
        });
    }
    group.finish();
}

/// Benchmark Louvain on the full graph and on an 80% degree-biased sample
fn bench_louvain(c: &mut Criterion) {
    let mut group = c.benchmark_group("louvain");
    group.sample_size(10);

    let view = clustered_graph(40, 3);
    group.bench_function("full", |b| {
        b.iter(|| {
            let result = louvain(&view, &LouvainConfig::default());
            criterion::black_box(result.modularity);
        });
    });

    let mut rng = StdRng::seed_from_u64(4);
    let keep = probabilistic_sample(&view, 0.8, &mut rng);
    let sample = view.induced_subgraph(&keep);
    group.bench_function("sampled", |b| {
        b.iter(|| {
            let result = louvain(&sample, &LouvainConfig::default());
            criterion::black_box(result.modularity);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_pagerank, bench_betweenness, bench_louvain);
criterion_main!(benches);
