use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use taxon_core::graph::{CategoryGraph, DepthStrategy, Edge, assign_depths, project};
use taxon_core::{BuildOptions, Hierarchy};

struct Tier {
    name: &'static str,
    levels: usize,
    fanout: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        levels: 4,
        fanout: 6,
    },
    Tier {
        name: "medium",
        levels: 5,
        fanout: 8,
    },
    Tier {
        name: "large",
        levels: 6,
        fanout: 8,
    },
];

/// Layered tree under `Root` with extra cross links: every node also joins
/// a pseudo-random category on its own level (sideways), the level above
/// (second parent), and, every seventh node, one below (a cycle).
fn layered_edges(tier: &Tier, seed: u64) -> Vec<Edge> {
    let mut state = seed;
    let mut next = |bound: usize| {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        usize::try_from(state >> 33).unwrap_or(0) % bound.max(1)
    };

    let mut levels: Vec<Vec<String>> = vec![vec!["Root".to_string()]];
    let mut edges = Vec::new();
    for depth in 1..=tier.levels {
        let parents = &levels[depth - 1];
        let mut level = Vec::with_capacity(parents.len() * tier.fanout);
        for (p, parent) in parents.iter().enumerate() {
            for k in 0..tier.fanout {
                let name = format!("L{depth}_{p}_{k}");
                edges.push(Edge::new(name.clone(), parent.clone()));
                level.push(name);
            }
        }
        for (i, name) in level.iter().enumerate() {
            edges.push(Edge::new(name.clone(), level[next(level.len())].clone()));
            edges.push(Edge::new(name.clone(), parents[next(parents.len())].clone()));
            if i % 7 == 0 && depth > 1 {
                edges.push(Edge::new(parents[next(parents.len())].clone(), name.clone()));
            }
        }
        levels.push(level);
    }
    edges
}

fn bench_depth_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth.assign");

    for tier in &TIERS {
        let edges = layered_edges(tier, 0x7A_C0DE_u64);
        let graph = CategoryGraph::from_edges(&edges);
        let Some(root) = graph.id("Root") else {
            continue;
        };
        group.throughput(Throughput::Elements(graph.row_count() as u64));
        for strategy in [DepthStrategy::Frontier, DepthStrategy::Relaxation] {
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), tier.name),
                &graph,
                |b, graph| {
                    b.iter(|| {
                        let depths = assign_depths(graph, root, strategy, 0);
                        black_box(depths.resolved_count())
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth.project");

    for tier in &TIERS {
        let edges = layered_edges(tier, 0x7A_C0DE_u64);
        let graph = CategoryGraph::from_edges(&edges);
        let Some(root) = graph.id("Root") else {
            continue;
        };
        let depths = assign_depths(&graph, root, DepthStrategy::Frontier, 0);
        group.throughput(Throughput::Elements(graph.row_count() as u64));
        group.bench_function(BenchmarkId::from_parameter(tier.name), |b| {
            b.iter(|| black_box(project(graph.rows(), &depths).0.len()));
        });
    }

    group.finish();
}

fn bench_commonality(c: &mut Criterion) {
    let tier = &TIERS[1];
    let edges = layered_edges(tier, 0x7A_C0DE_u64);
    let options = BuildOptions {
        progress_interval: 0,
        ..BuildOptions::with_root("Root")
    };
    let Ok((hierarchy, _)) = Hierarchy::build(edges, &options) else {
        return;
    };
    let a = ["L5_0_0", "L5_17_3", "L4_40_2", "L3_9_1"];
    let b = ["L5_300_7", "L4_2_2", "L5_1_1"];

    c.bench_function("query.commonality", |bench| {
        bench.iter(|| black_box(hierarchy.categorical_commonality(&a, &b)));
    });
}

criterion_group!(benches, bench_depth_strategies, bench_projection, bench_commonality);
criterion_main!(benches);
