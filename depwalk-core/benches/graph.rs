//! Benchmarks for reachability and transitive reduction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use depwalk_core::DependencyGraph;

/// Layered DAG: every vertex depends on every vertex of the next layer.
fn layered(layers: usize, width: usize) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    let name = |l: usize, i: usize| format!("v{}_{}", l, i);

    for l in 0..layers {
        for i in 0..width {
            graph.add_vertex(&name(l, i));
        }
    }
    for l in 0..layers.saturating_sub(1) {
        for i in 0..width {
            for j in 0..width {
                graph.add_edge(&name(l, i), &name(l + 1, j));
            }
        }
    }
    // Shortcut edges that the reduction removes.
    for l in 0..layers.saturating_sub(2) {
        graph.add_edge(&name(l, 0), &name(l + 2, 0));
    }
    graph
}

fn bench_has_path(c: &mut Criterion) {
    let graph = layered(20, 10);
    c.bench_function("has_path_layered_20x10", |b| {
        b.iter(|| black_box(graph.has_path(black_box("v0_0"), black_box("v19_9"))))
    });
    c.bench_function("has_path_layered_miss", |b| {
        b.iter(|| black_box(graph.has_path(black_box("v19_9"), black_box("v0_0"))))
    });
}

fn bench_transitive_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitive_reduction");
    for (layers, width) in [(10, 5), (20, 10), (40, 10)] {
        let graph = layered(layers, width);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", layers, width)),
            &graph,
            |b, graph| b.iter(|| black_box(graph.transitive_reduction())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_has_path, bench_transitive_reduction);
criterion_main!(benches);
