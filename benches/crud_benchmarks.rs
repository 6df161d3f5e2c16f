use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sapling::OrderedTree;
use std::collections::BTreeSet;
use std::hint::black_box;

const N: usize = 10_000;
// Sorted input degenerates the tree into a list, so keep that case small.
const N_SORTED: usize = 1_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn build_tree(keys: &[i64]) -> OrderedTree<i64> {
    let mut tree = OrderedTree::new();
    for &k in keys {
        let _ = tree.insert(k, |_| {});
    }
    tree
}

// ─── Benchmarks ─────────────────────────────────────────────────────────────

fn bench_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("insert_random");

    group.bench_function(BenchmarkId::new("OrderedTree", N), |b| b.iter(|| build_tree(&keys)));

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| keys.iter().copied().collect::<BTreeSet<_>>());
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    let keys = ordered_keys(N_SORTED);
    let mut group = c.benchmark_group("insert_ordered");

    group.bench_function(BenchmarkId::new("OrderedTree", N_SORTED), |b| b.iter(|| build_tree(&keys)));

    group.bench_function(BenchmarkId::new("BTreeSet", N_SORTED), |b| {
        b.iter(|| keys.iter().copied().collect::<BTreeSet<_>>());
    });

    group.finish();
}

fn bench_insert_duplicates(c: &mut Criterion) {
    let keys: Vec<i64> = random_keys(N).into_iter().map(|k| k % 256).collect();
    let mut group = c.benchmark_group("insert_duplicates");

    group.bench_function(BenchmarkId::new("OrderedTree", N), |b| {
        b.iter(|| {
            let mut tree = OrderedTree::with_comparator(|a: &(i64, u32), b: &(i64, u32)| a.0.cmp(&b.0));
            for &k in &keys {
                let _ = tree.insert((k, 1), |(_, n)| *n += 1);
            }
            tree
        });
    });

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree = build_tree(&keys);
    let set: BTreeSet<i64> = keys.iter().copied().collect();
    let mut group = c.benchmark_group("get_random");

    group.bench_function(BenchmarkId::new("OrderedTree", N), |b| {
        b.iter(|| {
            for k in &keys {
                black_box(tree.get(k));
            }
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            for k in &keys {
                black_box(set.get(k));
            }
        });
    });

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("OrderedTree", N), |b| {
        b.iter_batched(
            || build_tree(&keys),
            |mut tree| {
                for k in &keys {
                    black_box(tree.remove(k));
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || keys.iter().copied().collect::<BTreeSet<_>>(),
            |mut set| {
                for k in &keys {
                    black_box(set.remove(k));
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree = build_tree(&keys);
    let set: BTreeSet<i64> = keys.iter().copied().collect();
    let mut group = c.benchmark_group("iterate");

    group.bench_function(BenchmarkId::new("OrderedTree/forward", N), |b| {
        b.iter(|| tree.iter().copied().sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("OrderedTree/reverse", N), |b| {
        b.iter(|| tree.iter().rev().copied().sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("BTreeSet/forward", N), |b| {
        b.iter(|| set.iter().copied().sum::<i64>());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_insert_ordered,
    bench_insert_duplicates,
    bench_get,
    bench_remove,
    bench_iterate
);
criterion_main!(benches);
