use std::collections::BTreeSet;
use std::hint::black_box;

use bench::{bench_rng, configure_long_group, configure_quick_group, random_keys};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId, Criterion, criterion_group, criterion_main};
use rbtree::RbTree;

const SIZES: [usize; 3] = [1_024, 16_384, 131_072];

fn apply_runtime_config_for_size<M: Measurement>(size: usize, group: &mut BenchmarkGroup<'_, M>) {
    if size <= 16_384 {
        configure_quick_group(group);
    } else {
        configure_long_group(group);
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbtree/build");
    let mut rng = bench_rng();

    for &size in &SIZES {
        apply_runtime_config_for_size(size, &mut group);
        let keys = random_keys(&mut rng, size);

        group.bench_function(BenchmarkId::new("rbtree", size), |bencher| {
            bencher.iter(|| {
                let tree: RbTree<u64> = keys.iter().copied().collect();
                black_box(tree.len())
            })
        });

        group.bench_function(BenchmarkId::new("btreeset", size), |bencher| {
            bencher.iter(|| {
                let set: BTreeSet<u64> = keys.iter().copied().collect();
                black_box(set.len())
            })
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbtree/lookup");
    let mut rng = bench_rng();

    for &size in &SIZES {
        apply_runtime_config_for_size(size, &mut group);
        let keys = random_keys(&mut rng, size);
        let tree: RbTree<u64> = keys.iter().copied().collect();
        let set: BTreeSet<u64> = keys.iter().copied().collect();
        // Half hits, half perturbed probes that effectively always miss.
        let probes: Vec<u64> = keys
            .iter()
            .map(|&k| k.wrapping_add(1))
            .chain(keys.iter().copied())
            .collect();

        group.bench_function(BenchmarkId::new("rbtree", size), |bencher| {
            bencher.iter(|| {
                let mut hits = 0_usize;
                for probe in &probes {
                    hits += usize::from(tree.contains(probe));
                }
                black_box(hits)
            })
        });

        group.bench_function(BenchmarkId::new("btreeset", size), |bencher| {
            bencher.iter(|| {
                let mut hits = 0_usize;
                for probe in &probes {
                    hits += usize::from(set.contains(probe));
                }
                black_box(hits)
            })
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbtree/churn");
    let mut rng = bench_rng();

    for &size in &SIZES {
        apply_runtime_config_for_size(size, &mut group);
        let keys = random_keys(&mut rng, size);
        let (stable, churned) = keys.split_at(size / 2);

        group.bench_function(BenchmarkId::new("rbtree", size), |bencher| {
            let mut tree: RbTree<u64> = stable.iter().copied().collect();
            bencher.iter(|| {
                for key in churned {
                    tree.insert(*key);
                }
                for key in churned {
                    tree.remove(key);
                }
                black_box(tree.len())
            })
        });

        group.bench_function(BenchmarkId::new("btreeset", size), |bencher| {
            let mut set: BTreeSet<u64> = stable.iter().copied().collect();
            bencher.iter(|| {
                for key in churned {
                    set.insert(*key);
                }
                for key in churned {
                    set.remove(key);
                }
                black_box(set.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_lookup, bench_churn);
criterion_main!(benches);
