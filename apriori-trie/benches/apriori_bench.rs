use apriori_trie::io::{InMemorySource, LevelCollector};
use apriori_trie::{apriori_algorithm, Apriori, Item, MiningParams};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Baskets whose items follow a skewed popularity curve, so that a few items
/// are frequent and the rest form a long tail.
fn generate_baskets(num_baskets: usize, num_items: usize, avg_basket_size: usize) -> Vec<Vec<Item>> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..num_baskets)
        .map(|_| {
            let spread: f64 = rng.gen();
            let size = ((avg_basket_size as f64) * (0.5 + spread)).round() as usize;
            (0..size.min(num_items))
                .map(|_| {
                    let skew: f64 = rng.gen();
                    ((skew * skew) * num_items as f64) as Item
                })
                .collect()
        })
        .collect()
}

fn to_matrix(baskets: &[Vec<Item>], num_items: usize) -> Array2<i32> {
    let mut matrix = Array2::zeros((baskets.len(), num_items));
    for (row, basket) in baskets.iter().enumerate() {
        for &item in basket {
            matrix[[row, item.min(num_items - 1)]] = 1;
        }
    }
    matrix
}

fn mine_in_memory(baskets: &[Vec<Item>], params: MiningParams) -> usize {
    let mut source = InMemorySource::new(baskets.to_vec());
    let mut collector = LevelCollector::new();
    let summary = Apriori::new(params)
        .and_then(|mut apriori| apriori.run(&mut source, &mut collector))
        .unwrap();
    summary.itemsets + summary.rules
}

fn bench_apriori_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("apriori_scaling");

    let configs = vec![
        ("small_200", 200, 20, 5),
        ("medium_1000", 1000, 50, 8),
        ("large_5000", 5000, 100, 12),
    ];

    for (name, num_baskets, num_items, avg_size) in configs {
        let transactions = to_matrix(&generate_baskets(num_baskets, num_items, avg_size), num_items);
        group.bench_with_input(BenchmarkId::from_parameter(name), &transactions, |b, tx| {
            b.iter(|| apriori_algorithm(black_box(tx.view()), black_box(0.05), None));
        });
    }

    group.finish();
}

fn bench_apriori_min_support(c: &mut Criterion) {
    let mut group = c.benchmark_group("apriori_min_support");
    let baskets = generate_baskets(2000, 60, 10);

    for &min_supp in &[0.02, 0.05, 0.1, 0.2] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.2}", min_supp)),
            &min_supp,
            |b, &min_supp| {
                b.iter(|| mine_in_memory(black_box(&baskets), MiningParams::new(min_supp)));
            },
        );
    }

    group.finish();
}

/// Reduced-basket cache against re-reading the source on every pass.
fn bench_store_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("apriori_store_input");
    let baskets = generate_baskets(3000, 40, 8);

    for store_input in [true, false] {
        group.bench_with_input(
            BenchmarkId::from_parameter(store_input),
            &store_input,
            |b, &store_input| {
                b.iter(|| {
                    mine_in_memory(
                        black_box(&baskets),
                        MiningParams::new(0.05).with_store_input(store_input),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_rules(c: &mut Criterion) {
    let baskets = generate_baskets(1000, 30, 8);
    c.bench_function("apriori_rules", |b| {
        b.iter(|| {
            mine_in_memory(
                black_box(&baskets),
                MiningParams::new(0.05).with_min_confidence(0.3),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_apriori_scaling,
    bench_apriori_min_support,
    bench_store_input,
    bench_rules
);
criterion_main!(benches);
