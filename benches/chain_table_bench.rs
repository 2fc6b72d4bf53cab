use chain_table::ChainTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_fresh_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(1).take(10_000).map(key).collect();
    let values: Vec<u64> = (0..10_000).collect();
    c.bench_function("chain_table::insert_fresh_10k", |b| {
        b.iter_batched(
            || ChainTable::<u64>::new(8).unwrap(),
            |mut t| {
                for (k, v) in keys.iter().zip(&values) {
                    t.put(k, v).unwrap();
                }
                black_box(t.len())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(20_000).map(key).collect();
    let values: Vec<u64> = (0..20_000).collect();
    let mut t = ChainTable::new(8).unwrap();
    for (k, v) in keys.iter().zip(&values) {
        t.put(k, v).unwrap();
    }
    let mut it = keys.iter().cycle();
    c.bench_function("chain_table::get_hit", |b| {
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(t.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let values: Vec<u64> = (0..10_000).collect();
    let keys: Vec<String> = lcg(11).take(10_000).map(key).collect();
    let mut t = ChainTable::new(8).unwrap();
    for (k, v) in keys.iter().zip(&values) {
        t.put(k, v).unwrap();
    }
    let mut miss = lcg(0xdead_beef);
    c.bench_function("chain_table::get_miss", |b| {
        b.iter(|| {
            // generate keys unlikely in table
            let k = key(miss.next().unwrap());
            black_box(t.get(&k));
        })
    });
}

// Alternating insert/remove of one key at a steady size: exercises splice-out
// and the policy check without crossing a threshold.
fn bench_put_remove_steady(c: &mut Criterion) {
    let keys: Vec<String> = lcg(5).take(1_000).map(key).collect();
    let values: Vec<u64> = (0..1_000).collect();
    let extra = 42u64;
    let mut t = ChainTable::new(8).unwrap();
    for (k, v) in keys.iter().zip(&values) {
        t.put(k, v).unwrap();
    }
    c.bench_function("chain_table::put_remove_steady_1k", |b| {
        b.iter(|| {
            t.put("extra", &extra).unwrap();
            black_box(t.remove("extra"));
        })
    });
}

// Fill then drain: every grow and shrink step is a full rebuild.
fn bench_grow_then_drain_10k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(3).take(10_000).map(key).collect();
    let values: Vec<u64> = (0..10_000).collect();
    c.bench_function("chain_table::grow_then_drain_10k", |b| {
        b.iter_batched(
            || ChainTable::<u64>::new(8).unwrap(),
            |mut t| {
                for (k, v) in keys.iter().zip(&values) {
                    t.put(k, v).unwrap();
                }
                for k in &keys {
                    t.remove(k);
                }
                black_box(t.capacity())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(2))
        .sample_size(30)
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_fresh_10k, bench_get_hit, bench_get_miss,
        bench_put_remove_steady, bench_grow_then_drain_10k
}
criterion_main!(benches);
