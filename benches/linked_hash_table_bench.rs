use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use linked_hash_table::{Direction, Level, LinkedHashTable, TableBuilder};
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

fn quiet(_: Level, _: &str) {}

fn filled(seed: u64, n: usize) -> (LinkedHashTable<String, u64>, Vec<String>) {
    let mut t = LinkedHashTable::new();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        let _ = t.insert(k.clone(), i as u64).unwrap();
    }
    (t, keys)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("table::insert_fresh_100k", |b| {
        b.iter_batched(
            LinkedHashTable::<String, u64>::new,
            |mut t| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    let _ = t.insert(key(x), i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_sorted_10k(c: &mut Criterion) {
    // Sorted insert scans the order list, so keep n small.
    c.bench_function("table::insert_sorted_10k", |b| {
        b.iter_batched(
            || {
                TableBuilder::new()
                    .comparator(|x: &u64, y: &u64| x.cmp(y))
                    .reporter(quiet)
                    .build::<u64>()
                    .unwrap()
            },
            |mut t| {
                for (i, x) in lcg(2).take(10_000).enumerate() {
                    let _ = t.insert(x, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_remove_random_10k(c: &mut Criterion) {
    c.bench_function("table::remove_random_10k_of_110k", |b| {
        b.iter_batched(
            || {
                let (t, keys) = filled(5, 110_000);
                // Precompute 10k unique indices via LCG
                let n = keys.len();
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                let mut s = 0x9e3779b97f4a7c15u64;
                while sel.len() < 10_000 {
                    s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    sel.insert((s as usize) % n);
                }
                let to_remove: Vec<String> = sel.into_iter().map(|i| keys[i].clone()).collect();
                (t, to_remove)
            },
            |(mut t, to_remove)| {
                for k in &to_remove {
                    black_box(t.remove(k));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_10k(c: &mut Criterion) {
    c.bench_function("table::find_hit_10k_on_100k", |b| {
        let (t, keys) = filled(7, 100_000);
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(t.find(k));
            }
        })
    });
}

fn bench_find_miss_10k(c: &mut Criterion) {
    c.bench_function("table::find_miss_10k_on_100k", |b| {
        let (t, _) = filled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for x in miss.by_ref().take(10_000) {
                black_box(t.find(&key(x)));
            }
        })
    });
}

fn bench_churn_steady_size(c: &mut Criterion) {
    // Insert one, remove the oldest: exercises tombstone reuse and purges.
    c.bench_function("table::churn_100k_at_1k", |b| {
        b.iter_batched(
            || filled(13, 1_000).0,
            |mut t| {
                for (i, x) in lcg(17).take(100_000).enumerate() {
                    let _ = t.insert(key(x), i as u64).unwrap();
                    black_box(t.pop_front());
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_and_cursor(c: &mut Criterion) {
    c.bench_function("table::iter_all_100k", |b| {
        let (t, _) = filled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in t.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });

    c.bench_function("table::cursor_pop_every_other_100k", |b| {
        b.iter_batched(
            || filled(1001, 100_000).0,
            |mut t| {
                let mut cur = t.cursor_mut(Direction::Forward);
                cur.next();
                while cur.pop().is_some() {
                    cur.next();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_sorted_10k
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_remove_random_10k,
              bench_find_hit_10k,
              bench_find_miss_10k,
              bench_churn_steady_size,
              bench_iter_and_cursor
}
criterion_main!(benches_insert, benches_ops);
