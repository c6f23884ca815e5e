//! `ArenaHashMap` put/get throughput, including the cost of growth resizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slaballoc_core::{Arena, ArenaHashMap};

fn bench_put_new_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_new_keys");

    for size in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut arena = Arena::new_default();
                let mut map: ArenaHashMap<i64, i64> = ArenaHashMap::new(&mut arena).unwrap();
                for i in 0..size {
                    map.put(&mut arena, i, i * 2).unwrap();
                }
                black_box(&map);
            });
        });
    }

    group.finish();
}

fn bench_get_existing_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_existing_keys");

    for size in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut arena = Arena::new_default();
            let mut map: ArenaHashMap<i64, i64> = ArenaHashMap::new(&mut arena).unwrap();
            for i in 0..size {
                map.put(&mut arena, i, i * 2).unwrap();
            }
            b.iter(|| {
                for i in 0..size {
                    black_box(map.get(&i));
                }
            });
        });
    }

    group.finish();
}

fn bench_put_update_existing(c: &mut Criterion) {
    c.bench_function("put_update_existing", |b| {
        let mut arena = Arena::new_default();
        let mut map: ArenaHashMap<i64, i64> = ArenaHashMap::new(&mut arena).unwrap();
        for i in 0..1_000 {
            map.put(&mut arena, i, i).unwrap();
        }
        let mut v = 0i64;
        b.iter(|| {
            v += 1;
            map.put(&mut arena, black_box(5), v).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_put_new_keys,
    bench_get_existing_keys,
    bench_put_update_existing,
);
criterion_main!(benches);
