use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use json_kv::{Error, JsonKv};
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("json_kv_bench_{}_{}.json", name, size))
}

fn open(name: &str, size: usize) -> (PathBuf, JsonKv<i32>) {
    let path = bench_path(name, size);
    let _ = std::fs::remove_file(&path);
    let db = JsonKv::<i32>::builder(&path).sync(false).build().unwrap();
    (path, db)
}

fn seeded(name: &str, size: usize) -> (PathBuf, JsonKv<i32>) {
    let (path, db) = open(name, size);
    db.extend((0..size).map(|i| (format!("k{i}"), i as i32))).unwrap();
    (path, db)
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for size in [100, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (path, db) = seeded("get", size);
            b.iter(|| {
                for i in 0..100 {
                    black_box(db.get(&format!("k{i}")));
                }
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

// every set rewrites the whole file, so cost grows with the store size
fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    group.sample_size(30);
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (path, db) = seeded("set", size);
            let mut n = 0;
            b.iter(|| {
                n += 1;
                db.set("hot", n).unwrap();
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_transaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction");
    group.sample_size(30);
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (path, db) = seeded("tx", size);
            b.iter(|| {
                db.transaction(|tx| {
                    for i in 0..50 {
                        let v = tx.get(&format!("k{i}")).unwrap_or(0);
                        tx.set(format!("k{i}"), v + 1);
                    }
                    Ok::<_, Error>(())
                })
                .unwrap();
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_get_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_all");
    for size in [100, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (path, db) = seeded("get_all", size);
            b.iter(|| black_box(db.get_all()));
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (path, _db) = seeded("open", size);
            b.iter(|| black_box(JsonKv::<i32>::open(&path).unwrap().len()));
            let _ = std::fs::remove_file(&path);
        });
    }
}

criterion_group!(
    benches,
    bench_get,
    bench_set,
    bench_transaction,
    bench_get_all,
    bench_open,
);
criterion_main!(benches);
