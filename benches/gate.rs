use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::{Duration, Instant};
use working_hours_throttle::{
    allow, HistoryRegistry, Hour, HourWindowGate, Rate, RequestContext, RequestGate,
    RequestHistory, ScopedRateThrottle, ShardedStorage, ThrottleChain, ThrottleKey,
};

/// Benchmark the bare hour predicate
fn bench_hour_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("hour_gate");
    group.throughput(Throughput::Elements(24));

    group.bench_function("free_function", |b| {
        b.iter(|| {
            for h in Hour::all() {
                black_box(allow(black_box(h)));
            }
        })
    });

    let gate = HourWindowGate::new();
    group.bench_function("gate_instance", |b| {
        b.iter(|| {
            for h in Hour::all() {
                black_box(gate.decide(black_box(h)));
            }
        })
    });

    group.finish();
}

/// Benchmark chain evaluation with a varying number of distinct clients
fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain");

    for num_clients in [1usize, 10, 1000].iter() {
        group.throughput(Throughput::Elements(1000));

        group.bench_with_input(
            BenchmarkId::new("clients", num_clients),
            num_clients,
            |b, &num_clients| {
                let storage: Arc<ShardedStorage<ThrottleKey, RequestHistory>> =
                    Arc::new(ShardedStorage::new());
                let registry = HistoryRegistry::new(storage);
                let chain = ThrottleChain::new()
                    .with(HourWindowGate::new())
                    .with(ScopedRateThrottle::new(
                        "low_request",
                        Rate::new(100, Duration::from_secs(60)),
                        registry,
                    ));
                let clients: Vec<String> =
                    (0..num_clients).map(|i| format!("client-{}", i)).collect();
                let noon = Hour::new(12).unwrap();
                let now = Instant::now();

                b.iter(|| {
                    for i in 0..1000 {
                        let ctx = RequestContext::new(noon, now, &clients[i % num_clients])
                            .with_scope("low_request");
                        black_box(chain.check(black_box(&ctx)));
                    }
                })
            },
        );
    }

    group.finish();
}

/// Benchmark the full gate, including clock sampling, across threads
fn bench_gate_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_concurrent");

    for num_threads in [2, 4, 8].iter() {
        group.throughput(Throughput::Elements((*num_threads as u64) * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let gate = RequestGate::builder()
                        .with_scope_rate("low_request", Rate::new(100, Duration::from_secs(60)))
                        .build()
                        .unwrap();

                    let handles: Vec<_> = (0..num_threads)
                        .map(|i| {
                            let gate = gate.clone();
                            std::thread::spawn(move || {
                                // Separate clients avoid shard contention
                                let client = format!("client-{}", i);
                                for _ in 0..1000 {
                                    black_box(gate.check(Some("low_request"), &client));
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hour_gate, bench_chain, bench_gate_concurrent);
criterion_main!(benches);
