use criterion::{criterion_group, criterion_main, Criterion};
use portsim_core::simulation::Simulation;
use portsim_core::test_utils::{sample_config, sample_config_with_warehouse, sample_inputs};

fn bench_without_warehouse(c: &mut Criterion) {
    c.bench_function("one_year_no_warehouse", |b| {
        b.iter(|| {
            let sim = Simulation::new(sample_config(1), sample_inputs()).unwrap();
            sim.run().unwrap()
        });
    });
}

fn bench_with_warehouse(c: &mut Criterion) {
    c.bench_function("one_year_with_warehouse", |b| {
        b.iter(|| {
            let cfg = sample_config_with_warehouse(1, 3);
            let sim = Simulation::new(cfg, sample_inputs()).unwrap();
            sim.run().unwrap()
        });
    });
}

criterion_group!(benches, bench_without_warehouse, bench_with_warehouse);
criterion_main!(benches);
