//! Criterion benchmarks for the pricing engines.
//!
//! Benchmarks cover:
//! - Binomial lattice depth scaling, European vs American
//! - Sequential vs parallel lattice sweeps
//! - Monte Carlo loop throughput, sequential vs parallel loops
//! - RNG stream generation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::types::{ExerciseStyle, OptionType};
use pricer_models::instruments::ContractParameters;
use pricer_pricing::lattice::BinomialTree;
use pricer_pricing::mc::{
    MonteCarloEngine, NormalInnovations, SimulationConfig, VanillaPayoff, WienerPath,
};
use pricer_pricing::rng::PricerRng;
use pricer_pricing::ExecutionMode;

fn contract() -> ContractParameters<f64> {
    ContractParameters::new(50.0, 50.0, 5.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap()
}

fn bench_lattice_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_depth");

    for n in [100, 500, 2_000] {
        for style in [ExerciseStyle::European, ExerciseStyle::American] {
            let tree = BinomialTree::new(contract(), n, style).unwrap();
            group.bench_with_input(BenchmarkId::new(style.to_string(), n), &tree, |b, tree| {
                b.iter(|| black_box(tree.value(OptionType::Put)))
            });
        }
    }

    group.finish();
}

fn bench_lattice_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_parallel");
    group.sample_size(20);

    for n in [5_000, 20_000] {
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            let tree = BinomialTree::new(contract(), n, ExerciseStyle::American)
                .unwrap()
                .with_execution(mode);
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), n),
                &tree,
                |b, tree| b.iter(|| black_box(tree.put())),
            );
        }
    }

    group.finish();
}

fn bench_monte_carlo_loops(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo_loops");
    group.sample_size(10);

    for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
        let config = SimulationConfig::builder()
            .mc_loops(16)
            .mc_paths(5_000)
            .path_length(30)
            .antithetic(true)
            .execution(mode)
            .build()
            .unwrap();
        let engine = MonteCarloEngine::builder()
            .config(config)
            .params(contract())
            .innovations(NormalInnovations::new(42))
            .path_generator(WienerPath)
            .payoff(VanillaPayoff)
            .build()
            .unwrap();

        group.bench_function(BenchmarkId::new("call", format!("{:?}", mode)), |b| {
            b.iter(|| black_box(engine.call().unwrap()))
        });
    }

    group.finish();
}

fn bench_rng_streams(c: &mut Criterion) {
    let mut group = c.benchmark_group("rng_streams");

    for n_samples in [10_000, 150_000] {
        group.bench_with_input(
            BenchmarkId::new("fill_normal", n_samples),
            &n_samples,
            |b, &n| {
                let mut buffer = vec![0.0; n];
                let mut stream = 0;
                b.iter(|| {
                    let mut rng = PricerRng::for_stream(42, stream);
                    stream += 1;
                    rng.fill_normal(&mut buffer);
                    black_box(buffer.iter().sum::<f64>())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lattice_depth,
    bench_lattice_parallel,
    bench_monte_carlo_loops,
    bench_rng_streams
);
criterion_main!(benches);
