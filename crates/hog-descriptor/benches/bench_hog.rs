use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use hog_descriptor::{ExecutionStrategy, HogConfig, HogPipeline};
use hog_image::Image;

fn random_image(width: usize, height: usize, seed: u64) -> Image<f32, 1> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height)
        .map(|_| rng.random_range(0.0..1.0))
        .collect();
    Image::new([width, height].into(), data).unwrap()
}

fn bench_hog(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hog");

    for (width, height) in [(64, 128), (256, 512), (1024, 1024)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);
        let image = random_image(*width, *height, 42);

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("parallel_rows", ExecutionStrategy::ParallelRows),
        ] {
            let pipeline =
                HogPipeline::new(HogConfig::default().with_strategy(strategy)).unwrap();

            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &image,
                |b, i| b.iter(|| black_box(pipeline.compute(i))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_hog);
criterion_main!(benches);
