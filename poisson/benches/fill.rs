use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use poisson::{
    fill_all_channels, fill_masked_region, ChannelGuidance, ChannelImage, FillConfig, Guidance,
    KernelKind, Mask, Raster, Region, SolverKind,
};

fn textured(width: usize, height: usize) -> Raster<f64> {
    Raster::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f64, y as f64);
        128.0 + 60.0 * (fx * 0.11).sin() * (fy * 0.07).cos()
    })
}

fn centered_hole(size: usize, hole: usize) -> Mask {
    let start = (size - hole) / 2;
    let mut mask = Mask::new_valid(size, size);
    mask.set_hole_region(&Region::new(start, start + hole - 1, start, start + hole - 1))
        .expect("hole fits inside the image");
    mask
}

fn bench_single_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_single_channel");
    group.sample_size(20);

    for hole in [32, 64, 128] {
        let size = hole + 32;
        let target = textured(size, size);
        let mask = centered_hole(size, hole);
        let guidance = Guidance::from_source(&target, KernelKind::Cross);

        for (name, config) in [
            ("poisson_lu", FillConfig::poisson()),
            (
                "poisson_cholesky",
                FillConfig::poisson().with_solver(SolverKind::Cholesky),
            ),
        ] {
            group.bench_with_input(BenchmarkId::new(name, hole), &hole, |b, _| {
                b.iter(|| {
                    let fill = fill_masked_region(&target, &mask, &guidance, &config)
                        .expect("benchmark fill succeeds");
                    black_box(fill);
                })
            });
        }

        let gradient = Guidance::gradient_from_source(&target);
        let config = FillConfig::variational();
        group.bench_with_input(BenchmarkId::new("variational", hole), &hole, |b, _| {
            b.iter(|| {
                let fill = fill_masked_region(&target, &mask, &gradient, &config)
                    .expect("benchmark fill succeeds");
                black_box(fill);
            })
        });
    }

    group.finish();
}

fn bench_rgb(c: &mut Criterion) {
    let size = 160;
    let plane = textured(size, size);
    let image = ChannelImage::from_channels(vec![
        plane.clone(),
        plane.map(|v| v * 0.8),
        plane.map(|v| 255.0 - v),
    ])
    .expect("planes share dimensions");
    let mask = centered_hole(size, 96);
    let config = FillConfig::default();

    c.bench_function("fill_rgb_harmonic_96", |b| {
        b.iter(|| {
            let fill = fill_all_channels(&image, &mask, ChannelGuidance::None, &config)
                .expect("benchmark fill succeeds");
            black_box(fill);
        })
    });
}

criterion_group!(benches, bench_single_channel, bench_rgb);
criterion_main!(benches);
