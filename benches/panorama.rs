use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use terrain_panorama::geo::GeoPoint;
use terrain_panorama::labels::Labelizer;
use terrain_panorama::panorama::{PanoramaComputer, PanoramaParameters};
use terrain_panorama::summit::Summit;
use terrain_panorama::terrain::TerrainProvider;

/// Rolling hills, so rays stop at varied distances.
struct SyntheticTerrain;

impl TerrainProvider for SyntheticTerrain {
    fn elevation_at(&self, p: GeoPoint) -> f64 {
        let (x, y) = (p.longitude() * 2000.0, p.latitude() * 2000.0);
        800.0 + 600.0 * x.sin() * y.cos()
    }

    fn slope_at(&self, _p: GeoPoint) -> f64 {
        0.0
    }
}

fn parameters() -> PanoramaParameters {
    let observer = GeoPoint::from_degrees(7.65, 46.73).expect("valid observer");
    PanoramaParameters::new(observer, 1500.0, 0.0, 90f64.to_radians(), 60_000.0, 400, 120).expect("valid parameters")
}

fn panorama_benchmark(c: &mut Criterion) {
    let params = parameters();
    let computer = PanoramaComputer::new(&SyntheticTerrain);

    c.bench_function("compute_panorama_400x120", |b| {
        b.iter(|| computer.compute_panorama(black_box(&params)))
    });
}

fn labels_benchmark(c: &mut Criterion) {
    let params = parameters();
    let summits = (0..200)
        .map(|i| {
            let lon = 7.3 + 0.7 * f64::from(i % 20) / 20.0;
            let lat = 46.8 + 0.3 * f64::from(i / 20) / 10.0;
            let position = GeoPoint::from_degrees(lon, lat).expect("valid summit");
            Summit::new(format!("S{i}"), position, 2000 + i).expect("valid summit")
        })
        .collect();
    let labelizer = Labelizer::new(&SyntheticTerrain, summits);

    c.bench_function("labels_200_summits", |b| b.iter(|| labelizer.labels(black_box(&params))));
}

criterion_group!(benches, panorama_benchmark, labels_benchmark);
criterion_main!(benches);
