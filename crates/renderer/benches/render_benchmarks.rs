//! Benchmarks for route map composition and PNG encoding.
//!
//! Run with: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use projection::TileRect;
use renderer::{canvas, compose, png, RenderConfig};
use route_common::Route;
use tile_source::TileImage;

fn kyiv_route() -> Route {
    Route::from_pairs(&[[50.45, 30.52], [50.43, 30.55], [50.40, 30.60]]).unwrap()
}

/// Opaque solid tiles for every slot of `rect`.
fn solid_tiles(rect: &TileRect) -> Vec<TileImage> {
    rect.iter()
        .map(|coord| {
            let shade = ((coord.x + coord.y) % 256) as u8;
            let image = RgbaImage::from_pixel(256, 256, Rgba([shade, 200, 180, 255]));
            TileImage::new(coord, image).unwrap()
        })
        .collect()
}

fn bench_compose(c: &mut Criterion) {
    let config = RenderConfig::default();
    let route = kyiv_route();
    let rect = TileRect::covering(&route.bounds(), config.zoom);
    let tiles = solid_tiles(&rect);

    let mut group = c.benchmark_group("compose");
    group.throughput(Throughput::Elements(rect.len() as u64));
    group.bench_function("blank_basemap", |b| {
        b.iter(|| compose(black_box(&route), &rect, &[], &config).unwrap())
    });
    group.bench_function("full_basemap", |b| {
        b.iter(|| compose(black_box(&route), &rect, &tiles, &config).unwrap())
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let config = RenderConfig::default();
    let route = kyiv_route();
    let rect = TileRect::covering(&route.bounds(), config.zoom);

    let mut group = c.benchmark_group("encode");
    for (name, tiles) in [("blank", Vec::new()), ("tiled", solid_tiles(&rect))] {
        let map = compose(&route, &rect, &tiles, &config).unwrap();
        let pixels = canvas::to_straight_rgba(&map);
        group.throughput(Throughput::Bytes(pixels.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode_auto", name), &pixels, |b, pixels| {
            b.iter(|| png::encode_auto(black_box(pixels), map.width(), map.height()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compose, bench_encode);
criterion_main!(benches);
