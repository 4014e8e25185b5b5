use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use strata_core::data::{
    Data, Format, Layout, ProxyVec3Array, UbyteArray, compute_mipmap_offsets,
};

// ---------------------------------------------------------------------------
// Mipmap layout
// ---------------------------------------------------------------------------

fn bench_mipmap_offsets_uncompressed(c: &mut Criterion) {
    let layout = Layout::for_format(Format::R8G8B8A8Unorm).with_mipmaps(12);
    c.bench_function("mipmap_offsets_2048x2048", |b| {
        b.iter(|| compute_mipmap_offsets(black_box(2048), black_box(2048), 1, &layout, 4));
    });
}

fn bench_mipmap_offsets_compressed(c: &mut Criterion) {
    let layout = Layout::for_format(Format::Bc7UnormBlock).with_mipmaps(12);
    c.bench_function("mipmap_offsets_bc7_512x512_blocks", |b| {
        b.iter(|| compute_mipmap_offsets(black_box(512), black_box(512), 1, &layout, 16));
    });
}

// ---------------------------------------------------------------------------
// Proxy access
// ---------------------------------------------------------------------------

fn interleaved(vertices: usize, stride: usize) -> Arc<dyn Data> {
    Arc::new(UbyteArray::from_vec(vec![0u8; vertices * stride]))
}

fn bench_proxy_assign(c: &mut Criterion) {
    let source = interleaved(65_536, 32);
    let layout = source.layout();
    c.bench_function("proxy_assign", |b| {
        let mut proxy = ProxyVec3Array::new();
        b.iter(|| {
            proxy
                .assign(source.clone(), black_box(0), black_box(32), 65_536, layout)
                .unwrap();
        });
    });
}

fn bench_proxy_iterate(c: &mut Criterion) {
    let source = interleaved(65_536, 32);
    let proxy = ProxyVec3Array::from_source(source.clone(), 4, 32, 65_535, source.layout()).unwrap();
    c.bench_function("proxy_iterate_64k", |b| {
        b.iter(|| black_box(&proxy).iter().fold(0.0f32, |acc, v| acc + v.x));
    });
}

criterion_group!(
    benches,
    bench_mipmap_offsets_uncompressed,
    bench_mipmap_offsets_compressed,
    bench_proxy_assign,
    bench_proxy_iterate,
);
criterion_main!(benches);
