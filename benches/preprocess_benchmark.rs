use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opengl_sandbox::gpu::split_sources;

const LIGHTING_SHADER: &str = include_str!("../assets/shaders/lighting.glsl");

fn benchmark_split(c: &mut Criterion) {
    c.bench_function("split_lighting_shader", |b| {
        b.iter(|| split_sources(black_box(LIGHTING_SHADER)).unwrap())
    });

    // Deux étages volumineux avec de nombreuses lignes vides
    let body = "vec3 v = vec3(1.0);\n\n".repeat(4096);
    let large = format!("#type vertex\n{body}#type fragment\n{body}");

    c.bench_function("split_large_shader", |b| {
        b.iter(|| split_sources(black_box(&large)).unwrap())
    });
}

criterion_group!(benches, benchmark_split);
criterion_main!(benches);
