use criterion::{black_box, criterion_group, criterion_main, Criterion};

use armor_hashing::{ImageHasher, SubmittedImage};

fn portrait(size: u32) -> SubmittedImage {
    let mut bytes = format!("P6\n{size} {size}\n255\n").into_bytes();
    for y in 0..size {
        for x in 0..size {
            let inside = x > size / 4 && x < size * 3 / 4 && y > size / 5 && y < size * 4 / 5;
            let v = if inside { (40 + (x * 7 + y * 3) % 90) as u8 } else { 210 };
            bytes.extend_from_slice(&[v, v.saturating_sub(10), v.saturating_sub(20)]);
        }
    }
    SubmittedImage::from_netpbm(bytes).unwrap()
}

fn decode_bench(c: &mut Criterion) {
    let bytes = portrait(512).bytes().to_vec();

    c.bench_function("decode_p6_512", |b| {
        b.iter(|| SubmittedImage::from_netpbm(black_box(bytes.clone())))
    });
}

fn face_hash_bench(c: &mut Criterion) {
    let hasher = ImageHasher::default();
    let img = portrait(512);

    c.bench_function("hash_face_512", |b| {
        b.iter(|| hasher.hash_face(black_box(&img)))
    });
}

fn hash_all_bench(c: &mut Criterion) {
    let hasher = ImageHasher::default();
    let img = portrait(512);

    c.bench_function("hash_all_512", |b| b.iter(|| hasher.hash_all(black_box(&img))));
}

criterion_group!(benches, decode_bench, face_hash_bench, hash_all_bench);
criterion_main!(benches);
