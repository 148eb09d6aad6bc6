use criterion::{black_box, criterion_group, criterion_main, Criterion};

use armor_types::{ContentHash, FaceHash, ProofData, Timestamp, WatermarkHash};

fn sample_proof_data(kp: &armor_types::KeyPair) -> ProofData {
    ProofData {
        face_hash: FaceHash::new([0x11; 32]),
        content_hash: ContentHash::new([0x22; 32]),
        watermark_hash: WatermarkHash::new([0x33; 32]),
        wallet: armor_crypto::derive_address(&kp.public),
        timestamp: Timestamp::new(1_700_000_000),
    }
}

fn sign_proof_bench(c: &mut Criterion) {
    let kp = armor_crypto::keypair_from_seed(&[7; 32]);
    let data = sample_proof_data(&kp);

    c.bench_function("sign_proof", |b| {
        b.iter(|| armor_crypto::sign_proof(black_box(data.clone()), &kp))
    });
}

fn verify_proof_bench(c: &mut Criterion) {
    let kp = armor_crypto::keypair_from_seed(&[7; 32]);
    let proof = armor_crypto::sign_proof(sample_proof_data(&kp), &kp);

    c.bench_function("verify_proof_signature", |b| {
        b.iter(|| armor_crypto::verify_proof_signature(black_box(&proof)))
    });
}

fn content_hash_1mb_bench(c: &mut Criterion) {
    let data = vec![0xCDu8; 1 << 20];

    c.bench_function("domain_hash_1MB", |b| {
        b.iter(|| armor_crypto::domain_hash("content", &[black_box(&data)]))
    });
}

fn derive_address_bench(c: &mut Criterion) {
    let kp = armor_crypto::keypair_from_seed(&[7; 32]);

    c.bench_function("derive_address", |b| {
        b.iter(|| armor_crypto::derive_address(black_box(&kp.public)))
    });
}

criterion_group!(
    benches,
    sign_proof_bench,
    verify_proof_bench,
    content_hash_1mb_bench,
    derive_address_bench
);
criterion_main!(benches);
