//! Criterion benchmarks for Shroud crypto: key derivation, stealth derivation, Poseidon2, burn addresses.

use alloy_primitives::Address;
use ark_bn254::Fr;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use shroud_core::{MetaAddress, SecretScalar};
use shroud_crypto::{
    compute_burn_address, derive_stealth_keys, generate_stealth_address, poseidon2_hash,
    poseidon2_permutation, public_key_pair, secret_to_public_key,
};

fn bench_key_derivation(c: &mut Criterion) {
    let signature = [0xabu8; 65];
    let mut g = c.benchmark_group("key_derivation");
    g.throughput(Throughput::Elements(1));
    g.bench_function("derive_stealth_keys", |b| {
        b.iter(|| black_box(derive_stealth_keys(black_box(&signature))).unwrap());
    });
    let keys = derive_stealth_keys(&signature).unwrap();
    g.bench_function("public_key_pair", |b| {
        b.iter(|| black_box(public_key_pair(&keys)).unwrap());
    });
    g.finish();
}

fn bench_stealth_derivation(c: &mut Criterion) {
    let keys = derive_stealth_keys(&[0xabu8; 65]).unwrap();
    let meta = MetaAddress::new(public_key_pair(&keys).unwrap());
    let ephemeral = SecretScalar::from_array([0x1du8; 32]);

    let mut g = c.benchmark_group("stealth_derivation");
    g.throughput(Throughput::Elements(1));
    g.bench_function("generate_stealth_address", |b| {
        b.iter(|| black_box(generate_stealth_address(&meta, &ephemeral)).unwrap());
    });
    g.finish();
}

fn bench_poseidon2(c: &mut Criterion) {
    let state = [Fr::from(0u64), Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
    let mut g = c.benchmark_group("poseidon2");
    g.throughput(Throughput::Elements(1));
    g.bench_function("permutation", |b| {
        b.iter(|| black_box(poseidon2_permutation(black_box(state))));
    });
    g.bench_function("hash_3", |b| {
        b.iter(|| black_box(poseidon2_hash(black_box(&state[..3]))));
    });
    g.finish();
}

fn bench_burn_address(c: &mut Criterion) {
    // x-coordinate of 5·G is below the BN254 modulus
    let mut five = [0u8; 32];
    five[31] = 5;
    let observer = secret_to_public_key(&SecretScalar::from_array(five)).unwrap();
    let stealth = Address::repeat_byte(0x11);

    let mut g = c.benchmark_group("burn_address");
    g.throughput(Throughput::Elements(1));
    g.bench_function("compute_burn_address", |b| {
        b.iter(|| black_box(compute_burn_address(&observer, &stealth)).unwrap());
    });
    g.finish();
}

criterion_group!(
    benches,
    bench_key_derivation,
    bench_stealth_derivation,
    bench_poseidon2,
    bench_burn_address
);
criterion_main!(benches);
