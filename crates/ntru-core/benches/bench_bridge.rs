use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ntru_core::bridge;
use ntru_core::params::SECURITY_LEVELS;
use ntru_core::*;
use ntru_testkit::entropy::counter_random_bytes;
use ntru_testkit::SimulatedEngine;

fn simulated() -> (Arc<SimulatedEngine>, RandomSource) {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    (engine, source)
}

fn bench_keygen(c: &mut Criterion) {
    let (_engine, source) = simulated();
    let mut group = c.benchmark_group("keygen");
    for level in SECURITY_LEVELS {
        let params = get_parameter(KeyType::Product, level).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(params), &params, |b, &params| {
            b.iter(|| source.create_keys(params).unwrap())
        });
    }
    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let (engine, source) = simulated();
    let (pk, sk) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees743Ep1.id())
            .unwrap();
    let message = vec![0x42u8; EncryptParamSet::Ees743Ep1.max_message_len()];
    let ciphertext = bridge::encrypt(engine.as_ref(), source.handle(), &pk, &message).unwrap();

    c.bench_function("bridge/encrypt", |b| {
        b.iter(|| bridge::encrypt(engine.as_ref(), source.handle(), &pk, &message).unwrap())
    });
    c.bench_function("bridge/decrypt", |b| {
        b.iter(|| bridge::decrypt(engine.as_ref(), &sk, &ciphertext).unwrap())
    });
}

fn bench_der(c: &mut Criterion) {
    let (engine, source) = simulated();
    let (pk, _) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees1171Ep1.id())
            .unwrap();
    let der = bridge::public_key_to_der(engine.as_ref(), &pk).unwrap();

    c.bench_function("bridge/public_key_to_der", |b| {
        b.iter(|| bridge::public_key_to_der(engine.as_ref(), &pk).unwrap())
    });
    c.bench_function("bridge/der_to_public_key", |b| {
        b.iter(|| bridge::der_to_public_key(engine.as_ref(), &der).unwrap())
    });
}

fn bench_catalog(c: &mut Criterion) {
    c.bench_function("params/from_oid", |b| {
        b.iter(|| {
            for params in EncryptParamSet::ALL {
                EncryptParamSet::from_oid(&params.oid()).unwrap();
            }
        })
    });
}

criterion_group!(bridge_benches, bench_keygen, bench_round_trip, bench_der,);
criterion_group!(catalog, bench_catalog,);
criterion_main!(bridge_benches, catalog);
