use std::sync::Arc;

use ntru_core::*;
use ntru_testkit::entropy::{counter_random_bytes, failing_random_bytes};
use ntru_testkit::{Fault, Operation, Phase, SimulatedEngine};

#[test]
fn create_then_destroy_releases_once() {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    let handle = source.handle();
    assert!(engine.is_live(handle));

    source.destroy().unwrap();
    assert!(!engine.is_live(handle));
    assert_eq!(engine.releases(handle), 1);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn drop_releases_once() {
    let engine = Arc::new(SimulatedEngine::new());
    let handle = {
        let source = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
        source.handle()
    };
    assert!(!engine.is_live(handle));
    assert_eq!(engine.releases(handle), 1);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn failed_destroy_is_not_retried_on_drop() {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    let handle = source.handle();
    engine.inject(Fault {
        operation: Operation::Uninstantiate,
        phase: Phase::Sizing,
        status: DrbgError::OutOfMemory.status(),
    });

    assert_eq!(source.destroy(), Err(NtruError::Drbg(DrbgError::OutOfMemory)));
    assert_eq!(engine.releases(handle), 0);
    assert_eq!(engine.invalid_releases(), 0);
}

#[test]
fn second_release_of_a_handle_is_detected() {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    let handle = source.handle();
    source.destroy().unwrap();

    // Simulates a binding that forgets it already released the handle.
    assert_eq!(
        engine.drbg_uninstantiate(handle),
        DrbgError::NullPointer.status()
    );
    assert_eq!(engine.invalid_releases(), 1);
    assert_eq!(engine.releases(handle), 1);
}

#[test]
fn entropy_failure_is_reported() {
    let engine = Arc::new(SimulatedEngine::new());
    let err = RandomSource::with_engine(engine.clone(), failing_random_bytes).unwrap_err();
    assert_eq!(err, NtruError::Drbg(DrbgError::EntropyFunctionFailure));
    assert_eq!(engine.live_handles(), 0);
}

#[test]
fn slot_exhaustion_is_reported() {
    let engine = Arc::new(SimulatedEngine::new().with_max_instances(2));
    let first = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    let _second = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    assert_eq!(
        RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap_err(),
        NtruError::Drbg(DrbgError::NoInstantiationSlotAvailable)
    );

    first.destroy().unwrap();
    RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
}

#[test]
fn handles_are_distinct() {
    let engine = Arc::new(SimulatedEngine::new());
    let a = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    let b = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    assert_ne!(a.handle(), b.handle());
}

#[test]
fn os_entropy_callback_seeds_a_source() {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine, ntru_core::drbg::os_random_bytes).unwrap();
    let pair = source.create_keys(EncryptParamSet::Ees401Ep1).unwrap();
    assert_eq!(pair.public_key().params(), EncryptParamSet::Ees401Ep1);
}

#[test]
fn create_keys_tags_both_keys_with_the_requested_set() {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine, counter_random_bytes).unwrap();
    for params in EncryptParamSet::ALL {
        let (public_key, private_key) = source.create_keys(params).unwrap().into_parts();
        assert_eq!(public_key.params(), params);
        assert_eq!(private_key.params(), params);
    }
}

#[test]
fn create_keys_for_validates_level() {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine, counter_random_bytes).unwrap();
    assert_eq!(
        source.create_keys_for(KeyType::Balanced, 123).unwrap_err(),
        NtruError::InvalidSecurityLevel(123)
    );
    let pair = source.create_keys_for(KeyType::Balanced, 192).unwrap();
    assert_eq!(pair.private_key().params(), EncryptParamSet::Ees887Ep1);
}

#[test]
fn source_can_move_to_another_thread() {
    let engine = Arc::new(SimulatedEngine::new());
    let source = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    let handle = source.handle();
    std::thread::spawn(move || {
        source.create_keys(EncryptParamSet::Ees401Ep1).unwrap();
    })
    .join()
    .unwrap();
    assert_eq!(engine.releases(handle), 1);
}
