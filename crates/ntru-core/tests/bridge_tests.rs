use std::sync::Arc;

use ntru_core::bridge;
use ntru_core::*;
use ntru_testkit::entropy::counter_random_bytes;
use ntru_testkit::{layout, Fault, Operation, Phase, SimulatedEngine};

fn setup(engine: SimulatedEngine) -> (Arc<SimulatedEngine>, RandomSource) {
    let engine = Arc::new(engine);
    let source = RandomSource::with_engine(engine.clone(), counter_random_bytes).unwrap();
    (engine, source)
}

#[test]
fn keygen_returns_blobs_of_advertised_length() {
    let (engine, source) = setup(SimulatedEngine::new());
    let params = EncryptParamSet::Ees439Ep1;
    let (pk, sk) = bridge::generate_key_pair(engine.as_ref(), source.handle(), params.id()).unwrap();

    assert_eq!(pk.len(), layout::public_key_length(params));
    assert_eq!(sk.len(), layout::private_key_length(params));
    assert_eq!(pk[0], layout::PUBLIC_KEY_TAG);
    assert_eq!(sk[0], layout::PRIVATE_KEY_TAG);
}

#[test]
fn keygen_with_unknown_set_fails_at_sizing() {
    let (engine, source) = setup(SimulatedEngine::new());
    assert_eq!(
        bridge::generate_key_pair(engine.as_ref(), source.handle(), 42),
        Err(NtruError::Engine(EngineError::InvalidParameterSet))
    );
}

#[test]
fn keygen_surfaces_drbg_failures() {
    let (engine, _source) = setup(SimulatedEngine::new());
    assert_eq!(
        bridge::generate_key_pair(engine.as_ref(), 9999, EncryptParamSet::Ees401Ep1.id()),
        Err(NtruError::Drbg(DrbgError::NullPointer))
    );
}

#[test]
fn buffer_too_small_during_sizing_is_expected() {
    let (engine, source) = setup(SimulatedEngine::new().with_sizing_buffer_too_small());
    let (pk, sk) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees401Ep2.id())
            .unwrap();

    let ct = bridge::encrypt(engine.as_ref(), source.handle(), &pk, b"sizing").unwrap();
    assert_eq!(bridge::decrypt(engine.as_ref(), &sk, &ct).unwrap(), b"sizing");

    let der = bridge::public_key_to_der(engine.as_ref(), &pk).unwrap();
    assert_eq!(bridge::der_to_public_key(engine.as_ref(), &der).unwrap(), pk);
}

#[test]
fn buffer_too_small_while_materializing_is_fatal() {
    let (engine, source) = setup(SimulatedEngine::new());
    let (pk, _) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees401Ep2.id())
            .unwrap();
    engine.inject(Fault {
        operation: Operation::Encrypt,
        phase: Phase::Materializing,
        status: EngineError::BufferTooSmall.status(),
    });
    assert_eq!(
        bridge::encrypt(engine.as_ref(), source.handle(), &pk, b"x"),
        Err(NtruError::Engine(EngineError::BufferTooSmall))
    );
}

#[test]
fn sizing_failure_aborts_before_materializing() {
    let (engine, source) = setup(SimulatedEngine::new());
    let (_, sk) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees401Ep2.id())
            .unwrap();
    engine.inject(Fault {
        operation: Operation::Decrypt,
        phase: Phase::Sizing,
        status: EngineError::OutOfMemory.status(),
    });
    engine.inject(Fault {
        operation: Operation::Decrypt,
        phase: Phase::Materializing,
        status: EngineError::Fail.status(),
    });
    assert_eq!(
        bridge::decrypt(engine.as_ref(), &sk, &[0u8; 10]),
        Err(NtruError::Engine(EngineError::OutOfMemory))
    );
}

#[test]
fn unknown_status_is_a_protocol_violation() {
    let (engine, source) = setup(SimulatedEngine::new());
    let (pk, _) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees401Ep2.id())
            .unwrap();
    engine.inject(Fault {
        operation: Operation::PublicKeyToDer,
        phase: Phase::Materializing,
        status: 0xdead_beef,
    });
    assert_eq!(
        bridge::public_key_to_der(engine.as_ref(), &pk),
        Err(NtruError::UnknownStatus {
            subsystem: Subsystem::Ntru,
            code: 0xdead_beef,
        })
    );
}

#[test]
fn overreported_length_is_rejected() {
    let (engine, source) = setup(SimulatedEngine::new());
    let (pk, _) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees401Ep2.id())
            .unwrap();
    engine.overreport_next(Operation::Encrypt);
    let expected = layout::ciphertext_length(EncryptParamSet::Ees401Ep2) as u16;
    assert_eq!(
        bridge::encrypt(engine.as_ref(), source.handle(), &pk, b"x"),
        Err(NtruError::LengthMismatch {
            reported: expected + 1,
            capacity: expected,
        })
    );
}

#[test]
fn decrypt_truncates_to_reported_length() {
    let (engine, source) = setup(SimulatedEngine::new());
    let params = EncryptParamSet::Ees1499Ep1;
    let (pk, sk) = bridge::generate_key_pair(engine.as_ref(), source.handle(), params.id()).unwrap();

    let ct = bridge::encrypt(engine.as_ref(), source.handle(), &pk, b"abc").unwrap();
    let pt = bridge::decrypt(engine.as_ref(), &sk, &ct).unwrap();
    assert_eq!(pt, b"abc");
    assert!(pt.len() < params.max_message_len());
}

#[test]
fn empty_message_round_trips() {
    let (engine, source) = setup(SimulatedEngine::new());
    let (pk, sk) =
        bridge::generate_key_pair(engine.as_ref(), source.handle(), EncryptParamSet::Ees443Ep1.id())
            .unwrap();
    let ct = bridge::encrypt(engine.as_ref(), source.handle(), &pk, b"").unwrap();
    assert!(bridge::decrypt(engine.as_ref(), &sk, &ct).unwrap().is_empty());
}

#[test]
fn oversized_inputs_never_reach_the_engine() {
    let (engine, source) = setup(SimulatedEngine::new());
    let huge = vec![0u8; usize::from(u16::MAX) + 1];
    assert_eq!(
        bridge::decrypt(engine.as_ref(), &huge, b"ct"),
        Err(NtruError::InputTooLarge {
            len: huge.len(),
            max: usize::from(u16::MAX),
        })
    );
    assert!(matches!(
        bridge::encrypt(engine.as_ref(), source.handle(), &huge, b"m"),
        Err(NtruError::InputTooLarge { .. })
    ));
}

#[test]
fn malformed_der_is_a_bad_encoding() {
    let (engine, _source) = setup(SimulatedEngine::new());
    assert_eq!(
        bridge::der_to_public_key(engine.as_ref(), &[0x30, 0x03, 0x02, 0x01, 0x00]),
        Err(NtruError::Engine(EngineError::BadEncoding))
    );
}

#[test]
fn wrong_private_key_fails_to_decrypt() {
    let (engine, source) = setup(SimulatedEngine::new());
    let id = EncryptParamSet::Ees613Ep1.id();
    let (pk, _) = bridge::generate_key_pair(engine.as_ref(), source.handle(), id).unwrap();
    let (_, other_sk) = bridge::generate_key_pair(engine.as_ref(), source.handle(), id).unwrap();

    let ct = bridge::encrypt(engine.as_ref(), source.handle(), &pk, b"secret").unwrap();
    assert_eq!(
        bridge::decrypt(engine.as_ref(), &other_sk, &ct),
        Err(NtruError::Engine(EngineError::Fail))
    );
}

#[test]
fn overreported_public_key_length_fails_keygen() {
    let (engine, source) = setup(SimulatedEngine::new());
    let params = EncryptParamSet::Ees659Ep1;
    engine.overreport_next(Operation::Keygen);
    let capacity = layout::public_key_length(params) as u16;
    assert_eq!(
        bridge::generate_key_pair(engine.as_ref(), source.handle(), params.id()),
        Err(NtruError::LengthMismatch {
            reported: capacity + 1,
            capacity,
        })
    );

    let (pk, sk) = bridge::generate_key_pair(engine.as_ref(), source.handle(), params.id()).unwrap();
    assert_eq!(pk.len(), usize::from(capacity));
    assert_eq!(sk.len(), layout::private_key_length(params));
}
