// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

//! Two-phase buffer negotiation with the engine.
//!
//! The engine cannot allocate on the caller's behalf and cannot report an
//! output size without the full argument set. Every variable-length
//! operation is therefore issued twice: a sizing call with no output buffer,
//! then a materializing call with a buffer of exactly the reported length.
//! The functions here hide that dance and return owned byte vectors.

use tracing::trace;
use zeroize::Zeroize;

use crate::engine::{DrbgHandle, Engine};
use crate::error::{translate_any, EngineError, NtruError, NtruResult, Subsystem};

const CORE: &[Subsystem] = &[Subsystem::Ntru];
const CORE_WITH_DRBG: &[Subsystem] = &[Subsystem::Ntru, Subsystem::Drbg];

/// Rejects inputs the engine's 16-bit length fields cannot describe.
fn checked_len(data: &[u8]) -> NtruResult<u16> {
    u16::try_from(data.len()).map_err(|_| NtruError::InputTooLarge {
        len: data.len(),
        max: usize::from(u16::MAX),
    })
}

/// The sizing call may legitimately answer "buffer too small".
fn accept_sizing(status: u32, spaces: &[Subsystem]) -> NtruResult<()> {
    match translate_any(status, spaces) {
        Err(NtruError::Engine(EngineError::BufferTooSmall)) => Ok(()),
        other => other,
    }
}

/// Shrinks `buf` to the `reported` length, scrubbing the unused tail.
fn finish(mut buf: Vec<u8>, reported: u16, capacity: u16) -> NtruResult<Vec<u8>> {
    if reported > capacity {
        buf.zeroize();
        return Err(NtruError::LengthMismatch { reported, capacity });
    }
    let used = usize::from(reported);
    buf[used..].zeroize();
    buf.truncate(used);
    Ok(buf)
}

/// Runs a single-output operation through both phases.
///
/// `call` receives the in/out length and the output buffer (`None` during
/// sizing) and returns the raw status.
fn negotiate<F>(op: &'static str, spaces: &[Subsystem], mut call: F) -> NtruResult<Vec<u8>>
where
    F: FnMut(&mut u16, Option<&mut [u8]>) -> u32,
{
    let mut len = 0u16;
    accept_sizing(call(&mut len, None), spaces)?;
    let capacity = len;
    trace!(op, capacity, "sized engine output");

    let mut out = vec![0u8; usize::from(capacity)];
    let status = call(&mut len, Some(out.as_mut_slice()));
    if let Err(err) = translate_any(status, spaces) {
        out.zeroize();
        return Err(err);
    }
    trace!(op, written = len, "materialized engine output");
    finish(out, len, capacity)
}

/// Generates a key pair under `param_set_id`, returning `(public, private)` blobs.
pub fn generate_key_pair(
    engine: &dyn Engine,
    drbg: DrbgHandle,
    param_set_id: u8,
) -> NtruResult<(Vec<u8>, Vec<u8>)> {
    let (mut pk_len, mut sk_len) = (0u16, 0u16);
    accept_sizing(
        engine.keygen(drbg, param_set_id, &mut pk_len, None, &mut sk_len, None),
        CORE_WITH_DRBG,
    )?;
    let (pk_capacity, sk_capacity) = (pk_len, sk_len);
    trace!(pk_capacity, sk_capacity, "sized key blobs");

    let mut public_key = vec![0u8; usize::from(pk_capacity)];
    let mut private_key = vec![0u8; usize::from(sk_capacity)];
    let status = engine.keygen(
        drbg,
        param_set_id,
        &mut pk_len,
        Some(public_key.as_mut_slice()),
        &mut sk_len,
        Some(private_key.as_mut_slice()),
    );
    if let Err(err) = translate_any(status, CORE_WITH_DRBG) {
        private_key.zeroize();
        return Err(err);
    }

    let public_key = match finish(public_key, pk_len, pk_capacity) {
        Ok(public_key) => public_key,
        Err(err) => {
            private_key.zeroize();
            return Err(err);
        }
    };
    let private_key = finish(private_key, sk_len, sk_capacity)?;
    Ok((public_key, private_key))
}

/// Encrypts `plaintext` under the public key blob, drawing randomness from `drbg`.
pub fn encrypt(
    engine: &dyn Engine,
    drbg: DrbgHandle,
    public_key: &[u8],
    plaintext: &[u8],
) -> NtruResult<Vec<u8>> {
    checked_len(public_key)?;
    checked_len(plaintext)?;
    negotiate("encrypt", CORE_WITH_DRBG, |len, out| {
        engine.encrypt(drbg, public_key, plaintext, len, out)
    })
}

/// Decrypts `ciphertext` with the private key blob.
pub fn decrypt(engine: &dyn Engine, private_key: &[u8], ciphertext: &[u8]) -> NtruResult<Vec<u8>> {
    checked_len(private_key)?;
    checked_len(ciphertext)?;
    negotiate("decrypt", CORE, |len, out| {
        engine.decrypt(private_key, ciphertext, len, out)
    })
}

/// Wraps a public key blob in a DER SubjectPublicKeyInfo.
pub fn public_key_to_der(engine: &dyn Engine, public_key: &[u8]) -> NtruResult<Vec<u8>> {
    checked_len(public_key)?;
    negotiate("public_key_to_der", CORE, |len, out| {
        engine.public_key_to_der(public_key, len, out)
    })
}

/// Recovers the public key blob from a DER SubjectPublicKeyInfo.
pub fn der_to_public_key(engine: &dyn Engine, der: &[u8]) -> NtruResult<Vec<u8>> {
    negotiate("der_to_public_key", CORE, |len, out| {
        engine.der_to_public_key(der, len, out)
    })
}
