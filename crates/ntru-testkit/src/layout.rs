// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

//! Byte layouts produced by the simulated engine: key blobs, ciphertexts and
//! the SubjectPublicKeyInfo wrapper. None of this is cryptography; it only
//! has the same shapes and failure modes as the real engine's output.

use ntru_core::error::EngineError;
use ntru_core::key::{key_oid, KEY_HEADER_LENGTH};
use ntru_core::params::OID_LENGTH;
use ntru_core::EncryptParamSet;

pub const PUBLIC_KEY_TAG: u8 = 0x01;
pub const PRIVATE_KEY_TAG: u8 = 0x02;

pub const SECRET_LENGTH: usize = 32;
pub const NONCE_LENGTH: usize = 16;
pub const CHECK_LENGTH: usize = 4;

const PUBLIC_MASK: u8 = 0x5c;
const PRIVATE_MASK: u8 = 0x36;

/// AlgorithmIdentifier for id-ntru-EESS1v1 (1.3.6.1.4.1.8342.1.1.1).
const ALGORITHM_ID: [u8; 15] = [
    0x30, 0x0d, 0x06, 0x0b, 0x2b, 0x06, 0x01, 0x04, 0x01, 0xc1, 0x16, 0x01, 0x01, 0x01, 0x01,
];

pub type Secret = [u8; SECRET_LENGTH];

/// Ring degree N of each parameter set.
pub fn ring_degree(params: EncryptParamSet) -> usize {
    use EncryptParamSet as P;
    match params {
        P::Ees401Ep1 | P::Ees401Ep2 => 401,
        P::Ees449Ep1 => 449,
        P::Ees677Ep1 => 677,
        P::Ees1087Ep1 | P::Ees1087Ep2 => 1087,
        P::Ees541Ep1 => 541,
        P::Ees613Ep1 => 613,
        P::Ees887Ep1 => 887,
        P::Ees1171Ep1 => 1171,
        P::Ees659Ep1 => 659,
        P::Ees761Ep1 => 761,
        P::Ees1499Ep1 => 1499,
        P::Ees439Ep1 => 439,
        P::Ees593Ep1 => 593,
        P::Ees743Ep1 => 743,
        P::Ees443Ep1 => 443,
        P::Ees587Ep1 => 587,
    }
}

/// A polynomial mod q = 2048 packed at 11 bits per coefficient.
pub fn packed_length(params: EncryptParamSet) -> usize {
    (ring_degree(params) * 11 + 7) / 8
}

pub fn public_key_length(params: EncryptParamSet) -> usize {
    KEY_HEADER_LENGTH + packed_length(params)
}

pub fn private_key_length(params: EncryptParamSet) -> usize {
    KEY_HEADER_LENGTH + SECRET_LENGTH + ring_degree(params) / 4
}

pub fn ciphertext_length(params: EncryptParamSet) -> usize {
    packed_length(params)
}

/// Deterministic byte stream standing in for the lattice operations.
pub fn keystream(secret: &Secret, nonce: &[u8], len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| {
            let mix = nonce.get(i % nonce.len().max(1)).copied().unwrap_or(0);
            secret[i % SECRET_LENGTH] ^ mix ^ (i as u8).wrapping_mul(0x9d) ^ ((i >> 8) as u8)
        })
        .collect()
}

fn header(tag: u8, params: EncryptParamSet) -> Vec<u8> {
    let mut out = Vec::with_capacity(KEY_HEADER_LENGTH);
    out.push(tag);
    out.push(OID_LENGTH as u8);
    out.extend_from_slice(&params.oid());
    out
}

fn masked(secret: &Secret, mask: u8) -> Secret {
    let mut out = *secret;
    out.iter_mut().for_each(|b| *b ^= mask);
    out
}

pub fn encode_public_key(params: EncryptParamSet, secret: &Secret) -> Vec<u8> {
    let mut blob = header(PUBLIC_KEY_TAG, params);
    blob.extend_from_slice(&masked(secret, PUBLIC_MASK));
    blob.extend(keystream(secret, b"public", packed_length(params) - SECRET_LENGTH));
    blob
}

pub fn encode_private_key(params: EncryptParamSet, secret: &Secret) -> Vec<u8> {
    let mut blob = header(PRIVATE_KEY_TAG, params);
    blob.extend_from_slice(&masked(secret, PRIVATE_MASK));
    blob.extend(keystream(secret, b"private", ring_degree(params) / 4));
    blob
}

fn decode_key(
    blob: &[u8],
    tag: u8,
    mask: u8,
    expected_len: fn(EncryptParamSet) -> usize,
    bad_key: EngineError,
) -> Result<(EncryptParamSet, Secret), EngineError> {
    if blob.first() != Some(&tag) {
        return Err(bad_key);
    }
    let oid = key_oid(blob).map_err(|_| bad_key)?;
    let params = EncryptParamSet::from_oid(&oid).map_err(|_| EngineError::OidNotRecognized)?;
    if blob.len() != expected_len(params) {
        return Err(bad_key);
    }
    let mut secret = [0u8; SECRET_LENGTH];
    secret.copy_from_slice(&blob[KEY_HEADER_LENGTH..KEY_HEADER_LENGTH + SECRET_LENGTH]);
    Ok((params, masked(&secret, mask)))
}

pub fn decode_public_key(blob: &[u8]) -> Result<(EncryptParamSet, Secret), EngineError> {
    decode_key(
        blob,
        PUBLIC_KEY_TAG,
        PUBLIC_MASK,
        public_key_length,
        EngineError::BadPublicKey,
    )
}

pub fn decode_private_key(blob: &[u8]) -> Result<(EncryptParamSet, Secret), EngineError> {
    decode_key(
        blob,
        PRIVATE_KEY_TAG,
        PRIVATE_MASK,
        private_key_length,
        EngineError::BadPrivateKey,
    )
}

/// Ciphertext: nonce || check || masked(len || message || padding).
pub fn seal(params: EncryptParamSet, secret: &Secret, nonce: &[u8; NONCE_LENGTH], msg: &[u8]) -> Vec<u8> {
    let body_len = ciphertext_length(params) - NONCE_LENGTH - CHECK_LENGTH;
    let mut body = Vec::with_capacity(body_len);
    body.push(msg.len() as u8);
    body.extend_from_slice(msg);
    body.resize(body_len, 0);

    let stream = keystream(secret, nonce, CHECK_LENGTH + body_len);
    let mut out = Vec::with_capacity(ciphertext_length(params));
    out.extend_from_slice(nonce);
    out.extend_from_slice(&stream[..CHECK_LENGTH]);
    out.extend(body.iter().zip(&stream[CHECK_LENGTH..]).map(|(b, k)| b ^ k));
    out
}

pub fn open(params: EncryptParamSet, secret: &Secret, ct: &[u8]) -> Result<Vec<u8>, EngineError> {
    if ct.len() != ciphertext_length(params) {
        return Err(EngineError::BadLength);
    }
    let (nonce, rest) = ct.split_at(NONCE_LENGTH);
    let (check, body) = rest.split_at(CHECK_LENGTH);
    let stream = keystream(secret, nonce, CHECK_LENGTH + body.len());
    if check != &stream[..CHECK_LENGTH] {
        return Err(EngineError::Fail);
    }
    let plain: Vec<u8> = body
        .iter()
        .zip(&stream[CHECK_LENGTH..])
        .map(|(b, k)| b ^ k)
        .collect();
    let msg_len = usize::from(plain[0]);
    if msg_len > params.max_message_len() {
        return Err(EngineError::Fail);
    }
    Ok(plain[1..=msg_len].to_vec())
}

fn push_long_len(out: &mut Vec<u8>, len: usize) {
    out.push(0x82);
    out.extend_from_slice(&(len as u16).to_be_bytes());
}

/// SEQUENCE { AlgorithmIdentifier, BIT STRING { OCTET STRING { blob } } }
pub fn encode_spki(blob: &[u8]) -> Vec<u8> {
    let octets_len = 4 + blob.len();
    let bits_len = 1 + octets_len;
    let content_len = ALGORITHM_ID.len() + 4 + bits_len;

    let mut out = Vec::with_capacity(4 + content_len);
    out.push(0x30);
    push_long_len(&mut out, content_len);
    out.extend_from_slice(&ALGORITHM_ID);
    out.push(0x03);
    push_long_len(&mut out, bits_len);
    out.push(0x00);
    out.push(0x04);
    push_long_len(&mut out, blob.len());
    out.extend_from_slice(blob);
    out
}

fn read_long_len(der: &[u8], at: usize, tag: u8) -> Result<usize, EngineError> {
    match der.get(at..at + 4) {
        Some([t, 0x82, hi, lo]) if *t == tag => Ok(usize::from(u16::from_be_bytes([*hi, *lo]))),
        _ => Err(EngineError::BadEncoding),
    }
}

/// Returns the public key blob inside an SPKI produced by [`encode_spki`].
pub fn decode_spki(der: &[u8]) -> Result<&[u8], EngineError> {
    let content_len = read_long_len(der, 0, 0x30)?;
    if der.len() < 4 + content_len {
        return Err(EngineError::BadEncoding);
    }
    let alg_end = 4 + ALGORITHM_ID.len();
    if der.get(4..alg_end) != Some(&ALGORITHM_ID[..]) {
        return Err(EngineError::BadEncoding);
    }
    let bits_len = read_long_len(der, alg_end, 0x03)?;
    if der.get(alg_end + 4) != Some(&0x00) {
        return Err(EngineError::BadEncoding);
    }
    let octets_at = alg_end + 5;
    let blob_len = read_long_len(der, octets_at, 0x04)?;
    let blob_at = octets_at + 4;
    if bits_len != 1 + 4 + blob_len || content_len != ALGORITHM_ID.len() + 4 + bits_len {
        return Err(EngineError::BadEncoding);
    }
    der.get(blob_at..blob_at + blob_len)
        .ok_or(EngineError::BadEncoding)
}
