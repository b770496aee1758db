// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

//! Raw declarations of the `libntruencrypt` entry points used by `ntru-core`.
//!
//! Every function returns a `u32` status: `0` on success, otherwise a code
//! offset by the base of the subsystem that produced it
//! ([`NTRU_ERROR_BASE`], [`DRBG_ERROR_BASE`], ...). Variable-length outputs
//! are negotiated by calling once with a null output pointer to learn the
//! length, then again with a buffer of that length.

#![allow(non_snake_case, non_camel_case_types)]

/// Opaque DRBG instance identifier handed out by the engine.
pub type DRBG_HANDLE = u32;

/// Entropy callback: fill `out` with `num_bytes` random bytes, return `0` on success.
pub type RANDOM_BYTES_FN = extern "C" fn(out: *mut u8, num_bytes: u32) -> u32;

pub const HASH_ERROR_BASE: u32 = 0x0000_0100;
pub const HMAC_ERROR_BASE: u32 = 0x0000_0200;
pub const SHA_ERROR_BASE: u32 = 0x0000_0400;
pub const DRBG_ERROR_BASE: u32 = 0x0000_0a00;
pub const NTRU_ERROR_BASE: u32 = 0x0000_3000;
pub const MGF1_ERROR_BASE: u32 = 0x0000_4100;

pub const NTRU_OK: u32 = 0;
pub const DRBG_OK: u32 = 0;

extern "C" {
    pub fn ntru_crypto_drbg_external_instantiate(
        randombytesfn: RANDOM_BYTES_FN,
        handle: *mut DRBG_HANDLE,
    ) -> u32;

    pub fn ntru_crypto_drbg_uninstantiate(handle: DRBG_HANDLE) -> u32;

    pub fn ntru_crypto_ntru_encrypt_keygen(
        drbg_handle: DRBG_HANDLE,
        param_set_id: u8,
        pubkey_blob_len: *mut u16,
        pubkey_blob: *mut u8,
        privkey_blob_len: *mut u16,
        privkey_blob: *mut u8,
    ) -> u32;

    pub fn ntru_crypto_ntru_encrypt_publicKey2SubjectPublicKeyInfo(
        pubkey_blob_len: u16,
        pubkey_blob: *const u8,
        encoded_subject_public_key_info_len: *mut u16,
        encoded_subject_public_key_info: *mut u8,
    ) -> u32;

    pub fn ntru_crypto_ntru_encrypt_subjectPublicKeyInfo2PublicKey(
        encoded_data: *const u8,
        pubkey_blob_len: *mut u16,
        pubkey_blob: *mut u8,
        next: *mut *const u8,
        remaining_data_len: *mut u32,
    ) -> u32;

    pub fn ntru_crypto_ntru_encrypt(
        drbg_handle: DRBG_HANDLE,
        pubkey_blob_len: u16,
        pubkey_blob: *const u8,
        pt_len: u16,
        pt: *const u8,
        ct_len: *mut u16,
        ct: *mut u8,
    ) -> u32;

    pub fn ntru_crypto_ntru_decrypt(
        privkey_blob_len: u16,
        privkey_blob: *const u8,
        ct_len: u16,
        ct: *const u8,
        pt_len: *mut u16,
        pt: *mut u8,
    ) -> u32;
}
