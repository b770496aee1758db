// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

//! The seam between the binding layer and the native NTRUEncrypt engine.
//!
//! [`Engine`] mirrors the C entry points one to one: inputs are slices,
//! variable-length outputs are an in/out length plus an optional buffer, and
//! every call returns the raw `u32` status. Passing `None` as the buffer asks
//! the engine for the required length only. Nothing in this module interprets
//! statuses; that is [`crate::bridge`]'s job.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{NtruError, NtruResult};

/// Opaque DRBG instance identifier handed out by the engine.
pub type DrbgHandle = u32;

/// Entropy callback: fill `out` with `num_bytes` bytes and return `0`, or
/// return non-zero on failure.
pub type RandBytesFn = extern "C" fn(out: *mut u8, num_bytes: u32) -> u32;

/// One method per foreign operation, with the engine's calling convention.
///
/// When an output buffer is supplied, the matching length argument holds its
/// capacity on entry and the number of bytes written on return.
pub trait Engine: Send + Sync {
    fn drbg_instantiate(&self, rand_bytes: RandBytesFn, handle: &mut DrbgHandle) -> u32;

    fn drbg_uninstantiate(&self, handle: DrbgHandle) -> u32;

    fn keygen(
        &self,
        drbg: DrbgHandle,
        param_set_id: u8,
        public_key_len: &mut u16,
        public_key: Option<&mut [u8]>,
        private_key_len: &mut u16,
        private_key: Option<&mut [u8]>,
    ) -> u32;

    fn public_key_to_der(&self, public_key: &[u8], der_len: &mut u16, der: Option<&mut [u8]>)
        -> u32;

    fn der_to_public_key(
        &self,
        der: &[u8],
        public_key_len: &mut u16,
        public_key: Option<&mut [u8]>,
    ) -> u32;

    fn encrypt(
        &self,
        drbg: DrbgHandle,
        public_key: &[u8],
        plaintext: &[u8],
        ciphertext_len: &mut u16,
        ciphertext: Option<&mut [u8]>,
    ) -> u32;

    fn decrypt(
        &self,
        private_key: &[u8],
        ciphertext: &[u8],
        plaintext_len: &mut u16,
        plaintext: Option<&mut [u8]>,
    ) -> u32;
}

static ENGINE: OnceCell<Arc<dyn Engine>> = OnceCell::new();

/// Installs the process-wide engine used by key operations.
///
/// # Errors
///
/// Returns [`NtruError::EngineAlreadyInstalled`] if an engine is already in place.
pub fn install(engine: Arc<dyn Engine>) -> NtruResult<()> {
    ENGINE
        .set(engine)
        .map_err(|_| NtruError::EngineAlreadyInstalled)
}

/// Returns the installed engine, installing the one built by `init` if the
/// slot is still empty.
pub fn get_or_install<F>(init: F) -> Arc<dyn Engine>
where
    F: FnOnce() -> Arc<dyn Engine>,
{
    Arc::clone(ENGINE.get_or_init(init))
}

/// Returns the process-wide engine.
///
/// With the `native` feature the native engine is installed on first use.
///
/// # Errors
///
/// Returns [`NtruError::EngineUnavailable`] if no engine was installed and
/// the `native` feature is off.
pub fn current() -> NtruResult<Arc<dyn Engine>> {
    #[cfg(feature = "native")]
    {
        Ok(get_or_install(|| Arc::new(NativeEngine)))
    }
    #[cfg(not(feature = "native"))]
    {
        ENGINE.get().cloned().ok_or(NtruError::EngineUnavailable)
    }
}

#[cfg(feature = "native")]
pub use native::NativeEngine;

#[cfg(feature = "native")]
mod native {
    use std::ptr;

    use super::{DrbgHandle, Engine, RandBytesFn};

    /// Engine backed by the linked `libntruencrypt`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NativeEngine;

    /// Splits an optional output buffer into the pointer handed to C, clamping
    /// the advertised capacity to the real buffer length.
    fn out_ptr(len: &mut u16, buf: Option<&mut [u8]>) -> *mut u8 {
        match buf {
            Some(buf) => {
                *len = (*len).min(u16::try_from(buf.len()).unwrap_or(u16::MAX));
                buf.as_mut_ptr()
            }
            None => ptr::null_mut(),
        }
    }

    // Callers reject inputs over u16::MAX before reaching the engine; clamp
    // here so a direct caller can never advertise more than the slice holds.
    fn in_len(data: &[u8]) -> u16 {
        u16::try_from(data.len()).unwrap_or(u16::MAX)
    }

    impl Engine for NativeEngine {
        fn drbg_instantiate(&self, rand_bytes: RandBytesFn, handle: &mut DrbgHandle) -> u32 {
            // SAFETY: `handle` is a valid, exclusive u32 location for the call.
            unsafe { ntru_sys::ntru_crypto_drbg_external_instantiate(rand_bytes, handle) }
        }

        fn drbg_uninstantiate(&self, handle: DrbgHandle) -> u32 {
            // SAFETY: plain value argument; the engine validates the handle.
            unsafe { ntru_sys::ntru_crypto_drbg_uninstantiate(handle) }
        }

        fn keygen(
            &self,
            drbg: DrbgHandle,
            param_set_id: u8,
            public_key_len: &mut u16,
            public_key: Option<&mut [u8]>,
            private_key_len: &mut u16,
            private_key: Option<&mut [u8]>,
        ) -> u32 {
            let pk = out_ptr(public_key_len, public_key);
            let sk = out_ptr(private_key_len, private_key);
            // SAFETY: output pointers are null or point at buffers at least as
            // long as the advertised lengths.
            unsafe {
                ntru_sys::ntru_crypto_ntru_encrypt_keygen(
                    drbg,
                    param_set_id,
                    public_key_len,
                    pk,
                    private_key_len,
                    sk,
                )
            }
        }

        fn public_key_to_der(
            &self,
            public_key: &[u8],
            der_len: &mut u16,
            der: Option<&mut [u8]>,
        ) -> u32 {
            let out = out_ptr(der_len, der);
            // SAFETY: input pointer/length come from one slice; output as above.
            unsafe {
                ntru_sys::ntru_crypto_ntru_encrypt_publicKey2SubjectPublicKeyInfo(
                    in_len(public_key),
                    public_key.as_ptr(),
                    der_len,
                    out,
                )
            }
        }

        fn der_to_public_key(
            &self,
            der: &[u8],
            public_key_len: &mut u16,
            public_key: Option<&mut [u8]>,
        ) -> u32 {
            let out = out_ptr(public_key_len, public_key);
            let mut next = der.as_ptr();
            let mut remaining = u32::try_from(der.len()).unwrap_or(u32::MAX);
            // SAFETY: the engine reads at most `remaining` bytes from `der` and
            // only advances `next` within it.
            unsafe {
                ntru_sys::ntru_crypto_ntru_encrypt_subjectPublicKeyInfo2PublicKey(
                    der.as_ptr(),
                    public_key_len,
                    out,
                    &mut next,
                    &mut remaining,
                )
            }
        }

        fn encrypt(
            &self,
            drbg: DrbgHandle,
            public_key: &[u8],
            plaintext: &[u8],
            ciphertext_len: &mut u16,
            ciphertext: Option<&mut [u8]>,
        ) -> u32 {
            let out = out_ptr(ciphertext_len, ciphertext);
            // SAFETY: input pointers/lengths come from slices; output as above.
            unsafe {
                ntru_sys::ntru_crypto_ntru_encrypt(
                    drbg,
                    in_len(public_key),
                    public_key.as_ptr(),
                    in_len(plaintext),
                    plaintext.as_ptr(),
                    ciphertext_len,
                    out,
                )
            }
        }

        fn decrypt(
            &self,
            private_key: &[u8],
            ciphertext: &[u8],
            plaintext_len: &mut u16,
            plaintext: Option<&mut [u8]>,
        ) -> u32 {
            let out = out_ptr(plaintext_len, plaintext);
            // SAFETY: input pointers/lengths come from slices; output as above.
            unsafe {
                ntru_sys::ntru_crypto_ntru_decrypt(
                    in_len(private_key),
                    private_key.as_ptr(),
                    in_len(ciphertext),
                    ciphertext.as_ptr(),
                    plaintext_len,
                    out,
                )
            }
        }
    }
}
