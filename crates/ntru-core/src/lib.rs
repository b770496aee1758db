// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

//! Safe bindings over the NTRUEncrypt engine (`libntruencrypt`).
//!
//! The engine performs all of the lattice arithmetic; this crate manages
//! everything around it: choosing parameter sets, owning key blobs and DRBG
//! handles, negotiating output buffers, and turning numeric status codes into
//! typed errors.
//!
//! # Crate layout
//!
//! * [`params`] -- the catalog of IEEE 1363.1 parameter sets and its lookups.
//! * [`error`] -- error types and status code translation.
//! * [`engine`] -- the [`Engine`] trait over the native entry points and the process-wide engine slot.
//! * [`bridge`] -- two-phase buffer negotiation for every variable-length operation.
//! * [`drbg`] -- DRBG handles ([`RandomSource`]) and the default source.
//! * [`key`] -- public/private keys and key pairs.
//!
//! # Example
//!
//! ```no_run
//! use ntru_core::{create_keys, KeyType};
//!
//! # fn main() -> ntru_core::NtruResult<()> {
//! let (public_key, private_key) = create_keys(None, KeyType::Product, 256)?.into_parts();
//! let ciphertext = public_key.encrypt(b"hello", None)?;
//! assert_eq!(private_key.decrypt(&ciphertext)?, b"hello");
//! ntru_core::release_default_source()?;
//! # Ok(())
//! # }
//! ```

/// Two-phase buffer negotiation with the engine.
pub mod bridge;
/// DRBG handles used as random sources.
pub mod drbg;
/// The foreign engine seam.
pub mod engine;
/// Error types and status code translation.
pub mod error;
/// Public keys, private keys and key pairs.
pub mod key;
/// Parameter set catalog.
pub mod params;

pub use drbg::{release_default_source, with_default_source, RandomSource};
pub use engine::{DrbgHandle, Engine, RandBytesFn};
pub use error::{DrbgError, EngineError, NtruError, NtruResult, Subsystem};
pub use key::{Key, KeyPair, PrivateKey, PublicKey};
pub use params::{get_parameter, EncryptParamSet, KeyType, SecurityLevel};

/// Generates a key pair with the default random source.
///
/// `param` wins when given; otherwise the parameter set is looked up from
/// `key_type` and `key_size` (see [`get_parameter`]).
///
/// # Errors
///
/// Returns [`NtruError::InvalidSecurityLevel`] for an unsupported `key_size`,
/// or the translated engine failure.
pub fn create_keys(
    param: Option<EncryptParamSet>,
    key_type: KeyType,
    key_size: u16,
) -> NtruResult<KeyPair> {
    let param = match param {
        Some(param) => param,
        None => get_parameter(key_type, key_size)?,
    };
    with_default_source(|source| source.create_keys(param))
}
