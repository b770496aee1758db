// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bridge;
use crate::drbg::{with_default_source, RandomSource};
use crate::engine;
use crate::error::{NtruError, NtruResult};
use crate::params::{EncryptParamSet, OID_LENGTH};

/// Byte 0 of a key blob: format tag.
pub const KEY_TAG_OFFSET: usize = 0;
/// Byte 1 of a key blob: number of OID octets that follow.
pub const KEY_OID_LENGTH_OFFSET: usize = 1;
/// Bytes 2..5 of a key blob: the parameter-set OID.
pub const KEY_OID_OFFSET: usize = 2;
/// Length of the fixed header preceding the packed key material.
pub const KEY_HEADER_LENGTH: usize = KEY_OID_OFFSET + OID_LENGTH;

/// Reads the parameter-set OID out of a key blob header.
///
/// # Errors
///
/// Returns [`NtruError::MalformedKey`] if the blob is shorter than the header
/// or does not declare a 3-byte OID.
pub fn key_oid(blob: &[u8]) -> NtruResult<[u8; OID_LENGTH]> {
    if blob.len() < KEY_HEADER_LENGTH || usize::from(blob[KEY_OID_LENGTH_OFFSET]) != OID_LENGTH {
        return Err(NtruError::MalformedKey { len: blob.len() });
    }
    let mut oid = [0u8; OID_LENGTH];
    oid.copy_from_slice(&blob[KEY_OID_OFFSET..KEY_HEADER_LENGTH]);
    Ok(oid)
}

/// An engine key blob together with its parameter set.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct Key {
    blob: Vec<u8>,
    #[zeroize(skip)]
    params: EncryptParamSet,
}

impl Key {
    /// Wraps a key blob.
    ///
    /// When `params` is `None` the parameter set is recovered from the OID in
    /// the blob header. Public key blobs are known to carry that header;
    /// private key blobs are assumed to share it.
    ///
    /// # Errors
    ///
    /// Returns [`NtruError::MalformedKey`] or [`NtruError::UnknownOid`] when
    /// the parameter set has to be recovered and cannot be.
    pub fn from_binary(blob: impl Into<Vec<u8>>, params: Option<EncryptParamSet>) -> NtruResult<Self> {
        let blob = blob.into();
        let params = match params {
            Some(params) => params,
            None => EncryptParamSet::from_oid(&key_oid(&blob)?)?,
        };
        Ok(Self { blob, params })
    }

    /// Raw key blob as produced or consumed by the engine.
    pub fn as_binary(&self) -> &[u8] {
        &self.blob
    }

    pub fn params(&self) -> EncryptParamSet {
        self.params
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("params", &self.params)
            .field("len", &self.blob.len())
            .finish()
    }
}

/// An NTRUEncrypt public key.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(Key);

impl PublicKey {
    /// See [`Key::from_binary`].
    pub fn from_binary(blob: impl Into<Vec<u8>>, params: Option<EncryptParamSet>) -> NtruResult<Self> {
        Key::from_binary(blob, params).map(Self)
    }

    /// Decodes a DER SubjectPublicKeyInfo, recovering the parameter set from
    /// the embedded key.
    pub fn from_der(der: &[u8]) -> NtruResult<Self> {
        let engine = engine::current()?;
        let blob = bridge::der_to_public_key(engine.as_ref(), der)?;
        Self::from_binary(blob, None)
    }

    /// Encodes this key as a DER SubjectPublicKeyInfo.
    pub fn to_der(&self) -> NtruResult<Vec<u8>> {
        let engine = engine::current()?;
        bridge::public_key_to_der(engine.as_ref(), self.as_binary())
    }

    /// Shorthand for `self.params().max_message_len()`.
    pub fn max_message_len(&self) -> usize {
        self.params().max_message_len()
    }

    /// Encrypts `data` under this key.
    ///
    /// Randomness comes from `source`, or from the process-wide default source
    /// when `None`. Only byte slices are accepted; text and numbers have to be
    /// encoded by the caller:
    ///
    /// ```compile_fail
    /// # fn demo(key: &ntru_core::PublicKey) {
    /// let _ = key.encrypt("attack at dawn", None);
    /// # }
    /// ```
    ///
    /// ```compile_fail
    /// # fn demo(key: &ntru_core::PublicKey) {
    /// let _ = key.encrypt(42, None);
    /// # }
    /// ```
    ///
    /// ```compile_fail
    /// # fn demo(key: &ntru_core::PublicKey) {
    /// let _ = key.encrypt((1u8, 2u8), None);
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`NtruError::InputTooLarge`] if `data` is longer than
    /// [`Self::max_message_len`], otherwise the translated engine failure.
    pub fn encrypt(&self, data: &[u8], source: Option<&RandomSource>) -> NtruResult<Vec<u8>> {
        let max = self.max_message_len();
        if data.len() > max {
            return Err(NtruError::InputTooLarge {
                len: data.len(),
                max,
            });
        }
        let run = |source: &RandomSource| {
            bridge::encrypt(source.engine().as_ref(), source.handle(), self.as_binary(), data)
        };
        match source {
            Some(source) => run(source),
            None => with_default_source(run),
        }
    }
}

impl Deref for PublicKey {
    type Target = Key;
    fn deref(&self) -> &Key {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.0).finish()
    }
}

/// An NTRUEncrypt private key. The blob is zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(Key);

impl PrivateKey {
    /// See [`Key::from_binary`].
    pub fn from_binary(blob: impl Into<Vec<u8>>, params: Option<EncryptParamSet>) -> NtruResult<Self> {
        Key::from_binary(blob, params).map(Self)
    }

    /// Decrypts a ciphertext produced by the matching public key.
    pub fn decrypt(&self, data: &[u8]) -> NtruResult<Vec<u8>> {
        let engine = engine::current()?;
        bridge::decrypt(engine.as_ref(), self.as_binary(), data)
    }
}

impl Deref for PrivateKey {
    type Target = Key;
    fn deref(&self) -> &Key {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({}, [REDACTED; {}])", self.params(), self.as_binary().len())
    }
}

/// A public and private key generated together.
///
/// Decomposes positionally as `(public, private)`:
///
/// ```no_run
/// # fn demo(pair: ntru_core::KeyPair) {
/// let (public_key, private_key) = pair.into_parts();
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct KeyPair {
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl KeyPair {
    pub fn new(public_key: PublicKey, private_key: PrivateKey) -> Self {
        Self {
            public_key,
            private_key,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.public_key, self.private_key)
    }
}

impl From<KeyPair> for (PublicKey, PrivateKey) {
    fn from(pair: KeyPair) -> Self {
        pair.into_parts()
    }
}
