// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{NtruError, NtruResult};

/// Length of a parameter-set OID in bytes.
pub const OID_LENGTH: usize = 3;

/// Security levels (in bits) accepted by [`get_parameter`].
pub const SECURITY_LEVELS: [u16; 4] = [112, 128, 192, 256];

/// NTRUEncrypt parameter sets known to the engine.
///
/// The discriminant is the identifier the engine expects in its key
/// generation call, so the declaration order must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EncryptParamSet {
    Ees401Ep1 = 0,
    Ees449Ep1 = 1,
    Ees677Ep1 = 2,
    Ees1087Ep2 = 3,
    Ees541Ep1 = 4,
    Ees613Ep1 = 5,
    Ees887Ep1 = 6,
    Ees1171Ep1 = 7,
    Ees659Ep1 = 8,
    Ees761Ep1 = 9,
    Ees1087Ep1 = 10,
    Ees1499Ep1 = 11,
    Ees401Ep2 = 12,
    Ees439Ep1 = 13,
    Ees593Ep1 = 14,
    Ees743Ep1 = 15,
    Ees443Ep1 = 16,
    Ees587Ep1 = 17,
}

struct ParamInfo {
    name: &'static str,
    max_message_len: u16,
    oid: [u8; OID_LENGTH],
}

const fn info(name: &'static str, max_message_len: u16, oid: [u8; OID_LENGTH]) -> ParamInfo {
    ParamInfo {
        name,
        max_message_len,
        oid,
    }
}

// Indexed by discriminant.
static CATALOG: [ParamInfo; 18] = [
    info("ees401ep1", 60, [0x00, 0x02, 0x04]),
    info("ees449ep1", 67, [0x00, 0x03, 0x03]),
    info("ees677ep1", 101, [0x00, 0x05, 0x03]),
    info("ees1087ep2", 170, [0x00, 0x06, 0x03]),
    info("ees541ep1", 86, [0x00, 0x02, 0x05]),
    info("ees613ep1", 97, [0x00, 0x03, 0x04]),
    info("ees887ep1", 141, [0x00, 0x05, 0x04]),
    info("ees1171ep1", 186, [0x00, 0x06, 0x04]),
    info("ees659ep1", 108, [0x00, 0x02, 0x06]),
    info("ees761ep1", 125, [0x00, 0x03, 0x05]),
    info("ees1087ep1", 178, [0x00, 0x05, 0x05]),
    info("ees1499ep1", 247, [0x00, 0x06, 0x05]),
    info("ees401ep2", 60, [0x00, 0x02, 0x10]),
    info("ees439ep1", 65, [0x00, 0x03, 0x10]),
    info("ees593ep1", 86, [0x00, 0x05, 0x10]),
    info("ees743ep1", 106, [0x00, 0x06, 0x10]),
    info("ees443ep1", 49, [0x00, 0x03, 0x11]),
    info("ees587ep1", 76, [0x00, 0x05, 0x11]),
];

static BY_OID: Lazy<HashMap<[u8; OID_LENGTH], EncryptParamSet>> = Lazy::new(|| {
    EncryptParamSet::ALL
        .iter()
        .map(|&params| (params.oid(), params))
        .collect()
});

impl EncryptParamSet {
    /// Every parameter set, in identifier order.
    pub const ALL: [EncryptParamSet; 18] = [
        EncryptParamSet::Ees401Ep1,
        EncryptParamSet::Ees449Ep1,
        EncryptParamSet::Ees677Ep1,
        EncryptParamSet::Ees1087Ep2,
        EncryptParamSet::Ees541Ep1,
        EncryptParamSet::Ees613Ep1,
        EncryptParamSet::Ees887Ep1,
        EncryptParamSet::Ees1171Ep1,
        EncryptParamSet::Ees659Ep1,
        EncryptParamSet::Ees761Ep1,
        EncryptParamSet::Ees1087Ep1,
        EncryptParamSet::Ees1499Ep1,
        EncryptParamSet::Ees401Ep2,
        EncryptParamSet::Ees439Ep1,
        EncryptParamSet::Ees593Ep1,
        EncryptParamSet::Ees743Ep1,
        EncryptParamSet::Ees443Ep1,
        EncryptParamSet::Ees587Ep1,
    ];

    fn info(self) -> &'static ParamInfo {
        &CATALOG[self as usize]
    }

    /// Identifier passed to the engine.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Largest plaintext, in bytes, that a key of this set can encrypt.
    pub fn max_message_len(self) -> usize {
        usize::from(self.info().max_message_len)
    }

    /// OID embedded in key blobs of this set.
    pub fn oid(self) -> [u8; OID_LENGTH] {
        self.info().oid
    }

    /// Lower-case IEEE 1363.1 name, e.g. `ees743ep1`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Parameter set with engine identifier `id`, if any.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Looks a parameter set up by the OID carried in a key blob.
    ///
    /// # Errors
    ///
    /// Returns [`NtruError::UnknownOid`] if no parameter set carries `oid`.
    pub fn from_oid(oid: &[u8; OID_LENGTH]) -> NtruResult<Self> {
        BY_OID
            .get(oid)
            .copied()
            .ok_or(NtruError::UnknownOid(*oid))
    }
}

impl fmt::Display for EncryptParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NTRU_{}", self.name().to_ascii_uppercase())
    }
}

/// Parameter family, trading key size against speed (IEEE 1363.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyType {
    /// Product-form private keys; the fastest family.
    #[default]
    Product = 0,
    /// Smallest keys and ciphertexts.
    Size = 1,
    /// Compromise between size and speed.
    Balanced = 2,
    /// Fastest of the non-product families.
    Speed = 3,
}

impl KeyType {
    /// Every family, in declaration order.
    pub const ALL: [KeyType; 4] = [
        KeyType::Product,
        KeyType::Size,
        KeyType::Balanced,
        KeyType::Speed,
    ];
}

/// Symmetric-equivalent security strength of a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SecurityLevel {
    /// 112-bit security.
    Bits112,
    /// 128-bit security.
    Bits128,
    /// 192-bit security.
    Bits192,
    /// 256-bit security.
    #[default]
    Bits256,
}

impl SecurityLevel {
    /// Every level, weakest first.
    pub const ALL: [SecurityLevel; 4] = [
        SecurityLevel::Bits112,
        SecurityLevel::Bits128,
        SecurityLevel::Bits192,
        SecurityLevel::Bits256,
    ];

    /// Strength in bits, as accepted by [`get_parameter`].
    pub const fn bits(self) -> u16 {
        match self {
            SecurityLevel::Bits112 => 112,
            SecurityLevel::Bits128 => 128,
            SecurityLevel::Bits192 => 192,
            SecurityLevel::Bits256 => 256,
        }
    }
}

impl TryFrom<u16> for SecurityLevel {
    type Error = NtruError;

    fn try_from(bits: u16) -> NtruResult<Self> {
        match bits {
            112 => Ok(SecurityLevel::Bits112),
            128 => Ok(SecurityLevel::Bits128),
            192 => Ok(SecurityLevel::Bits192),
            256 => Ok(SecurityLevel::Bits256),
            other => Err(NtruError::InvalidSecurityLevel(other)),
        }
    }
}

/// Maps a family and strength to its parameter set. Total over both enums.
pub const fn resolve(key_type: KeyType, level: SecurityLevel) -> EncryptParamSet {
    use EncryptParamSet as P;
    use SecurityLevel as L;

    match (key_type, level) {
        (KeyType::Product, L::Bits112) => P::Ees401Ep2,
        (KeyType::Product, L::Bits128) => P::Ees439Ep1,
        (KeyType::Product, L::Bits192) => P::Ees593Ep1,
        (KeyType::Product, L::Bits256) => P::Ees743Ep1,
        (KeyType::Size, L::Bits112) => P::Ees401Ep1,
        (KeyType::Size, L::Bits128) => P::Ees449Ep1,
        (KeyType::Size, L::Bits192) => P::Ees677Ep1,
        (KeyType::Size, L::Bits256) => P::Ees1087Ep2,
        (KeyType::Balanced, L::Bits112) => P::Ees541Ep1,
        (KeyType::Balanced, L::Bits128) => P::Ees613Ep1,
        (KeyType::Balanced, L::Bits192) => P::Ees887Ep1,
        (KeyType::Balanced, L::Bits256) => P::Ees1171Ep1,
        (KeyType::Speed, L::Bits112) => P::Ees659Ep1,
        (KeyType::Speed, L::Bits128) => P::Ees761Ep1,
        (KeyType::Speed, L::Bits192) => P::Ees1087Ep1,
        (KeyType::Speed, L::Bits256) => P::Ees1499Ep1,
    }
}

/// Finds the parameter set for `key_type` at `key_size` bits of security.
///
/// # Errors
///
/// Returns [`NtruError::InvalidSecurityLevel`] if `key_size` is not one of
/// [`SECURITY_LEVELS`].
pub fn get_parameter(key_type: KeyType, key_size: u16) -> NtruResult<EncryptParamSet> {
    let level = SecurityLevel::try_from(key_size)?;
    Ok(resolve(key_type, level))
}
