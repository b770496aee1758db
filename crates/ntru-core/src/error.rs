// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

use std::fmt;

use thiserror::Error;

/// Base offset of DRBG status codes.
pub const DRBG_ERROR_BASE: u32 = 0x0000_0a00;
/// Base offset of NTRUEncrypt core status codes.
pub const NTRU_ERROR_BASE: u32 = 0x0000_3000;

/// Status returned by every engine entry point on success.
pub const STATUS_OK: u32 = 0;

/// Engine subsystem that owns a status code space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// NTRUEncrypt key generation, encryption, decryption and encoding.
    Ntru,
    /// Deterministic random bit generator.
    Drbg,
}

impl Subsystem {
    /// Returns the offset that this subsystem adds to its raw codes.
    pub const fn base(self) -> u32 {
        match self {
            Subsystem::Ntru => NTRU_ERROR_BASE,
            Subsystem::Drbg => DRBG_ERROR_BASE,
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsystem::Ntru => f.write_str("ntru"),
            Subsystem::Drbg => f.write_str("drbg"),
        }
    }
}

/// Failures reported by the NTRUEncrypt core (codes `NTRU_ERROR_BASE + 1..=11`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineError {
    #[error("Fail")]
    Fail,
    #[error("Bad parameter")]
    BadParameter,
    #[error("Bad length")]
    BadLength,
    #[error("Buffer too small")]
    BufferTooSmall,
    #[error("Invalid parameter set")]
    InvalidParameterSet,
    #[error("Bad public key")]
    BadPublicKey,
    #[error("Bad private key")]
    BadPrivateKey,
    #[error("Out of memory")]
    OutOfMemory,
    #[error("Bad encoding")]
    BadEncoding,
    #[error("OID not recognized")]
    OidNotRecognized,
    #[error("Unsupported parameter set")]
    UnsupportedParameterSet,
}

impl EngineError {
    /// Maps a code with the subsystem base already removed.
    pub const fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => EngineError::Fail,
            2 => EngineError::BadParameter,
            3 => EngineError::BadLength,
            4 => EngineError::BufferTooSmall,
            5 => EngineError::InvalidParameterSet,
            6 => EngineError::BadPublicKey,
            7 => EngineError::BadPrivateKey,
            8 => EngineError::OutOfMemory,
            9 => EngineError::BadEncoding,
            10 => EngineError::OidNotRecognized,
            11 => EngineError::UnsupportedParameterSet,
            _ => return None,
        })
    }

    /// Raw code without the subsystem base.
    pub const fn code(self) -> u32 {
        match self {
            EngineError::Fail => 1,
            EngineError::BadParameter => 2,
            EngineError::BadLength => 3,
            EngineError::BufferTooSmall => 4,
            EngineError::InvalidParameterSet => 5,
            EngineError::BadPublicKey => 6,
            EngineError::BadPrivateKey => 7,
            EngineError::OutOfMemory => 8,
            EngineError::BadEncoding => 9,
            EngineError::OidNotRecognized => 10,
            EngineError::UnsupportedParameterSet => 11,
        }
    }

    /// Status code as the engine returns it.
    pub const fn status(self) -> u32 {
        NTRU_ERROR_BASE + self.code()
    }
}

/// Failures reported by the DRBG (codes `DRBG_ERROR_BASE + 1..=5`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrbgError {
    #[error("Out of memory")]
    OutOfMemory,
    #[error("Null pointer")]
    NullPointer,
    #[error("Invalid number of bytes")]
    InvalidNumberOfBytes,
    #[error("No instantiation slot available")]
    NoInstantiationSlotAvailable,
    #[error("Entropy function failure")]
    EntropyFunctionFailure,
}

impl DrbgError {
    /// Maps a code with the subsystem base already removed.
    pub const fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => DrbgError::OutOfMemory,
            2 => DrbgError::NullPointer,
            3 => DrbgError::InvalidNumberOfBytes,
            4 => DrbgError::NoInstantiationSlotAvailable,
            5 => DrbgError::EntropyFunctionFailure,
            _ => return None,
        })
    }

    /// Raw code without the subsystem base.
    pub const fn code(self) -> u32 {
        match self {
            DrbgError::OutOfMemory => 1,
            DrbgError::NullPointer => 2,
            DrbgError::InvalidNumberOfBytes => 3,
            DrbgError::NoInstantiationSlotAvailable => 4,
            DrbgError::EntropyFunctionFailure => 5,
        }
    }

    /// Status code as the engine returns it.
    pub const fn status(self) -> u32 {
        DRBG_ERROR_BASE + self.code()
    }
}

/// Enumerates every error the binding layer can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NtruError {
    /// The requested security level is not one of 112, 128, 192 or 256 bits.
    #[error("invalid security level: {0} (expected one of 112, 128, 192, 256)")]
    InvalidSecurityLevel(u16),
    /// The input is longer than the operation accepts.
    #[error("input too large: {len} bytes (max {max})")]
    InputTooLarge {
        /// Length of the rejected input.
        len: usize,
        /// Largest accepted length.
        max: usize,
    },
    /// No parameter set in the catalog carries this OID.
    #[error("OID {:02x}{:02x}{:02x} not recognized", .0[0], .0[1], .0[2])]
    UnknownOid([u8; 3]),
    /// A key blob is too short or its OID header is malformed.
    #[error("malformed key blob ({len} bytes)")]
    MalformedKey {
        /// Length of the rejected blob.
        len: usize,
    },
    /// The NTRUEncrypt core reported a failure.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    /// The DRBG reported a failure.
    #[error("random source error: {0}")]
    Drbg(#[from] DrbgError),
    /// The engine returned a status outside the table of its subsystem.
    #[error("unrecognized {subsystem} status {code:#06x}")]
    UnknownStatus {
        /// Subsystem whose table was consulted.
        subsystem: Subsystem,
        /// Raw status as returned by the engine.
        code: u32,
    },
    /// The engine reported an output length larger than the buffer it was given.
    #[error("engine reported {reported} bytes for a {capacity}-byte buffer")]
    LengthMismatch {
        /// Length written back by the engine.
        reported: u16,
        /// Capacity of the buffer handed to the engine.
        capacity: u16,
    },
    /// No engine has been installed for this process.
    #[error("no NTRU engine installed")]
    EngineUnavailable,
    /// A process-wide engine is already installed.
    #[error("an NTRU engine is already installed")]
    EngineAlreadyInstalled,
    /// The default random source cannot be replaced or released from
    /// inside [`crate::with_default_source`] on the same thread.
    #[error("default random source is in use on this thread")]
    DefaultSourceBusy,
}

/// Convenience alias for `Result<T, NtruError>`.
pub type NtruResult<T> = Result<T, NtruError>;

/// Translates a raw engine status within a single subsystem's code space.
///
/// `0` is success. Codes in the subsystem's table become [`NtruError::Engine`]
/// or [`NtruError::Drbg`]; anything else is [`NtruError::UnknownStatus`].
pub fn translate(code: u32, subsystem: Subsystem) -> NtruResult<()> {
    translate_any(code, &[subsystem])
}

/// Translates a status that may come from any of `subsystems`.
///
/// Operations that drive a DRBG internally (key generation, encryption) can
/// surface DRBG failures as well as core failures. The first subsystem listed
/// is named in [`NtruError::UnknownStatus`] when no table matches.
pub fn translate_any(code: u32, subsystems: &[Subsystem]) -> NtruResult<()> {
    if code == STATUS_OK {
        return Ok(());
    }
    for &subsystem in subsystems {
        let Some(offset) = code.checked_sub(subsystem.base()) else {
            continue;
        };
        let known = match subsystem {
            Subsystem::Ntru => EngineError::from_code(offset).map(NtruError::Engine),
            Subsystem::Drbg => DrbgError::from_code(offset).map(NtruError::Drbg),
        };
        if let Some(err) = known {
            return Err(err);
        }
    }
    Err(NtruError::UnknownStatus {
        subsystem: subsystems.first().copied().unwrap_or(Subsystem::Ntru),
        code,
    })
}
