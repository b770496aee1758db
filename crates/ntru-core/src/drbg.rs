// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, warn};

use crate::bridge;
use crate::engine::{self, DrbgHandle, Engine, RandBytesFn};
use crate::error::{translate, NtruError, NtruResult, Subsystem};
use crate::key::{KeyPair, PrivateKey, PublicKey};
use crate::params::{get_parameter, EncryptParamSet, KeyType};

/// Default entropy callback backed by the operating system RNG.
pub extern "C" fn os_random_bytes(out: *mut u8, num_bytes: u32) -> u32 {
    if out.is_null() {
        return 1;
    }
    let Ok(len) = usize::try_from(num_bytes) else {
        return 1;
    };
    // SAFETY: the engine passes a writable buffer of `num_bytes` bytes and
    // does not touch it until the callback returns.
    let buf = unsafe { std::slice::from_raw_parts_mut(out, len) };
    match OsRng.try_fill_bytes(buf) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// A DRBG instance inside the engine, used as the random source for key
/// generation and encryption.
///
/// The handle is released exactly once: either explicitly through
/// [`RandomSource::destroy`], which consumes the value, or on drop.
/// A `RandomSource` can move between threads but cannot be shared by them;
/// callers that need one source on several threads wrap it in a lock.
pub struct RandomSource {
    engine: Arc<dyn Engine>,
    handle: DrbgHandle,
    released: bool,
    _not_sync: PhantomData<Cell<()>>,
}

impl RandomSource {
    /// Instantiates a DRBG on the process-wide engine, seeded from the OS RNG.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NtruError::EngineUnavailable`] if no engine is
    /// installed, or the translated DRBG failure.
    pub fn new() -> NtruResult<Self> {
        Self::with_engine(engine::current()?, os_random_bytes)
    }

    /// Instantiates a DRBG on `engine`, seeded by `rand_bytes`.
    ///
    /// # Errors
    ///
    /// Returns the translated DRBG failure, e.g.
    /// [`crate::DrbgError::NoInstantiationSlotAvailable`].
    pub fn with_engine(engine: Arc<dyn Engine>, rand_bytes: RandBytesFn) -> NtruResult<Self> {
        let mut handle: DrbgHandle = 0;
        translate(engine.drbg_instantiate(rand_bytes, &mut handle), Subsystem::Drbg)?;
        debug!(handle, "instantiated DRBG");
        Ok(Self {
            engine,
            handle,
            released: false,
            _not_sync: PhantomData,
        })
    }

    /// Raw handle as known to the engine.
    pub fn handle(&self) -> DrbgHandle {
        self.handle
    }

    /// Engine that owns the handle.
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Generates a key pair under `params`, using this source for randomness.
    pub fn create_keys(&self, params: EncryptParamSet) -> NtruResult<KeyPair> {
        let (public_key, private_key) =
            bridge::generate_key_pair(self.engine.as_ref(), self.handle, params.id())?;
        debug!(%params, drbg = self.handle, "generated key pair");
        Ok(KeyPair::new(
            PublicKey::from_binary(public_key, Some(params))?,
            PrivateKey::from_binary(private_key, Some(params))?,
        ))
    }

    /// Generates a key pair for the parameter set selected by `key_type` and
    /// `key_size` bits of security.
    pub fn create_keys_for(&self, key_type: KeyType, key_size: u16) -> NtruResult<KeyPair> {
        self.create_keys(get_parameter(key_type, key_size)?)
    }

    /// Releases the handle.
    ///
    /// # Errors
    ///
    /// Returns the translated DRBG failure. The handle is considered released
    /// either way and is not retried on drop.
    pub fn destroy(mut self) -> NtruResult<()> {
        self.release()
    }

    fn release(&mut self) -> NtruResult<()> {
        debug_assert!(!self.released, "DRBG handle {} released twice", self.handle);
        self.released = true;
        translate(self.engine.drbg_uninstantiate(self.handle), Subsystem::Drbg)?;
        debug!(handle = self.handle, "released DRBG");
        Ok(())
    }
}

impl Drop for RandomSource {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.release() {
            warn!(handle = self.handle, %err, "failed to release DRBG on drop");
        }
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomSource")
            .field("handle", &self.handle)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

static DEFAULT_SOURCE: ReentrantMutex<RefCell<Option<RandomSource>>> =
    parking_lot::const_reentrant_mutex(RefCell::new(None));

/// Runs `f` with the process-wide default random source, instantiating it on
/// the process-wide engine at first use.
///
/// The lock is held for the duration of `f`, which serializes every use of
/// the default source across threads. The lock is reentrant: inside `f` the
/// same thread may keep using the default source (for example
/// `PublicKey::encrypt(data, None)` or [`crate::create_keys`]), but calling
/// [`release_default_source`] there fails with
/// [`NtruError::DefaultSourceBusy`].
///
/// # Errors
///
/// Returns [`NtruError::DefaultSourceBusy`] if the source would have to be
/// created while the calling thread is already releasing it, the failure to
/// create the source, or whatever `f` returns.
pub fn with_default_source<T, F>(f: F) -> NtruResult<T>
where
    F: FnOnce(&RandomSource) -> NtruResult<T>,
{
    let slot = DEFAULT_SOURCE.lock();
    let missing = slot
        .try_borrow()
        .map_err(|_| NtruError::DefaultSourceBusy)?
        .is_none();
    if missing {
        let source = RandomSource::new()?;
        debug!(handle = source.handle(), "created default random source");
        *slot
            .try_borrow_mut()
            .map_err(|_| NtruError::DefaultSourceBusy)? = Some(source);
    }
    let cell = slot.try_borrow().map_err(|_| NtruError::DefaultSourceBusy)?;
    let source =
        Ref::filter_map(cell, Option::as_ref).map_err(|_| NtruError::DefaultSourceBusy)?;
    f(&source)
}

/// Releases the default random source if one was created.
///
/// A later call to [`with_default_source`] creates a fresh one.
///
/// # Errors
///
/// Returns [`NtruError::DefaultSourceBusy`] when called from inside
/// [`with_default_source`] on the same thread, otherwise the translated DRBG
/// failure.
pub fn release_default_source() -> NtruResult<()> {
    let slot = DEFAULT_SOURCE.lock();
    let taken = slot
        .try_borrow_mut()
        .map_err(|_| NtruError::DefaultSourceBusy)?
        .take();
    match taken {
        Some(source) => source.destroy(),
        None => Ok(()),
    }
}
