// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

//! A simulated NTRUEncrypt engine for exercising `ntru-core` without the
//! native library.
//!
//! [`SimulatedEngine`] follows the native calling convention: a `None` output
//! buffer is a sizing request, a buffer smaller than the advertised need is
//! answered with "buffer too small", key blobs carry the tag/OID header, and
//! DRBG handles come from a bounded slot table. Faults can be injected per
//! operation and phase to drive the error paths of the bridge.

pub mod entropy;
pub mod layout;

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use ntru_core::engine::{self, DrbgHandle, Engine, RandBytesFn};
use ntru_core::error::{DrbgError, EngineError, STATUS_OK};
use ntru_core::EncryptParamSet;

use layout::{Secret, NONCE_LENGTH, SECRET_LENGTH};

/// Foreign operations, as named in fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Instantiate,
    Uninstantiate,
    Keygen,
    PublicKeyToDer,
    DerToPublicKey,
    Encrypt,
    Decrypt,
}

/// Which of the two negotiation calls a fault applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Output buffer absent. DRBG instantiate/uninstantiate only have this phase.
    Sizing,
    /// Output buffer present.
    Materializing,
}

/// A one-shot failure: the next matching call returns `status` untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub operation: Operation,
    pub phase: Phase,
    pub status: u32,
}

#[derive(Default)]
struct State {
    next_handle: DrbgHandle,
    live: HashMap<DrbgHandle, RandBytesFn>,
    releases: HashMap<DrbgHandle, u32>,
    invalid_releases: u32,
    faults: Vec<Fault>,
    overreport: Vec<Operation>,
}

/// In-process stand-in for `libntruencrypt`.
pub struct SimulatedEngine {
    state: Mutex<State>,
    max_instances: usize,
    sizing_buffer_too_small: bool,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEngine {
    /// Default size of the DRBG slot table.
    pub const DEFAULT_MAX_INSTANCES: usize = 256;

    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            max_instances: Self::DEFAULT_MAX_INSTANCES,
            sizing_buffer_too_small: false,
        }
    }

    /// Limits how many DRBG handles may be live at once.
    pub fn with_max_instances(mut self, max_instances: usize) -> Self {
        self.max_instances = max_instances;
        self
    }

    /// Makes sizing calls answer "buffer too small" instead of success.
    pub fn with_sizing_buffer_too_small(mut self) -> Self {
        self.sizing_buffer_too_small = true;
        self
    }

    /// Queues a one-shot fault.
    pub fn inject(&self, fault: Fault) {
        self.state.lock().faults.push(fault);
    }

    /// Makes the next materializing call of `operation` report one byte more
    /// than the buffer it was given.
    pub fn overreport_next(&self, operation: Operation) {
        self.state.lock().overreport.push(operation);
    }

    /// Number of successful releases of `handle`.
    pub fn releases(&self, handle: DrbgHandle) -> u32 {
        self.state.lock().releases.get(&handle).copied().unwrap_or(0)
    }

    /// Number of release attempts on handles that were not live.
    pub fn invalid_releases(&self) -> u32 {
        self.state.lock().invalid_releases
    }

    pub fn is_live(&self, handle: DrbgHandle) -> bool {
        self.state.lock().live.contains_key(&handle)
    }

    pub fn live_handles(&self) -> usize {
        self.state.lock().live.len()
    }

    fn take_fault(&self, operation: Operation, phase: Phase) -> Option<u32> {
        let mut state = self.state.lock();
        let at = state
            .faults
            .iter()
            .position(|f| f.operation == operation && f.phase == phase)?;
        Some(state.faults.remove(at).status)
    }

    fn take_overreport(&self, operation: Operation) -> bool {
        let mut state = self.state.lock();
        match state.overreport.iter().position(|&op| op == operation) {
            Some(at) => {
                state.overreport.remove(at);
                true
            }
            None => false,
        }
    }

    fn rand_bytes_for(&self, handle: DrbgHandle) -> Option<RandBytesFn> {
        self.state.lock().live.get(&handle).copied()
    }

    fn sizing_status(&self) -> u32 {
        if self.sizing_buffer_too_small {
            EngineError::BufferTooSmall.status()
        } else {
            STATUS_OK
        }
    }

    /// Writes `data` into the caller's buffer after a capacity check.
    fn deliver(&self, operation: Operation, data: &[u8], len: &mut u16, out: &mut [u8]) -> u32 {
        if usize::from(*len) < data.len() || out.len() < data.len() {
            return EngineError::BufferTooSmall.status();
        }
        out[..data.len()].copy_from_slice(data);
        *len = data.len() as u16;
        if self.take_overreport(operation) {
            *len = (out.len() as u16).saturating_add(1);
        }
        STATUS_OK
    }
}

fn phase_of(out: &Option<&mut [u8]>) -> Phase {
    if out.is_some() {
        Phase::Materializing
    } else {
        Phase::Sizing
    }
}

fn draw(rand_bytes: RandBytesFn, buf: &mut [u8]) -> Result<(), u32> {
    match rand_bytes(buf.as_mut_ptr(), buf.len() as u32) {
        0 => Ok(()),
        _ => Err(DrbgError::EntropyFunctionFailure.status()),
    }
}

impl Engine for SimulatedEngine {
    fn drbg_instantiate(&self, rand_bytes: RandBytesFn, handle: &mut DrbgHandle) -> u32 {
        if let Some(status) = self.take_fault(Operation::Instantiate, Phase::Sizing) {
            return status;
        }
        if self.live_handles() >= self.max_instances {
            return DrbgError::NoInstantiationSlotAvailable.status();
        }
        let mut seed = [0u8; SECRET_LENGTH];
        if let Err(status) = draw(rand_bytes, &mut seed) {
            return status;
        }
        let mut state = self.state.lock();
        state.next_handle = state.next_handle.wrapping_add(1);
        let fresh = state.next_handle;
        state.live.insert(fresh, rand_bytes);
        *handle = fresh;
        STATUS_OK
    }

    fn drbg_uninstantiate(&self, handle: DrbgHandle) -> u32 {
        if let Some(status) = self.take_fault(Operation::Uninstantiate, Phase::Sizing) {
            return status;
        }
        let mut state = self.state.lock();
        if state.live.remove(&handle).is_none() {
            state.invalid_releases += 1;
            return DrbgError::NullPointer.status();
        }
        *state.releases.entry(handle).or_insert(0) += 1;
        STATUS_OK
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
        let phase = if public_key.is_some() && private_key.is_some() {
            Phase::Materializing
        } else {
            Phase::Sizing
        };
        if let Some(status) = self.take_fault(Operation::Keygen, phase) {
            return status;
        }
        let Some(rand_bytes) = self.rand_bytes_for(drbg) else {
            return DrbgError::NullPointer.status();
        };
        let Some(params) = EncryptParamSet::from_id(param_set_id) else {
            return EngineError::InvalidParameterSet.status();
        };
        let (Some(pk_out), Some(sk_out)) = (public_key, private_key) else {
            *public_key_len = layout::public_key_length(params) as u16;
            *private_key_len = layout::private_key_length(params) as u16;
            return self.sizing_status();
        };

        let mut secret: Secret = [0u8; SECRET_LENGTH];
        if let Err(status) = draw(rand_bytes, &mut secret) {
            return status;
        }
        let pk = layout::encode_public_key(params, &secret);
        let sk = layout::encode_private_key(params, &secret);
        if usize::from(*private_key_len) < sk.len() || sk_out.len() < sk.len() {
            return EngineError::BufferTooSmall.status();
        }
        match self.deliver(Operation::Keygen, &pk, public_key_len, pk_out) {
            STATUS_OK => {}
            status => return status,
        }
        sk_out[..sk.len()].copy_from_slice(&sk);
        *private_key_len = sk.len() as u16;
        STATUS_OK
    }

    fn public_key_to_der(&self, public_key: &[u8], der_len: &mut u16, der: Option<&mut [u8]>) -> u32 {
        if let Some(status) = self.take_fault(Operation::PublicKeyToDer, phase_of(&der)) {
            return status;
        }
        if let Err(err) = layout::decode_public_key(public_key) {
            return err.status();
        }
        let encoded = layout::encode_spki(public_key);
        match der {
            None => {
                *der_len = encoded.len() as u16;
                self.sizing_status()
            }
            Some(out) => self.deliver(Operation::PublicKeyToDer, &encoded, der_len, out),
        }
    }

    fn der_to_public_key(
        &self,
        der: &[u8],
        public_key_len: &mut u16,
        public_key: Option<&mut [u8]>,
    ) -> u32 {
        if let Some(status) = self.take_fault(Operation::DerToPublicKey, phase_of(&public_key)) {
            return status;
        }
        let blob = match layout::decode_spki(der) {
            Ok(blob) => blob,
            Err(err) => return err.status(),
        };
        if let Err(err) = layout::decode_public_key(blob) {
            return err.status();
        }
        match public_key {
            None => {
                *public_key_len = blob.len() as u16;
                self.sizing_status()
            }
            Some(out) => self.deliver(Operation::DerToPublicKey, blob, public_key_len, out),
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
        if let Some(status) = self.take_fault(Operation::Encrypt, phase_of(&ciphertext)) {
            return status;
        }
        let Some(rand_bytes) = self.rand_bytes_for(drbg) else {
            return DrbgError::NullPointer.status();
        };
        let (params, secret) = match layout::decode_public_key(public_key) {
            Ok(decoded) => decoded,
            Err(err) => return err.status(),
        };
        if plaintext.len() > params.max_message_len() {
            return EngineError::BadLength.status();
        }
        let Some(out) = ciphertext else {
            *ciphertext_len = layout::ciphertext_length(params) as u16;
            return self.sizing_status();
        };

        let mut nonce = [0u8; NONCE_LENGTH];
        if let Err(status) = draw(rand_bytes, &mut nonce) {
            return status;
        }
        let sealed = layout::seal(params, &secret, &nonce, plaintext);
        self.deliver(Operation::Encrypt, &sealed, ciphertext_len, out)
    }

    fn decrypt(
        &self,
        private_key: &[u8],
        ciphertext: &[u8],
        plaintext_len: &mut u16,
        plaintext: Option<&mut [u8]>,
    ) -> u32 {
        if let Some(status) = self.take_fault(Operation::Decrypt, phase_of(&plaintext)) {
            return status;
        }
        let (params, secret) = match layout::decode_private_key(private_key) {
            Ok(decoded) => decoded,
            Err(err) => return err.status(),
        };
        if ciphertext.len() != layout::ciphertext_length(params) {
            return EngineError::BadLength.status();
        }
        let max = params.max_message_len();
        let Some(out) = plaintext else {
            *plaintext_len = max as u16;
            return self.sizing_status();
        };
        if usize::from(*plaintext_len) < max || out.len() < max {
            return EngineError::BufferTooSmall.status();
        }
        match layout::open(params, &secret, ciphertext) {
            Ok(msg) => self.deliver(Operation::Decrypt, &msg, plaintext_len, out),
            Err(err) => err.status(),
        }
    }
}

static SHARED: Lazy<Arc<SimulatedEngine>> = Lazy::new(|| Arc::new(SimulatedEngine::new()));

/// Installs the shared simulated engine as the process-wide engine and
/// returns it for inspection. Idempotent.
///
/// # Panics
///
/// Panics if a different engine was installed first.
pub fn install() -> Arc<SimulatedEngine> {
    let shared = Arc::clone(&SHARED);
    let installed = engine::get_or_install(|| Arc::clone(&shared) as Arc<dyn Engine>);
    assert!(
        Arc::as_ptr(&installed).cast::<()>() == Arc::as_ptr(&shared).cast::<()>(),
        "another engine is already installed"
    );
    shared
}
