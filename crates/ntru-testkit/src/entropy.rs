// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — NTRUEncrypt Bindings
// Licensed under the MIT License

//! Entropy callbacks with predictable behaviour.

use std::sync::atomic::{AtomicU32, Ordering};

static COUNTER: AtomicU32 = AtomicU32::new(1);

/// Fills the buffer from a process-wide counter. Never fails, never repeats
/// a byte sequence within a run.
pub extern "C" fn counter_random_bytes(out: *mut u8, num_bytes: u32) -> u32 {
    if out.is_null() {
        return 1;
    }
    let start = COUNTER.fetch_add(num_bytes.max(1), Ordering::Relaxed);
    // SAFETY: the engine hands over a writable buffer of `num_bytes` bytes.
    let buf = unsafe { std::slice::from_raw_parts_mut(out, num_bytes as usize) };
    for (i, byte) in buf.iter_mut().enumerate() {
        let word = start.wrapping_add(i as u32).wrapping_mul(0x9e37_79b9);
        *byte = (word >> 24) as u8;
    }
    0
}

/// Always reports failure.
pub extern "C" fn failing_random_bytes(_out: *mut u8, _num_bytes: u32) -> u32 {
    1
}
