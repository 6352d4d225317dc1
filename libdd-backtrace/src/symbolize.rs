// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Fixed-capacity symbolization for captured frame addresses.

use std::ffi::c_void;
use std::fmt::{self, Write};

/// Capacity of the per-symbol output buffer. Names that do not fit are
/// treated the same as resolution failures.
pub const SYMBOL_BUF_CAPACITY: usize = 1024;

pub(crate) type SymbolBuffer = FixedSizeWriter<SYMBOL_BUF_CAPACITY>;

/// A `fmt::Write` over a stack-allocated buffer. Writes that would overflow
/// the capacity fail instead of allocating.
pub(crate) struct FixedSizeWriter<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> FixedSizeWriter<N> {
    pub(crate) const fn new() -> Self {
        Self { buf: [0u8; N], len: 0 }
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn as_str(&self) -> &str {
        // Writes are accepted whole or rejected whole, so the buffer only
        // ever holds complete UTF-8 chunks.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

impl<const N: usize> fmt::Write for FixedSizeWriter<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if self.len + bytes.len() > N {
            return Err(fmt::Error);
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }
}

/// Resolve `addr` to a demangled symbol name written into `out`.
///
/// Returns `false` when the address has no known symbol or the name does
/// not fit the buffer; `out` contents are unspecified on failure. For
/// addresses inside inlined code, the innermost symbol wins.
///
/// SIGNAL SAFETY:
///     Resolution reads loaded-module symbol tables in process and is not
///     guaranteed allocation-free
///     (<https://github.com/rust-lang/backtrace-rs/issues/414>). Callers
///     that consider this too risky during a crash downgrade via
///     [`crate::SymbolResolution::Disabled`].
/// SAFETY:
///     Must not run concurrently with another resolution on the same
///     thread; the tracer guarantees this by not being shared across
///     threads.
pub(crate) unsafe fn resolve_symbol(addr: usize, out: &mut SymbolBuffer) -> bool {
    let mut resolved = false;
    backtrace::resolve_unsynchronized(addr as *mut c_void, |symbol| {
        if resolved {
            return;
        }
        out.clear();
        if let Some(name) = symbol.name() {
            resolved = write!(out, "{name}").is_ok() && !out.is_empty();
        }
    });
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_rejects_overflowing_writes() {
        let mut w = FixedSizeWriter::<4>::new();
        assert!(write!(w, "hi").is_ok());
        assert!(write!(w, "more").is_err());
        // The rejected write leaves the earlier content intact.
        assert_eq!(w.as_str(), "hi");
        w.clear();
        assert!(w.is_empty());
        assert!(write!(w, "full").is_ok());
        assert_eq!(w.as_str(), "full");
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn resolves_own_function() {
        let mut out = SymbolBuffer::new();
        // A function pointer lands inside this test's symbol.
        let addr = resolves_own_function as usize;
        // SAFETY: single-threaded test, no concurrent resolution.
        let resolved = unsafe { resolve_symbol(addr, &mut out) };
        assert!(resolved);
        assert!(!out.as_str().is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn unmapped_address_fails() {
        let mut out = SymbolBuffer::new();
        // SAFETY: single-threaded test, no concurrent resolution.
        let resolved = unsafe { resolve_symbol(usize::MAX, &mut out) };
        assert!(!resolved);
    }
}
