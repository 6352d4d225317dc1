// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::configuration::SymbolResolution;
use crate::logger::TraceLogger;
#[cfg(unix)]
use crate::sig_info::{fault_address, SignalNames};
use crate::symbolize::{resolve_symbol, FixedSizeWriter, SymbolBuffer, SYMBOL_BUF_CAPACITY};
#[cfg(unix)]
use crate::walker::walk_stack_from_context;
use crate::walker::walk_stack;
use std::fmt::Write;

/// Maximum number of frames a capture retains.
pub const MAX_STACK_DEPTH: usize = 64;

/// Room for the `#NN: ` prefix in front of a symbol that fills the symbol
/// buffer, so a name that resolved never gets dropped at the line stage.
const LINE_BUF_CAPACITY: usize = SYMBOL_BUF_CAPACITY + 16;

/// Captures a stack trace into a fixed-size buffer and renders it to the
/// injected log sink with resolved symbols.
///
/// ```no_run
/// use libdd_backtrace::{StackTracer, TracingLogger};
///
/// let mut tracer = StackTracer::new(TracingLogger);
/// tracer.capture(); // trace is captured as of here
/// tracer.log_trace(); // emit the captured trace to the log
/// ```
///
/// The capture and log steps are separated so a trace can be captured
/// inside some logic before knowing whether it is worth logging. For the
/// one-shot case see [`log_backtrace`].
///
/// If a frame's address cannot be resolved to a symbol, the raw address is
/// printed instead.
///
/// A single instance must not be captured-to and logged-from concurrently;
/// there is no internal synchronization. The frame buffer is part of the
/// instance and captures perform no heap allocation, so `capture_from` is
/// usable inside a fatal-signal handler.
pub struct StackTracer<L> {
    logger: L,
    resolution: SymbolResolution,
    frames: [usize; MAX_STACK_DEPTH],
    depth: usize,
}

impl<L: TraceLogger> StackTracer<L> {
    /// A tracer with nothing captured; symbols resolve by default.
    pub fn new(logger: L) -> Self {
        Self::with_resolution(logger, SymbolResolution::default())
    }

    pub fn with_resolution(logger: L, resolution: SymbolResolution) -> Self {
        Self {
            logger,
            resolution,
            frames: [0; MAX_STACK_DEPTH],
            depth: 0,
        }
    }

    /// Number of frames held by the last capture.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The injected log sink.
    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Capture a stack trace, overwriting any previous capture.
    ///
    /// The trace begins with the caller of `capture`.
    #[inline(never)]
    pub fn capture(&mut self) {
        // A skip of one excludes the innermost frame, which is the call to
        // capture() itself.
        // SAFETY: instances are not shared across threads (documented on
        // the type), so no other walk races this one.
        self.depth = unsafe { walk_stack(&mut self.frames, 1) };
    }

    /// Capture a stack trace from a particular context, overwriting any
    /// previous capture.
    ///
    /// This can be used to capture a useful stack trace from a fatal
    /// signal handler; the frames introduced by the handler itself are
    /// discarded.
    ///
    /// PRECONDITIONS:
    ///     `ucontext` is the context delivered to a handler registered via
    ///     a sigaction struct with `SA_SIGINFO`.
    /// SAFETY:
    ///     The pointer must be valid for the duration of the call; an
    ///     invalid pointer is undefined behavior, not a checked error.
    /// SIGNAL SAFETY:
    ///     Only frame addresses are collected. No allocation, locking, or
    ///     symbol resolution happens on this path.
    #[cfg(unix)]
    pub unsafe fn capture_from(&mut self, ucontext: *const libc::ucontext_t) {
        self.depth = walk_stack_from_context(&mut self.frames, ucontext);
    }

    /// Log the captured trace: a `Backtrace:` header, then one critical
    /// line per frame.
    ///
    /// Frames whose address resolves are logged as `#i: <symbol>`, the rest
    /// as `#i: <address>`. Resolution failures are not surfaced; called
    /// before any capture this logs the header with no frames.
    pub fn log_trace(&self) {
        self.logger.log_critical("Backtrace:");

        let mut symbol = SymbolBuffer::new();
        let mut line = FixedSizeWriter::<LINE_BUF_CAPACITY>::new();
        for (i, &addr) in self.frames[..self.depth].iter().enumerate() {
            let resolved = self.resolution == SymbolResolution::Enabled
                // SAFETY: instances are not shared across threads, so no
                // other resolution races this one.
                && unsafe { resolve_symbol(addr, &mut symbol) };
            line.clear();
            if resolved {
                let _ = write!(line, "#{i}: {}", symbol.as_str());
            } else {
                let _ = write!(line, "#{i}: {addr:#x}");
            }
            self.logger.log_critical(line.as_str());
        }
    }

    /// Log a single line identifying a caught signal and the address
    /// suspected to have caused the fault.
    pub fn log_fault(&self, signame: &str, addr: usize) {
        let mut line = FixedSizeWriter::<LINE_BUF_CAPACITY>::new();
        let _ = write!(line, "Caught {signame}, suspect faulting address {addr:#x}");
        self.logger.log_critical(line.as_str());
    }

    /// Log a fault line straight from the `siginfo_t` a handler received,
    /// deriving the signal name and the fault address. Signals that do not
    /// fill `si_addr` log the name alone.
    ///
    /// SAFETY:
    ///     `sig_info` must point to a valid `siginfo_t` for the duration of
    ///     the call.
    #[cfg(unix)]
    pub unsafe fn log_fault_from(&self, sig_info: *const libc::siginfo_t) {
        let signame = SignalNames::from((*sig_info).si_signo);
        let mut line = FixedSizeWriter::<LINE_BUF_CAPACITY>::new();
        match fault_address(sig_info) {
            Some(addr) => {
                let _ = write!(line, "Caught {signame:?}, suspect faulting address {addr:#x}");
            }
            None => {
                let _ = write!(line, "Caught {signame:?}");
            }
        }
        self.logger.log_critical(line.as_str());
    }
}

/// Construct, capture, and log in one shot.
#[inline(never)]
pub fn log_backtrace<L: TraceLogger>(logger: L) {
    let mut tracer = StackTracer::new(logger);
    tracer.capture();
    tracer.log_trace();
}
