// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! End-to-end capture from a real signal context: install an SA_SIGINFO
//! handler, raise, and capture the interrupted stack from the delivered
//! `ucontext_t`.

#![cfg(unix)]

use libdd_backtrace::{BufferLogger, StackTracer, MAX_STACK_DEPTH};
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::ptr;
use std::sync::atomic::AtomicPtr;
use std::sync::atomic::Ordering::SeqCst;

// The handler reaches the tracer through an atomic pointer: mutexes are not
// allowed inside a signal handler.
static TRACER: AtomicPtr<StackTracer<BufferLogger>> = AtomicPtr::new(ptr::null_mut());

extern "C" fn handle_sigusr1(
    _signum: libc::c_int,
    sig_info: *mut libc::siginfo_t,
    ucontext: *mut libc::c_void,
) {
    let tracer = TRACER.load(SeqCst);
    if !tracer.is_null() {
        // SAFETY: the pointers are handed to us by the kernel for the
        // duration of the handler, and the tracer outlives the test.
        unsafe {
            (*tracer).capture_from(ucontext as *const libc::ucontext_t);
            (*tracer).log_fault_from(sig_info);
        }
    }
}

#[test]
fn capture_from_signal_context_is_bounded() {
    let tracer = Box::into_raw(Box::new(StackTracer::new(BufferLogger::new())));
    TRACER.store(tracer, SeqCst);

    let action = SigAction::new(
        SigHandler::SigAction(handle_sigusr1),
        SaFlags::SA_SIGINFO,
        SigSet::empty(),
    );
    // SAFETY: installing a handler for a signal nothing else in this test
    // binary uses.
    unsafe { signal::sigaction(Signal::SIGUSR1, &action).expect("sigaction") };
    signal::raise(Signal::SIGUSR1).expect("raise");

    // The handler has run synchronously by the time raise returns.
    let tracer = TRACER.swap(ptr::null_mut(), SeqCst);
    // SAFETY: the pointer came from Box::into_raw above and the handler can
    // no longer observe it.
    let tracer = unsafe { Box::from_raw(tracer) };

    assert!(tracer.depth() > 0);
    assert!(tracer.depth() <= MAX_STACK_DEPTH);

    tracer.log_trace();
    let lines = tracer.logger().lines();
    // One fault line from the handler, then the header and one line per
    // captured frame.
    assert_eq!(lines.len(), 1 + tracer.depth() + 1);
    assert!(lines[0].contains("SIGUSR1"));
    assert_eq!(lines[1], "Backtrace:");
}
