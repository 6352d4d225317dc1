// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Signal metadata for fault logging.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
#[repr(C)]
/// See <https://man7.org/linux/man-pages/man7/signal.7.html>
pub enum SignalNames {
    SIGHUP,
    SIGINT,
    SIGQUIT,
    SIGILL,
    SIGTRAP,
    SIGABRT,
    SIGBUS,
    SIGFPE,
    SIGKILL,
    SIGUSR1,
    SIGSEGV,
    SIGUSR2,
    SIGPIPE,
    SIGALRM,
    SIGTERM,
    SIGCHLD,
    SIGCONT,
    SIGSTOP,
    SIGTSTP,
    SIGTTIN,
    SIGTTOU,
    SIGURG,
    SIGXCPU,
    SIGXFSZ,
    SIGVTALRM,
    SIGPROF,
    SIGWINCH,
    SIGIO,
    SIGSYS,
    SIGEMT,
    SIGINFO,
    UNKNOWN,
}

impl From<libc::c_int> for SignalNames {
    fn from(value: libc::c_int) -> Self {
        match value {
            libc::SIGHUP => SignalNames::SIGHUP,
            libc::SIGINT => SignalNames::SIGINT,
            libc::SIGQUIT => SignalNames::SIGQUIT,
            libc::SIGILL => SignalNames::SIGILL,
            libc::SIGTRAP => SignalNames::SIGTRAP,
            libc::SIGABRT => SignalNames::SIGABRT,
            libc::SIGBUS => SignalNames::SIGBUS,
            libc::SIGFPE => SignalNames::SIGFPE,
            libc::SIGKILL => SignalNames::SIGKILL,
            libc::SIGUSR1 => SignalNames::SIGUSR1,
            libc::SIGSEGV => SignalNames::SIGSEGV,
            libc::SIGUSR2 => SignalNames::SIGUSR2,
            libc::SIGPIPE => SignalNames::SIGPIPE,
            libc::SIGALRM => SignalNames::SIGALRM,
            libc::SIGTERM => SignalNames::SIGTERM,
            libc::SIGCHLD => SignalNames::SIGCHLD,
            libc::SIGCONT => SignalNames::SIGCONT,
            libc::SIGSTOP => SignalNames::SIGSTOP,
            libc::SIGTSTP => SignalNames::SIGTSTP,
            libc::SIGTTIN => SignalNames::SIGTTIN,
            libc::SIGTTOU => SignalNames::SIGTTOU,
            libc::SIGURG => SignalNames::SIGURG,
            libc::SIGXCPU => SignalNames::SIGXCPU,
            libc::SIGXFSZ => SignalNames::SIGXFSZ,
            libc::SIGVTALRM => SignalNames::SIGVTALRM,
            libc::SIGPROF => SignalNames::SIGPROF,
            libc::SIGWINCH => SignalNames::SIGWINCH,
            libc::SIGIO => SignalNames::SIGIO,
            libc::SIGSYS => SignalNames::SIGSYS,
            #[cfg(not(any(
                target_os = "android",
                target_os = "emscripten",
                target_os = "fuchsia",
                target_os = "linux",
                target_os = "redox",
                target_os = "haiku"
            )))]
            libc::SIGEMT => SignalNames::SIGEMT,
            #[cfg(not(any(
                target_os = "android",
                target_os = "emscripten",
                target_os = "fuchsia",
                target_os = "linux",
                target_os = "redox",
                target_os = "haiku",
                target_os = "aix"
            )))]
            libc::SIGINFO => SignalNames::SIGINFO,
            _ => SignalNames::UNKNOWN,
        }
    }
}

/// The address the signal reports as having caused the fault.
///
/// SIGILL, SIGFPE, SIGSEGV, SIGBUS, and SIGTRAP fill in `si_addr` with the
/// address of the fault; for any other signal the field is meaningless and
/// `None` is returned.
/// See <https://man7.org/linux/man-pages/man2/sigaction.2.html>
///
/// SAFETY:
///     `sig_info` must point to a valid `siginfo_t` for the duration of the
///     call, as delivered to a handler registered with `SA_SIGINFO`.
pub unsafe fn fault_address(sig_info: *const libc::siginfo_t) -> Option<usize> {
    match (*sig_info).si_signo {
        libc::SIGILL | libc::SIGFPE | libc::SIGSEGV | libc::SIGBUS | libc::SIGTRAP => {
            Some((*sig_info).si_addr() as usize)
        }
        _ => None,
    }
}
