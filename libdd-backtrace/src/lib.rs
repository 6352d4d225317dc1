// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! On-demand capture and logging of resolved stack traces.
//!
//! A [`StackTracer`] captures a raw stack trace into a fixed-size buffer,
//! either from the current execution point or from the machine context
//! delivered to a fatal-signal handler, and renders it to an injected log
//! sink one frame per line, resolving return addresses to symbol names
//! where possible.
//!
//! ```no_run
//! use libdd_backtrace::{StackTracer, TracingLogger};
//!
//! let mut tracer = StackTracer::new(TracingLogger);
//! tracer.capture(); // trace is captured as of here
//! tracer.log_trace(); // emit the captured trace to the log
//! ```
//!
//! The capture path performs no heap allocation and takes no locks, so it
//! can run inside a signal handler during a process's last moments.

mod configuration;
mod logger;
#[cfg(unix)]
mod sig_info;
mod symbolize;
mod tracer;
mod walker;

pub use configuration::{SymbolResolution, SYMBOL_RESOLUTION_ENV};
pub use logger::{BufferLogger, TraceLogger, TracingLogger, LOG_TARGET};
#[cfg(unix)]
pub use sig_info::{fault_address, SignalNames};
pub use symbolize::SYMBOL_BUF_CAPACITY;
pub use tracer::{log_backtrace, StackTracer, MAX_STACK_DEPTH};
