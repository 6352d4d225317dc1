// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The log-sink boundary.
//!
//! The tracer is written against [`TraceLogger`] rather than a global
//! logging category, so embedders pick the sink at construction and tests
//! can capture emitted lines.

use std::sync::Mutex;

/// Component target under which all trace output is emitted.
pub const LOG_TARGET: &str = "backtrace";

/// One-capability sink: emit a formatted line at critical severity.
pub trait TraceLogger {
    fn log_critical(&self, line: &str);
}

impl<L: TraceLogger + ?Sized> TraceLogger for &L {
    fn log_critical(&self, line: &str) {
        (**self).log_critical(line)
    }
}

/// Routes lines to the `tracing` ecosystem under the [`LOG_TARGET`] target.
///
/// `tracing` defines no level above `ERROR`, so critical intent is carried
/// by `Level::ERROR` plus the fixed component target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TraceLogger for TracingLogger {
    fn log_critical(&self, line: &str) {
        tracing::error!(target: "backtrace", "{line}");
    }
}

/// Collects emitted lines in memory.
///
/// The logger double for tests, also usable by embedders that post-process
/// trace output instead of logging it. Collection allocates, so this sink
/// is not for use inside a signal handler.
#[derive(Debug, Default)]
pub struct BufferLogger {
    lines: Mutex<Vec<String>>,
}

impl BufferLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lines emitted so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TraceLogger for BufferLogger {
    fn log_critical(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
