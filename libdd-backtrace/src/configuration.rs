// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Environment variable consulted by [`SymbolResolution::from_env`].
pub const SYMBOL_RESOLUTION_ENV: &str = "DD_BACKTRACE_RESOLVE_SYMBOLS";

/// Symbol resolution runs in the context of a possibly-crashing process.
/// If the stack or the loaded-module tables are sufficiently corrupted, it
/// is possible (but unlikely) for resolution itself to crash. We recommend
/// leaving resolution enabled, with the environment variable to allow
/// downgrading to raw-address output.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SymbolResolution {
    /// Every frame line carries the raw address.
    Disabled,
    /// Frame addresses are resolved in process with
    /// `backtrace::resolve_unsynchronized()`; unresolvable frames fall back
    /// to the raw address.
    #[default]
    Enabled,
}

impl SymbolResolution {
    /// Reads the override from [`SYMBOL_RESOLUTION_ENV`]; an unset variable
    /// means the default.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(SYMBOL_RESOLUTION_ENV) {
            Ok(value) => Self::from_env_value(&value),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn from_env_value(value: &str) -> anyhow::Result<Self> {
        if value.eq_ignore_ascii_case("enabled") {
            Ok(SymbolResolution::Enabled)
        } else if value.eq_ignore_ascii_case("disabled") {
            Ok(SymbolResolution::Disabled)
        } else {
            anyhow::bail!("Unexpected {SYMBOL_RESOLUTION_ENV} value {value:?}")
        }
    }
}
