// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Shared Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Error hierarchy, run configuration, and the argument-vector cursor
//! shared by the field and persistence crates.

pub mod args;
pub mod config;
pub mod error;

pub use args::ArgList;
pub use config::{GridConfig, HistoryConfig, IndexSpan, RunConfig};
pub use error::{CondensateError, CondensateResult};
