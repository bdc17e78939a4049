// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Persistence
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Persistence for the condensate field kit.
//!
//! - `paths` / `context`: where files go
//! - `registry`: thread-safe name → file handle map
//! - `codec`: dense matrix text format, write and read
//! - `history`: down-sampled cut history and peak series
//! - `outputs`: the matrix output set, written and loaded in parallel
//! - `timeoutput`: windowed wavefunction frames over time
//! - `state`: host buffers with snapshot / restore
//! - `control`: live adjustments between solver steps

pub mod codec;
pub mod context;
pub mod control;
pub mod history;
pub mod outputs;
pub mod paths;
pub mod registry;
pub mod state;
pub mod timeoutput;

pub use codec::{
    load_matrix, read_matrix, read_matrix_from, write_matrix_to, MatrixLayout, MatrixValue,
    MatrixWindow,
};
pub use context::OutputContext;
pub use control::{LiveControl, RunControls, TIME_STEP_FACTOR};
pub use history::{
    record_cut, write_history, write_history_to, write_scalar_series, write_scalar_series_to,
    HistoryRecord, HistoryRecorder,
};
pub use outputs::{load_matrices, view, write_matrices, MatrixMut, MatrixRef, OutputKind};
pub use paths::{OutputPaths, TIME_OUTPUT_DIR};
pub use registry::{FileRegistry, SlotState};
pub use state::{ComponentPair, FieldState, HostState, Snapshot};
pub use timeoutput::{TimeOutput, TIME_INDEX_NAME, TIME_OUTPUT_KINDS};
