// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Time-Resolved Matrix Output
// ─────────────────────────────────────────────────────────────────────
//! Strided sub-window snapshots of the wavefunction written into
//! `timeoutput/` while the run progresses.
//!
//! One file per component and written time (`Psi_plus_<t>.txt`), plus
//! a `times` index that gets one `frame t` row per written frame.

use std::io::Write;

use condensate_types::HistoryConfig;

use crate::codec::{MatrixLayout, MatrixWindow};
use crate::context::OutputContext;
use crate::outputs::{view, MatrixRef, OutputKind};
use crate::paths::TIME_OUTPUT_DIR;
use crate::state::HostState;

/// Kinds written into `timeoutput/`.
pub const TIME_OUTPUT_KINDS: [OutputKind; 2] = [OutputKind::PsiPlus, OutputKind::PsiMinus];

/// Name of the frame index inside `timeoutput/`.
pub const TIME_INDEX_NAME: &str = "times";

/// Decides when to write the window and writes it.
#[derive(Debug, Clone)]
pub struct TimeOutput {
    window: MatrixWindow,
    every: usize,
    start_time: f64,
    eligible: usize,
    frames: usize,
}

impl TimeOutput {
    pub fn new(config: &HistoryConfig, layout: &MatrixLayout) -> Self {
        let full = MatrixWindow::full(layout);
        let window = MatrixWindow {
            rows: config.window_rows.map_or(full.rows.clone(), |s| s.start..s.end),
            cols: config.window_cols.map_or(full.cols, |s| s.start..s.end),
            stride: config.increment,
        };
        Self {
            window,
            every: config.every.max(1),
            start_time: config.start_time,
            eligible: 0,
            frames: 0,
        }
    }

    pub fn window(&self) -> &MatrixWindow {
        &self.window
    }

    /// Frames written so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Called once per output step. Steps before the start time are
    /// skipped; after it every `every`-th step is written. Returns the
    /// number of matrix files written.
    pub fn on_output(
        &mut self,
        ctx: &OutputContext,
        state: &HostState,
        layout: &MatrixLayout,
    ) -> usize {
        let t = state.t;
        if t < self.start_time {
            return 0;
        }
        let step = self.eligible;
        self.eligible += 1;
        if step % self.every != 0 {
            return 0;
        }

        let mut written = 0;
        for kind in TIME_OUTPUT_KINDS {
            let Some(matrix) = view(state, kind) else {
                continue;
            };
            let path = ctx.paths().time_path_for(kind.name(), t);
            let key = format!("{TIME_OUTPUT_DIR}/{}_{t}", kind.name());
            let window = &self.window;
            let result = match matrix {
                MatrixRef::Real(buffer) => ctx.write_matrix_at(&key, &path, buffer, layout, window),
                MatrixRef::Complex(buffer) => {
                    ctx.write_matrix_at(&key, &path, buffer, layout, window)
                }
            };
            match result {
                Ok(_) => written += 1,
                Err(e) => log::warn!("Time output of {} at t = {t} failed: {e}", kind.name()),
            }
        }

        let frame = self.frames;
        let index_path = ctx.paths().time_output_dir().join(format!("{TIME_INDEX_NAME}.txt"));
        let index_key = format!("{TIME_OUTPUT_DIR}/{TIME_INDEX_NAME}");
        if let Err(e) = ctx
            .registry()
            .append(&index_key, &index_path, |w| writeln!(w, "{frame} {t}"))
        {
            log::warn!("Updating {} failed: {e}", index_path.display());
        }
        self.frames += 1;
        written
    }
}
