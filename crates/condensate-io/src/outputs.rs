// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Matrix Outputs
// ─────────────────────────────────────────────────────────────────────
//! The closed set of matrix outputs and their parallel write / load.
//!
//! Each kind is written by its own rayon task. A failing file logs a
//! warning and leaves its siblings untouched.

use std::path::Path;

use num_complex::Complex64;
use rayon::prelude::*;

use condensate_field::Component;
use condensate_types::{CondensateResult, RunConfig};

use crate::codec::{read_matrix, MatrixLayout, MatrixWindow};
use crate::context::OutputContext;
use crate::state::{FieldState, HostState};

/// A named full-grid matrix output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    PsiPlus,
    PsiMinus,
    NPlus,
    NMinus,
    FftPlus,
    FftMinus,
}

impl OutputKind {
    pub const ALL: [OutputKind; 6] = [
        OutputKind::PsiPlus,
        OutputKind::PsiMinus,
        OutputKind::NPlus,
        OutputKind::NMinus,
        OutputKind::FftPlus,
        OutputKind::FftMinus,
    ];

    /// Kinds restored from `--loadFrom`.
    pub const LOADABLE: [OutputKind; 4] = [
        OutputKind::PsiPlus,
        OutputKind::PsiMinus,
        OutputKind::NPlus,
        OutputKind::NMinus,
    ];

    /// File stem.
    pub fn name(self) -> &'static str {
        match self {
            OutputKind::PsiPlus => "Psi_plus",
            OutputKind::PsiMinus => "Psi_minus",
            OutputKind::NPlus => "n_plus",
            OutputKind::NMinus => "n_minus",
            OutputKind::FftPlus => "fft_plus",
            OutputKind::FftMinus => "fft_minus",
        }
    }

    pub fn component(self) -> Component {
        match self {
            OutputKind::PsiPlus | OutputKind::NPlus | OutputKind::FftPlus => Component::Plus,
            OutputKind::PsiMinus | OutputKind::NMinus | OutputKind::FftMinus => Component::Minus,
        }
    }

    /// Output keys that select this kind.
    pub fn selectors(self) -> [&'static str; 4] {
        let family = match self {
            OutputKind::PsiPlus | OutputKind::PsiMinus => "psi",
            OutputKind::NPlus | OutputKind::NMinus => "n",
            OutputKind::FftPlus | OutputKind::FftMinus => "fft",
        };
        let own = match self {
            OutputKind::PsiPlus => "psi_plus",
            OutputKind::PsiMinus => "psi_minus",
            OutputKind::NPlus => "n_plus",
            OutputKind::NMinus => "n_minus",
            OutputKind::FftPlus => "fft_plus",
            OutputKind::FftMinus => "fft_minus",
        };
        ["mat", own, self.component().suffix(), family]
    }

    /// Only exists with two evolved components.
    pub fn is_twin_only(self) -> bool {
        self.component() == Component::Minus
    }

    pub fn is_selected(self, config: &RunConfig) -> bool {
        config.does_output(&self.selectors())
    }
}

/// Borrowed view of one output buffer.
#[derive(Debug, Clone, Copy)]
pub enum MatrixRef<'a> {
    Real(&'a [f64]),
    Complex(&'a [Complex64]),
}

/// Mutable view of one loadable buffer.
#[derive(Debug)]
pub enum MatrixMut<'a> {
    Real(&'a mut [f64]),
    Complex(&'a mut [Complex64]),
}

/// Buffer backing `kind`, or `None` when the component is not evolved.
pub fn view(state: &HostState, kind: OutputKind) -> Option<MatrixRef<'_>> {
    let component = kind.component();
    match kind {
        OutputKind::PsiPlus | OutputKind::PsiMinus => state
            .current
            .wavefunction
            .get(component)
            .map(MatrixRef::Complex),
        OutputKind::NPlus | OutputKind::NMinus => {
            state.current.reservoir.get(component).map(MatrixRef::Real)
        }
        OutputKind::FftPlus | OutputKind::FftMinus => {
            state.fft.get(component).map(MatrixRef::Complex)
        }
    }
}

fn write_one(
    ctx: &OutputContext,
    kind: OutputKind,
    matrix: MatrixRef<'_>,
    layout: &MatrixLayout,
) -> CondensateResult<usize> {
    let window = MatrixWindow::full(layout);
    match matrix {
        MatrixRef::Real(buffer) => ctx.write_matrix(kind.name(), buffer, layout, &window),
        MatrixRef::Complex(buffer) => ctx.write_matrix(kind.name(), buffer, layout, &window),
    }
}

/// Write every selected kind that exists in `state`, in parallel.
/// Returns the number of files written.
pub fn write_matrices(
    ctx: &OutputContext,
    config: &RunConfig,
    state: &HostState,
    layout: &MatrixLayout,
) -> usize {
    let jobs: Vec<(OutputKind, MatrixRef<'_>)> = OutputKind::ALL
        .into_iter()
        .filter(|kind| kind.is_selected(config))
        .filter_map(|kind| view(state, kind).map(|m| (kind, m)))
        .collect();

    jobs.into_par_iter()
        .filter(|(kind, matrix)| match write_one(ctx, *kind, *matrix, layout) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Output of {} failed: {e}", kind.name());
                false
            }
        })
        .count()
}

fn load_targets(state: &mut FieldState) -> Vec<(OutputKind, MatrixMut<'_>)> {
    let FieldState {
        wavefunction,
        reservoir,
    } = state;
    let mut targets = vec![
        (OutputKind::PsiPlus, MatrixMut::Complex(&mut wavefunction.plus[..])),
        (OutputKind::NPlus, MatrixMut::Real(&mut reservoir.plus[..])),
    ];
    if let Some(minus) = wavefunction.minus.as_deref_mut() {
        targets.push((OutputKind::PsiMinus, MatrixMut::Complex(minus)));
    }
    if let Some(minus) = reservoir.minus.as_deref_mut() {
        targets.push((OutputKind::NMinus, MatrixMut::Real(minus)));
    }
    targets
}

/// Load the loadable kinds from `load_dir/<name>.txt` into the current
/// field, in parallel. Missing files leave their buffer untouched.
/// Returns the total number of cells loaded.
pub fn load_matrices(ctx: &OutputContext, state: &mut HostState) -> usize {
    let paths = ctx.paths();
    log::info!("Loading matrices from {}", paths.load_dir().display());
    load_targets(&mut state.current)
        .into_par_iter()
        .map(|(kind, target)| {
            let path = paths.load_path_for(kind.name());
            load_one(&path, target)
        })
        .sum()
}

fn load_one(path: &Path, target: MatrixMut<'_>) -> usize {
    match target {
        MatrixMut::Real(buffer) => read_matrix(path, buffer),
        MatrixMut::Complex(buffer) => read_matrix(path, buffer),
    }
}
