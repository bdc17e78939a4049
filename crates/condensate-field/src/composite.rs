// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Envelope Compositing
// ─────────────────────────────────────────────────────────────────────
//! Reference compositor for envelope terms.
//!
//! Terms are applied in sequence order onto one component's
//! accumulator. A term whose polarization does not contain the
//! component is skipped. The profile of each term comes from a
//! caller-supplied evaluator (the kernel owns the shape functions);
//! this module only fixes how profiles are combined:
//!
//!   Add:      acc += amp · p
//!   Multiply: acc *= amp · p
//!   Replace:  acc  = amp · p   where |amp · p| > REPLACE_THRESHOLD
//!   Adaptive: acc += amp · (max|acc| / max|p|) · p
//!
//! Adaptive falls back to Add while the accumulator (or the profile)
//! is identically zero.

use num_complex::Complex64;

use crate::envelope::{Envelope, SpatialTerm};
use crate::flags::{Behavior, Component};

/// Profile magnitude below which `Replace` leaves the accumulator untouched.
pub const REPLACE_THRESHOLD: f64 = 1e-10;

/// Unit-amplitude profile of a term at grid cell (col, row).
pub trait ProfileEvaluator {
    fn profile(&self, term: &SpatialTerm, col: usize, row: usize) -> Complex64;
}

impl<F> ProfileEvaluator for F
where
    F: Fn(&SpatialTerm, usize, usize) -> Complex64,
{
    fn profile(&self, term: &SpatialTerm, col: usize, row: usize) -> Complex64 {
        self(term, col, row)
    }
}

fn peak(values: &[Complex64]) -> f64 {
    values.iter().fold(0.0f64, |m, v| m.max(v.norm()))
}

/// Composite every term of `envelope` that targets `component` onto
/// `acc`, a row-major buffer with `n_x` columns.
///
/// `t` scales each term by its temporal factor; pass `None` for
/// unmodulated roles.
pub fn composite<E>(
    envelope: &Envelope,
    component: Component,
    n_x: usize,
    acc: &mut [Complex64],
    t: Option<f64>,
    evaluator: &E,
) where
    E: ProfileEvaluator + ?Sized,
{
    if n_x == 0 || acc.is_empty() {
        return;
    }
    let target = component.polarization();
    let mut profile = vec![Complex64::new(0.0, 0.0); acc.len()];

    for (index, term) in envelope.terms().iter().enumerate() {
        if !term.polarization.intersects(target) {
            continue;
        }

        for (k, p) in profile.iter_mut().enumerate() {
            *p = evaluator.profile(term, k % n_x, k / n_x);
        }
        let mut amp = Complex64::new(term.amp, 0.0);
        if let Some(t) = t {
            amp *= envelope.temporal_factor(index, t);
        }

        if term.behavior == Behavior::MULTIPLY {
            for (a, p) in acc.iter_mut().zip(&profile) {
                *a *= amp * p;
            }
        } else if term.behavior == Behavior::REPLACE {
            for (a, p) in acc.iter_mut().zip(&profile) {
                let v = amp * p;
                if v.norm() > REPLACE_THRESHOLD {
                    *a = v;
                }
            }
        } else if term.behavior == Behavior::ADAPTIVE {
            let acc_peak = peak(acc);
            let profile_peak = peak(&profile);
            if acc_peak > 0.0 && profile_peak > 0.0 {
                amp *= acc_peak / profile_peak;
            }
            for (a, p) in acc.iter_mut().zip(&profile) {
                *a += amp * p;
            }
        } else {
            for (a, p) in acc.iter_mut().zip(&profile) {
                *a += amp * p;
            }
        }
    }
}
