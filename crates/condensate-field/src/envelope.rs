// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Envelopes
// ─────────────────────────────────────────────────────────────────────
//! Ordered spatial (and optional temporal) terms describing one field
//! role such as the pump or the pulse.
//!
//! Terms are appended once at configuration time, in the order their
//! flags appear on the command line, and are read-only afterwards. The
//! evaluation kernel composites them in that order (see `composite`).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use condensate_types::{ArgList, CondensateError, CondensateResult};

use crate::flags::{
    parse_behavior, parse_combined, render_tokens, Behavior, Polarization, Shape,
    TOKEN_SEPARATOR,
};

/// One spatial term of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialTerm {
    pub amp: f64,
    pub width: f64,
    pub x: f64,
    pub y: f64,
    /// Super-Gaussian exponent; 1 gives a plain Gaussian.
    pub exponent: f64,
    pub shape: Shape,
    pub polarization: Polarization,
    pub behavior: Behavior,
    /// Orbital charge: the profile carries a phase exp(i m θ).
    pub m: i32,
}

impl SpatialTerm {
    /// Command-line style rendering of the term's flag sets.
    pub fn describe(&self) -> String {
        format!(
            "amp={} width={} at ({}, {}) exp={} type={} pol={} behavior={} m={}",
            self.amp,
            self.width,
            self.x,
            self.y,
            self.exponent,
            render_tokens(self.shape),
            render_tokens(self.polarization),
            render_tokens(self.behavior),
            self.m
        )
    }
}

/// One temporal term, paired by index with a spatial term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalTerm {
    /// Onset (peak) time.
    pub t0: f64,
    /// Duration.
    pub sigma: f64,
    /// Carrier frequency.
    pub freq: f64,
}

impl TemporalTerm {
    /// Gaussian pulse with carrier: exp(-(t-t0)²/(2σ²)) · exp(-i ω (t-t0)).
    pub fn factor(&self, t: f64) -> Complex64 {
        let dt = t - self.t0;
        let envelope = if self.sigma > 0.0 {
            (-dt * dt / (2.0 * self.sigma * self.sigma)).exp()
        } else if dt == 0.0 {
            1.0
        } else {
            0.0
        };
        Complex64::from_polar(envelope, -self.freq * dt)
    }
}

/// Ordered term list for one field role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    spatial: Vec<SpatialTerm>,
    temporal: Vec<TemporalTerm>,
}

fn parse_charge(token: &str) -> CondensateResult<i32> {
    match token {
        "None" | "none" => Ok(0),
        other => other
            .parse::<i32>()
            .map_err(|_| CondensateError::InvalidNumber {
                name: "m".to_string(),
                value: other.to_string(),
            }),
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one spatial term.
    ///
    /// All token strings are parsed before anything is stored, so a
    /// failure leaves the envelope unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn add_spatial(
        &mut self,
        amp: f64,
        width: f64,
        x: f64,
        y: f64,
        exponent: f64,
        shape_tokens: &str,
        pol_tokens: &str,
        behavior_tokens: &str,
        m_token: &str,
    ) -> CondensateResult<()> {
        let shape: Shape = parse_combined(shape_tokens, TOKEN_SEPARATOR)?;
        let polarization: Polarization = parse_combined(pol_tokens, TOKEN_SEPARATOR)?;
        let behavior = parse_behavior(behavior_tokens)?;
        let m = parse_charge(m_token)?;
        self.spatial.push(SpatialTerm {
            amp,
            width,
            x,
            y,
            exponent,
            shape,
            polarization,
            behavior,
            m,
        });
        Ok(())
    }

    /// Append one temporal term. Keeping it aligned with the spatial
    /// terms is the caller's job; see `is_aligned`.
    pub fn add_temporal(&mut self, t0: f64, sigma: f64, freq: f64) {
        self.temporal.push(TemporalTerm { t0, sigma, freq });
    }

    /// Number of spatial terms.
    pub fn size(&self) -> usize {
        self.spatial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spatial.is_empty()
    }

    pub fn terms(&self) -> &[SpatialTerm] {
        &self.spatial
    }

    pub fn temporal(&self) -> &[TemporalTerm] {
        &self.temporal
    }

    pub fn is_time_modulated(&self) -> bool {
        !self.temporal.is_empty()
    }

    /// No temporal terms, or exactly one per spatial term.
    pub fn is_aligned(&self) -> bool {
        self.temporal.is_empty() || self.temporal.len() == self.spatial.len()
    }

    /// Temporal factor of term `index` at time `t`; 1 for unmodulated envelopes.
    pub fn temporal_factor(&self, index: usize, t: f64) -> Complex64 {
        self.temporal
            .get(index)
            .map_or(Complex64::new(1.0, 0.0), |term| term.factor(t))
    }

    /// Build an envelope from every `--<key>` occurrence in `args`.
    ///
    /// Each occurrence is followed by, in order: amp, behaviour, width,
    /// X, Y, pol, exponent, m, type, and when `time` is set: t0, freq,
    /// sigma. Occurrences are appended in argument order. A missing key
    /// yields an empty envelope.
    pub fn from_args(args: &ArgList, key: &str, time: bool) -> CondensateResult<Self> {
        let flag = format!("--{key}");
        let field = |name: &str| format!("{key}_{name}");
        let mut envelope = Self::new();
        let mut index = 0;

        while let Some(found) = args.find(&flag, index) {
            index = found + 1;

            let amp = args.next_f64(&field("amp"), &mut index)?;
            let behavior = args.next_str(&field("behaviour"), &mut index)?;
            let width = args.next_f64(&field("width"), &mut index)?;
            let x = args.next_f64(&field("X"), &mut index)?;
            let y = args.next_f64(&field("Y"), &mut index)?;
            let pol = args.next_str(&field("pol"), &mut index)?;
            let exponent = args.next_f64(&field("exponent"), &mut index)?;
            let m = args.next_str(&field("m"), &mut index)?;
            let shape = args.next_str(&field("type"), &mut index)?;

            envelope.add_spatial(amp, width, x, y, exponent, shape, pol, behavior, m)?;

            if !time {
                continue;
            }

            let t0 = args.next_f64(&field("t0"), &mut index)?;
            let freq = args.next_f64(&field("freq"), &mut index)?;
            let sigma = args.next_f64(&field("sigma"), &mut index)?;
            envelope.add_temporal(t0, sigma, freq);
        }

        if !envelope.is_empty() {
            log::debug!("Envelope '{key}' built with {} term(s)", envelope.size());
        }
        Ok(envelope)
    }
}
