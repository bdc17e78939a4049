// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Live Controls
// ─────────────────────────────────────────────────────────────────────
//! Commands a front end may issue between solver steps.

use serde::{Deserialize, Serialize};

use condensate_types::RunConfig;

use crate::state::HostState;

/// Factor applied by one time-step adjustment.
pub const TIME_STEP_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiveControl {
    /// Double the output interval; an interval of zero is first set to dt.
    IncreaseOutputInterval,
    DecreaseOutputInterval,
    IncreaseTimeStep,
    DecreaseTimeStep,
    TakeSnapshot,
    RestoreSnapshot,
    RestoreInitial,
}

/// Run parameters the live controls may change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunControls {
    pub output_every: f64,
    pub dt: f64,
}

impl RunControls {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            output_every: config.output_every,
            dt: config.dt,
        }
    }

    /// Apply one control. State commands act on `state`; the rest
    /// adjust `self`.
    pub fn apply(&mut self, control: LiveControl, state: &mut HostState) {
        match control {
            LiveControl::IncreaseOutputInterval => {
                if self.output_every == 0.0 {
                    self.output_every = self.dt;
                }
                self.output_every *= 2.0;
            }
            LiveControl::DecreaseOutputInterval => self.output_every /= 2.0,
            LiveControl::IncreaseTimeStep => self.dt *= TIME_STEP_FACTOR,
            LiveControl::DecreaseTimeStep => self.dt /= TIME_STEP_FACTOR,
            LiveControl::TakeSnapshot => state.take_snapshot(),
            LiveControl::RestoreSnapshot => {
                state.restore_snapshot();
            }
            LiveControl::RestoreInitial => state.restore_initial(),
        }
        log::debug!(
            "{control:?}: output_every = {}, dt = {}, t = {}",
            self.output_every,
            self.dt,
            state.t
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condensate_field::DomainDecomposition;
    use condensate_types::GridConfig;
    use num_complex::Complex64;

    fn state() -> HostState {
        let d = DomainDecomposition::resolve(&GridConfig {
            n_x: 2,
            n_y: 2,
            ..GridConfig::default()
        })
        .unwrap();
        HostState::zeros(&d)
    }

    #[test]
    fn test_output_interval_seeded_from_dt() {
        let mut s = state();
        let mut c = RunControls {
            output_every: 0.0,
            dt: 0.5,
        };
        c.apply(LiveControl::IncreaseOutputInterval, &mut s);
        assert_eq!(c.output_every, 1.0);
        c.apply(LiveControl::IncreaseOutputInterval, &mut s);
        assert_eq!(c.output_every, 2.0);
        c.apply(LiveControl::DecreaseOutputInterval, &mut s);
        assert_eq!(c.output_every, 1.0);
    }

    #[test]
    fn test_time_step_factor() {
        let mut s = state();
        let mut c = RunControls::from_config(&RunConfig::default());
        c.apply(LiveControl::IncreaseTimeStep, &mut s);
        assert!((c.dt - 0.011).abs() < 1e-15);
        c.apply(LiveControl::DecreaseTimeStep, &mut s);
        assert!((c.dt - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_state_commands() {
        let mut s = state();
        let mut c = RunControls::from_config(&RunConfig::default());
        s.current.wavefunction.plus[0] = Complex64::new(1.0, 0.0);
        s.t = 3.0;
        c.apply(LiveControl::TakeSnapshot, &mut s);

        s.current.wavefunction.plus[0] = Complex64::new(5.0, 0.0);
        s.t = 8.0;
        c.apply(LiveControl::RestoreSnapshot, &mut s);
        assert_eq!(s.current.wavefunction.plus[0], Complex64::new(1.0, 0.0));
        assert_eq!(s.t, 3.0);

        c.apply(LiveControl::RestoreInitial, &mut s);
        assert_eq!(s.current.wavefunction.plus[0], Complex64::new(0.0, 0.0));
        assert_eq!(s.t, 0.0);
        assert_eq!(c.dt, 0.01);
    }
}
