// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Host Field State
// ─────────────────────────────────────────────────────────────────────
//! Host-side field buffers and the snapshot / restore contract.
//!
//! `current` is what the solver evolves; `initial` is captured once
//! after the initial conditions are built; `saved` holds at most one
//! user snapshot together with its simulation time.

use num_complex::Complex64;

use condensate_field::{Component, DomainDecomposition};

/// Per-component buffers; `minus` exists only in twin mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentPair<T> {
    pub plus: Vec<T>,
    pub minus: Option<Vec<T>>,
}

impl<T: Clone> ComponentPair<T> {
    pub fn filled(len: usize, twin: bool, value: T) -> Self {
        Self {
            plus: vec![value.clone(); len],
            minus: twin.then(|| vec![value; len]),
        }
    }

    pub fn get(&self, component: Component) -> Option<&[T]> {
        match component {
            Component::Plus => Some(&self.plus),
            Component::Minus => self.minus.as_deref(),
        }
    }

    pub fn get_mut(&mut self, component: Component) -> Option<&mut [T]> {
        match component {
            Component::Plus => Some(&mut self.plus),
            Component::Minus => self.minus.as_deref_mut(),
        }
    }

    pub fn is_twin(&self) -> bool {
        self.minus.is_some()
    }
}

/// Wavefunction and reservoir of every evolved component.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub wavefunction: ComponentPair<Complex64>,
    pub reservoir: ComponentPair<f64>,
}

impl FieldState {
    pub fn zeros(domain: &DomainDecomposition) -> Self {
        let n2 = domain.n2();
        let twin = domain.use_twin_mode();
        Self {
            wavefunction: ComponentPair::filled(n2, twin, Complex64::new(0.0, 0.0)),
            reservoir: ComponentPair::filled(n2, twin, 0.0),
        }
    }
}

/// A saved copy of the field with its simulation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: FieldState,
    pub t: f64,
}

/// All host buffers of a run.
#[derive(Debug, Clone)]
pub struct HostState {
    pub current: FieldState,
    /// Momentum-space wavefunction, written by the kernel.
    pub fft: ComponentPair<Complex64>,
    initial: FieldState,
    saved: Option<Snapshot>,
    pub t: f64,
}

impl HostState {
    pub fn zeros(domain: &DomainDecomposition) -> Self {
        let current = FieldState::zeros(domain);
        Self {
            fft: current.wavefunction.clone(),
            initial: current.clone(),
            current,
            saved: None,
            t: 0.0,
        }
    }

    /// Record the current field as the initial condition.
    pub fn capture_initial(&mut self) {
        self.initial = self.current.clone();
    }

    pub fn initial(&self) -> &FieldState {
        &self.initial
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.saved.as_ref()
    }

    /// Copy the current field and time into the snapshot slot,
    /// replacing any earlier snapshot.
    pub fn take_snapshot(&mut self) {
        self.saved = Some(Snapshot {
            state: self.current.clone(),
            t: self.t,
        });
        log::info!("Snapshot taken at t = {}", self.t);
    }

    /// Restore the saved snapshot. Returns false and changes nothing
    /// when none was taken.
    pub fn restore_snapshot(&mut self) -> bool {
        match &self.saved {
            Some(snapshot) => {
                self.current = snapshot.state.clone();
                self.t = snapshot.t;
                log::info!("Snapshot restored, t = {}", self.t);
                true
            }
            None => {
                log::warn!("No snapshot to restore");
                false
            }
        }
    }

    /// Reset wavefunction and reservoir to the initial condition, t = 0.
    pub fn restore_initial(&mut self) {
        self.current = self.initial.clone();
        self.t = 0.0;
        log::info!("Initial state restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condensate_types::GridConfig;

    fn domain(twin: bool) -> DomainDecomposition {
        DomainDecomposition::resolve(&GridConfig {
            n_x: 4,
            n_y: 4,
            twin_mode: twin,
            ..GridConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_twin_mode_allocates_minus() {
        let single = HostState::zeros(&domain(false));
        assert!(single.current.wavefunction.minus.is_none());
        assert!(single.current.reservoir.get(Component::Minus).is_none());

        let twin = HostState::zeros(&domain(true));
        assert_eq!(twin.current.reservoir.get(Component::Minus).unwrap().len(), 16);
        assert!(twin.fft.is_twin());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut state = HostState::zeros(&domain(true));
        state.current.wavefunction.plus[3] = Complex64::new(1.0, 2.0);
        state.current.reservoir.get_mut(Component::Minus).unwrap()[5] = 7.0;
        state.t = 12.5;
        state.take_snapshot();
        let saved = state.current.clone();

        state.current.wavefunction.plus[3] = Complex64::new(0.0, 0.0);
        state.current.reservoir.plus[0] = -1.0;
        state.t = 20.0;

        assert!(state.restore_snapshot());
        assert_eq!(state.current, saved);
        assert_eq!(state.t, 12.5);
    }

    #[test]
    fn test_restore_without_snapshot_is_noop() {
        let mut state = HostState::zeros(&domain(false));
        state.current.reservoir.plus[0] = 3.0;
        state.t = 4.0;
        assert!(!state.restore_snapshot());
        assert_eq!(state.current.reservoir.plus[0], 3.0);
        assert_eq!(state.t, 4.0);
    }

    #[test]
    fn test_restore_initial_keeps_reservoir_separate() {
        let mut state = HostState::zeros(&domain(false));
        state.current.wavefunction.plus[0] = Complex64::new(0.5, 0.0);
        state.current.reservoir.plus[0] = 9.0;
        state.capture_initial();

        state.current.wavefunction.plus[0] = Complex64::new(2.0, 2.0);
        state.current.reservoir.plus[0] = 1.0;
        state.t = 30.0;
        state.restore_initial();

        assert_eq!(state.current.wavefunction.plus[0], Complex64::new(0.5, 0.0));
        assert_eq!(state.current.reservoir.plus[0], 9.0);
        assert_eq!(state.t, 0.0);
    }
}
