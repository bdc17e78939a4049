// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Field Roles
// ─────────────────────────────────────────────────────────────────────
//! The seven envelopes a run is configured with.

use serde::{Deserialize, Serialize};

use condensate_types::{ArgList, CondensateResult};

use crate::envelope::Envelope;

/// A named field role and its command-line key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRole {
    Pump,
    Pulse,
    Mask,
    InitialState,
    InitialReservoir,
    FftMask,
    Potential,
}

impl FieldRole {
    pub const ALL: [FieldRole; 7] = [
        FieldRole::Pump,
        FieldRole::Pulse,
        FieldRole::Mask,
        FieldRole::InitialState,
        FieldRole::InitialReservoir,
        FieldRole::FftMask,
        FieldRole::Potential,
    ];

    /// Flag name without the leading dashes.
    pub fn key(self) -> &'static str {
        match self {
            FieldRole::Pump => "pump",
            FieldRole::Pulse => "pulse",
            FieldRole::Mask => "mask",
            FieldRole::InitialState => "initialState",
            FieldRole::InitialReservoir => "initialReservoir",
            FieldRole::FftMask => "fftMask",
            FieldRole::Potential => "potential",
        }
    }

    /// Roles whose terms carry t0 / freq / sigma.
    pub fn is_time_modulated(self) -> bool {
        matches!(self, FieldRole::Pulse)
    }
}

/// Envelopes for every field role, owned for the run's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRoles {
    pub pump: Envelope,
    pub pulse: Envelope,
    pub mask: Envelope,
    pub initial_state: Envelope,
    pub initial_reservoir: Envelope,
    pub fft_mask: Envelope,
    pub potential: Envelope,
}

impl FieldRoles {
    /// Build every role from the argument vector. Any malformed
    /// occurrence aborts configuration.
    pub fn from_args(args: &ArgList) -> CondensateResult<Self> {
        let build =
            |role: FieldRole| Envelope::from_args(args, role.key(), role.is_time_modulated());
        let roles = Self {
            pump: build(FieldRole::Pump)?,
            pulse: build(FieldRole::Pulse)?,
            mask: build(FieldRole::Mask)?,
            initial_state: build(FieldRole::InitialState)?,
            initial_reservoir: build(FieldRole::InitialReservoir)?,
            fft_mask: build(FieldRole::FftMask)?,
            potential: build(FieldRole::Potential)?,
        };
        for role in FieldRole::ALL {
            let envelope = roles.get(role);
            if !envelope.is_empty() {
                log::info!("{}: {} term(s)", role.key(), envelope.size());
                for term in envelope.terms() {
                    log::debug!("  {}", term.describe());
                }
            }
        }
        Ok(roles)
    }

    pub fn get(&self, role: FieldRole) -> &Envelope {
        match role {
            FieldRole::Pump => &self.pump,
            FieldRole::Pulse => &self.pulse,
            FieldRole::Mask => &self.mask,
            FieldRole::InitialState => &self.initial_state,
            FieldRole::InitialReservoir => &self.initial_reservoir,
            FieldRole::FftMask => &self.fft_mask,
            FieldRole::Potential => &self.potential,
        }
    }

    /// Total number of spatial terms across all roles.
    pub fn term_count(&self) -> usize {
        FieldRole::ALL.iter().map(|r| self.get(*r).size()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Behavior;

    #[test]
    fn test_from_args_all_roles() {
        let args = ArgList::parse_line(
            "--pump 100 add 10 0 0 plus 1 none gauss \
             --pulse 1 add 5 0 0 both 1 1 ring 50 1.5 5 \
             --initialState 0.1 add 20 0 0 both 1 none gauss \
             --fftMask 1 multiply 0.7 0 0 both 6 none outerGauss \
             --pump 1 multiply 30 0 0 plus 10 none outerGauss",
        );
        let roles = FieldRoles::from_args(&args).unwrap();
        assert_eq!(roles.pump.size(), 2);
        assert_eq!(roles.pulse.size(), 1);
        assert!(roles.pulse.is_time_modulated());
        assert!(roles.mask.is_empty());
        assert_eq!(roles.fft_mask.terms()[0].behavior, Behavior::MULTIPLY);
        assert_eq!(roles.term_count(), 5);
    }

    #[test]
    fn test_bad_role_aborts() {
        let args = ArgList::parse_line("--mask 1 add 10 0 0 sideways 1 none gauss");
        assert!(FieldRoles::from_args(&args).is_err());
    }

    #[test]
    fn test_role_keys_unique() {
        let mut keys: Vec<_> = FieldRole::ALL.iter().map(|r| r.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), FieldRole::ALL.len());
    }
}
