//! Training max resolution and per-set load calculation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProgramError, ensure_positive};
use crate::percentages::VolumeSpec;

/// Upper sanity bound on a set percentage; anything above 100% is overload work.
pub const MAX_SET_PERCENTAGE: f64 = 1.5;

/// Prescribed reps of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reps", rename_all = "snake_case")]
pub enum RepSpec {
    Exact(u32),
    /// AMRAP set with a minimum rep contract.
    AtLeast(u32),
}

impl RepSpec {
    pub fn minimum(self) -> u32 {
        match self {
            RepSpec::Exact(n) | RepSpec::AtLeast(n) => n,
        }
    }

    pub fn is_amrap(self) -> bool {
        matches!(self, RepSpec::AtLeast(_))
    }
}

impl fmt::Display for RepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepSpec::Exact(n) => write!(f, "{n}"),
            RepSpec::AtLeast(n) => write!(f, "{n}+"),
        }
    }
}

/// A main set with its load worked out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSet {
    pub set_number: u32,
    pub reps: RepSpec,
    pub percentage: f64,
    pub load: f64,
}

/// Straight sets at one load, e.g. assistance `5x10` or a template overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeWork {
    pub sets: u32,
    pub reps: u32,
    pub percentage: f64,
    pub load: f64,
}

/// Round half away from zero to the nearest whole unit.
pub fn round_load(value: f64) -> f64 {
    value.round()
}

/// Convert a one-rep max into the training max used for every set.
///
/// `training_max_percentage` is a percentage in (0, 100].
pub fn resolve_training_max(
    one_rep_max: f64,
    training_max_percentage: f64,
) -> Result<f64, ProgramError> {
    ensure_positive("one-rep max", one_rep_max)?;
    validate_training_max_percentage(training_max_percentage)?;
    Ok(round_load(one_rep_max * training_max_percentage / 100.0))
}

pub fn validate_training_max_percentage(percentage: f64) -> Result<(), ProgramError> {
    if percentage.is_finite() && percentage > 0.0 && percentage <= 100.0 {
        Ok(())
    } else {
        Err(ProgramError::invalid(format!(
            "training max percentage must be in (0, 100], got {percentage}"
        )))
    }
}

fn validate_set_percentage(percentage: f64) -> Result<(), ProgramError> {
    if percentage.is_finite() && percentage > 0.0 && percentage <= MAX_SET_PERCENTAGE {
        Ok(())
    } else {
        Err(ProgramError::invalid(format!(
            "set percentage must be in (0, {MAX_SET_PERCENTAGE}], got {percentage}"
        )))
    }
}

/// Compute the rounded working load for one set.
pub fn build_set(
    set_number: u32,
    training_max: f64,
    percentage: f64,
    reps: RepSpec,
) -> Result<ResolvedSet, ProgramError> {
    ensure_positive("training max", training_max)?;
    validate_set_percentage(percentage)?;
    Ok(ResolvedSet {
        set_number,
        reps,
        percentage,
        load: round_load(training_max * percentage),
    })
}

pub fn build_volume(training_max: f64, spec: VolumeSpec) -> Result<VolumeWork, ProgramError> {
    let set = build_set(1, training_max, spec.percentage, RepSpec::Exact(spec.reps))?;
    Ok(VolumeWork {
        sets: spec.sets,
        reps: spec.reps,
        percentage: spec.percentage,
        load: set.load,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_max_rounds_half_up() {
        // 225 * 0.9 = 202.5
        assert_eq!(resolve_training_max(225.0, 90.0).unwrap(), 203.0);
        assert_eq!(resolve_training_max(185.0, 90.0).unwrap(), 167.0);
        assert_eq!(resolve_training_max(115.0, 90.0).unwrap(), 104.0);
    }

    #[test]
    fn full_percentage_returns_the_max() {
        for max in [1.0, 99.0, 225.0, 317.0] {
            assert_eq!(resolve_training_max(max, 100.0).unwrap(), max);
        }
    }

    #[test]
    fn training_max_is_monotonic() {
        let mut last = 0.0;
        for max in (50..400).step_by(7) {
            let tm = resolve_training_max(max as f64, 85.0).unwrap();
            assert!(tm >= last);
            last = tm;
        }
        let mut last = 0.0;
        for pct in 1..=100 {
            let tm = resolve_training_max(225.0, pct as f64).unwrap();
            assert!(tm >= last);
            last = tm;
        }
    }

    #[test]
    fn training_max_rejects_bad_input() {
        assert!(matches!(
            resolve_training_max(0.0, 90.0),
            Err(ProgramError::InvalidInput(_))
        ));
        assert!(resolve_training_max(-10.0, 90.0).is_err());
        assert!(resolve_training_max(200.0, 0.0).is_err());
        assert!(resolve_training_max(200.0, 100.5).is_err());
    }

    #[test]
    fn build_set_rounds_load() {
        let set = build_set(3, 203.0, 0.85, RepSpec::AtLeast(5)).unwrap();
        assert_eq!(set.load, 173.0);
        assert_eq!(set.set_number, 3);
        assert!(set.reps.is_amrap());
        assert_eq!(set.reps.to_string(), "5+");
    }

    #[test]
    fn build_set_bounds_percentage() {
        assert!(build_set(1, 200.0, 1.5, RepSpec::Exact(1)).is_ok());
        assert!(build_set(1, 200.0, 1.51, RepSpec::Exact(1)).is_err());
        assert!(build_set(1, 200.0, 0.0, RepSpec::Exact(1)).is_err());
    }

    #[test]
    fn volume_work_uses_spec_percentage() {
        let spec = VolumeSpec {
            sets: 5,
            reps: 10,
            percentage: 0.5,
        };
        let work = build_volume(203.0, spec).unwrap();
        assert_eq!(work.load, 102.0);
        assert_eq!((work.sets, work.reps), (5, 10));
    }
}
