//! The four competition-style lifts every program is built around.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProgramError, ensure_positive};

/// Unit the caller entered every load in.
///
/// Loads are never converted; the unit only labels output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lb,
    Kg,
}

impl WeightUnit {
    pub fn label(self) -> &'static str {
        match self {
            WeightUnit::Lb => "lb",
            WeightUnit::Kg => "kg",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
    Press,
}

/// Training order of the lift-days in a 5/3/1 week.
pub const LIFT_ORDER: [Lift; 4] = [Lift::Squat, Lift::Bench, Lift::Deadlift, Lift::Press];

impl Lift {
    pub fn display_name(self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::Bench => "Bench",
            Lift::Deadlift => "Deadlift",
            Lift::Press => "Press",
        }
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One max per lift, all in the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiftMaxSet {
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
    pub press: f64,
}

impl LiftMaxSet {
    pub fn new(squat: f64, bench: f64, deadlift: f64, press: f64) -> Self {
        Self {
            squat,
            bench,
            deadlift,
            press,
        }
    }

    pub fn get(&self, lift: Lift) -> f64 {
        match lift {
            Lift::Squat => self.squat,
            Lift::Bench => self.bench,
            Lift::Deadlift => self.deadlift,
            Lift::Press => self.press,
        }
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        for lift in LIFT_ORDER {
            ensure_positive(lift.display_name(), self.get(lift))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_any_non_positive_max() {
        assert!(LiftMaxSet::new(225.0, 185.0, 275.0, 115.0).validate().is_ok());

        let err = LiftMaxSet::new(225.0, 0.0, 275.0, 115.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ProgramError::InvalidInput(msg) if msg.contains("Bench")));

        assert!(LiftMaxSet::new(225.0, 185.0, 275.0, -1.0).validate().is_err());
    }

    #[test]
    fn unit_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WeightUnit::Kg).unwrap(), "\"kg\"");
        assert_eq!(WeightUnit::Lb.to_string(), "lb");
    }
}
