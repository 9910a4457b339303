//! Static intensity and volume tables for 5/3/1 and HLM.
//!
//! Nothing here depends on the lifter; every assembler reads the same
//! tables.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sets::RepSpec;

/// One prescribed main set, relative to the training max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetSpec {
    pub reps: u32,
    pub percentage: f64,
    pub amrap: bool,
}

impl SetSpec {
    const fn fixed(reps: u32, percentage: f64) -> Self {
        Self {
            reps,
            percentage,
            amrap: false,
        }
    }

    const fn amrap(reps: u32, percentage: f64) -> Self {
        Self {
            reps,
            percentage,
            amrap: true,
        }
    }

    pub fn rep_spec(&self) -> RepSpec {
        if self.amrap {
            RepSpec::AtLeast(self.reps)
        } else {
            RepSpec::Exact(self.reps)
        }
    }
}

/// Straight-set volume work prescribed as `sets x reps @ percentage`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSpec {
    pub sets: u32,
    pub reps: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekSpec {
    pub number: u8,
    pub label: &'static str,
    pub sets: [SetSpec; 3],
    pub assistance: Option<VolumeSpec>,
}

impl WeekSpec {
    pub fn first_set(&self) -> &SetSpec {
        &self.sets[0]
    }

    pub fn top_set(&self) -> &SetSpec {
        &self.sets[2]
    }

    pub fn is_deload(&self) -> bool {
        self.assistance.is_none()
    }
}

const ASSISTANCE: VolumeSpec = VolumeSpec {
    sets: 5,
    reps: 10,
    percentage: 0.5,
};

/// The four-week 5/3/1 wave. Each cycle repeats it in order.
pub const FIVE_THREE_ONE_WEEKS: [WeekSpec; 4] = [
    WeekSpec {
        number: 1,
        label: "5 REPS",
        sets: [
            SetSpec::fixed(5, 0.65),
            SetSpec::fixed(5, 0.75),
            SetSpec::amrap(5, 0.85),
        ],
        assistance: Some(ASSISTANCE),
    },
    WeekSpec {
        number: 2,
        label: "3 REPS",
        sets: [
            SetSpec::fixed(3, 0.70),
            SetSpec::fixed(3, 0.80),
            SetSpec::amrap(3, 0.90),
        ],
        assistance: Some(ASSISTANCE),
    },
    WeekSpec {
        number: 3,
        label: "5/3/1",
        sets: [
            SetSpec::fixed(5, 0.75),
            SetSpec::fixed(3, 0.85),
            SetSpec::amrap(1, 0.95),
        ],
        assistance: Some(ASSISTANCE),
    },
    WeekSpec {
        number: 4,
        label: "DELOAD",
        sets: [
            SetSpec::fixed(5, 0.40),
            SetSpec::fixed(5, 0.50),
            SetSpec::fixed(5, 0.60),
        ],
        assistance: None,
    },
];

/// Down-set steps of the Pyramid template, heaviest first.
pub const PYRAMID_STEPS: [SetSpec; 2] = [SetSpec::fixed(5, 0.80), SetSpec::fixed(8, 0.70)];

pub const WIDOWMAKER_REPS: u32 = 20;
/// Longest run of four-week waves one program may hold.
pub const MAX_CYCLES: u32 = 4;

pub const FSL_SETS: std::ops::RangeInclusive<u32> = 3..=8;
pub const FSL_REPS: std::ops::RangeInclusive<u32> = 3..=5;

pub const ACCESSORY_REMINDER: &str = "50-100 reps each of Push, Pull, Single Leg/Core";

/// Day type of an HLM session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Heavy,
    Medium,
    Light,
}

impl Intensity {
    /// Fraction of the working max lifted on this day type.
    pub fn load_fraction(self, medium_reduction: f64, light_reduction: f64) -> f64 {
        match self {
            Intensity::Heavy => 1.0,
            Intensity::Medium => 1.0 - medium_reduction,
            Intensity::Light => 1.0 - light_reduction,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intensity::Heavy => "Heavy",
            Intensity::Medium => "Medium",
            Intensity::Light => "Light",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Squat,
    Press,
    Pull,
}

/// One exercise slot of an HLM day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HlmSlot {
    pub intensity: Intensity,
    pub movement: Movement,
    pub scheme: &'static str,
    pub backoff: bool,
}

const fn slot(intensity: Intensity, movement: Movement, scheme: &'static str) -> HlmSlot {
    HlmSlot {
        intensity,
        movement,
        scheme,
        backoff: matches!(intensity, Intensity::Heavy) && !matches!(movement, Movement::Pull),
    }
}

/// Backoff volume after a heavy squat or press single.
pub const BACKOFF: &str = "4x5 Backoff";

/// Heavy/Light/Medium week: every day touches each movement once, and each
/// movement meets each intensity exactly once.
pub const HLM_WEEK: [(&str, [HlmSlot; 3]); 3] = [
    (
        "Mon",
        [
            slot(Intensity::Heavy, Movement::Squat, "1x1-5"),
            slot(Intensity::Medium, Movement::Press, "4x5"),
            slot(Intensity::Light, Movement::Pull, "3x3-5"),
        ],
    ),
    (
        "Wed",
        [
            slot(Intensity::Light, Movement::Squat, "3x5"),
            slot(Intensity::Light, Movement::Press, "3x5"),
            slot(Intensity::Heavy, Movement::Pull, "2x1-5"),
        ],
    ),
    (
        "Fri",
        [
            slot(Intensity::Medium, Movement::Squat, "4x5"),
            slot(Intensity::Heavy, Movement::Press, "1x1-5"),
            slot(Intensity::Medium, Movement::Pull, "3x4-5"),
        ],
    ),
];

/// Scheme used when the alternate-pressing variant swaps in a heavy
/// secondary press.
pub const SECONDARY_PRESS_SCHEME: &str = "1x5";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_last_set_of_a_loading_week_is_amrap() {
        for week in &FIVE_THREE_ONE_WEEKS[..3] {
            assert!(!week.sets[0].amrap);
            assert!(!week.sets[1].amrap);
            assert!(week.top_set().amrap);
            assert!(!week.is_deload());
        }
        let deload = &FIVE_THREE_ONE_WEEKS[3];
        assert!(deload.is_deload());
        assert!(deload.sets.iter().all(|s| !s.amrap));
    }

    #[test]
    fn each_hlm_movement_meets_each_intensity_once() {
        for movement in [Movement::Squat, Movement::Press, Movement::Pull] {
            let mut seen: Vec<Intensity> = HLM_WEEK
                .iter()
                .flat_map(|(_, slots)| slots.iter())
                .filter(|s| s.movement == movement)
                .map(|s| s.intensity)
                .collect();
            seen.sort_by_key(|i| *i as u8);
            assert_eq!(seen, vec![Intensity::Heavy, Intensity::Medium, Intensity::Light]);
        }
    }

    #[test]
    fn backoff_only_follows_heavy_squat_and_press() {
        let backoffs: Vec<_> = HLM_WEEK
            .iter()
            .flat_map(|(_, slots)| slots.iter())
            .filter(|s| s.backoff)
            .map(|s| s.movement)
            .collect();
        assert_eq!(backoffs, vec![Movement::Squat, Movement::Press]);
    }

    #[test]
    fn load_fraction_applies_reductions() {
        assert_eq!(Intensity::Heavy.load_fraction(0.1, 0.2), 1.0);
        assert!((Intensity::Medium.load_fraction(0.1, 0.2) - 0.9).abs() < 1e-12);
        assert!((Intensity::Light.load_fraction(0.1, 0.2) - 0.8).abs() < 1e-12);
    }
}
