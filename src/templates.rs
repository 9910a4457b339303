//! Optional accessory overlays stacked on a 5/3/1 lift-day.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProgramError;
use crate::percentages::{FSL_REPS, FSL_SETS, PYRAMID_STEPS, VolumeSpec, WIDOWMAKER_REPS, WeekSpec};
use crate::sets::{VolumeWork, build_volume};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Template {
    /// First Set Last: extra volume at the week's first main-set percentage.
    Fsl { sets: u32, reps: u32 },
    /// One set of 20 at the week's top-set percentage.
    Widowmaker,
    Pyramid,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Fsl { .. } => "FSL",
            Template::Widowmaker => "Widowmaker",
            Template::Pyramid => "Pyramid",
        }
    }

    /// Check FSL ranges. Other templates carry no parameters.
    pub fn validate(&self) -> Result<(), ProgramError> {
        match *self {
            Template::Fsl { sets, reps } if !FSL_SETS.contains(&sets) || !FSL_REPS.contains(&reps) => {
                Err(ProgramError::InvalidTemplateParams { sets, reps })
            }
            _ => Ok(()),
        }
    }

    /// Short description used in accessory pairings.
    pub fn describe(&self) -> String {
        match self {
            Template::Fsl { sets, reps } => format!("FSL {sets}×{reps} @ first-set load"),
            Template::Widowmaker => format!("Widowmaker 1×{WIDOWMAKER_REPS} @ top-set load"),
            Template::Pyramid => {
                let steps: Vec<String> = PYRAMID_STEPS
                    .iter()
                    .map(|s| format!("1×{} @ {:.0}%", s.reps, s.percentage * 100.0))
                    .collect();
                format!("Pyramid {}", steps.join(", "))
            }
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Template work resolved for one lift-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub template: String,
    pub work: Vec<VolumeWork>,
}

/// Resolve `template` against one week's percentages.
///
/// FSL ranges are expected to have been checked with [`Template::validate`];
/// out-of-range parameters are still rejected here.
pub fn compose(
    template: &Template,
    training_max: f64,
    week: &WeekSpec,
) -> Result<Overlay, ProgramError> {
    template.validate()?;
    let specs: Vec<VolumeSpec> = match *template {
        Template::Fsl { sets, reps } => vec![VolumeSpec {
            sets,
            reps,
            percentage: week.first_set().percentage,
        }],
        Template::Widowmaker => vec![VolumeSpec {
            sets: 1,
            reps: WIDOWMAKER_REPS,
            percentage: week.top_set().percentage,
        }],
        Template::Pyramid => PYRAMID_STEPS
            .iter()
            .map(|s| VolumeSpec {
                sets: 1,
                reps: s.reps,
                percentage: s.percentage,
            })
            .collect(),
    };
    let work = specs
        .into_iter()
        .map(|spec| build_volume(training_max, spec))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Overlay {
        template: template.name().to_string(),
        work,
    })
}
