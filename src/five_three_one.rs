//! Wendler 5/3/1 cycle assembly.

use serde::{Deserialize, Serialize};

use crate::error::{ProgramError, ensure_positive};
use crate::formatter::{
    self, Day, Document, LoadPrecision, Schedule, WeightLine, fmt_main_sets, fmt_volume,
};
use crate::lifts::{LIFT_ORDER, Lift, LiftMaxSet, WeightUnit};
use crate::percentages::{ACCESSORY_REMINDER, FIVE_THREE_ONE_WEEKS, MAX_CYCLES, WeekSpec};
use crate::sets::{
    ResolvedSet, VolumeWork, build_set, build_volume, resolve_training_max,
    validate_training_max_percentage,
};
use crate::templates::{Overlay, Template, compose};

pub const TITLE: &str = "JIM WENDLER'S 5/3/1 PROGRAM";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveThreeOneInputs {
    pub maxes: LiftMaxSet,
    pub training_max_percentage: f64,
    pub cycles: u32,
    #[serde(default)]
    pub template: Option<Template>,
    #[serde(default)]
    pub header_text: Option<String>,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl FiveThreeOneInputs {
    pub fn new(maxes: LiftMaxSet, training_max_percentage: f64, cycles: u32) -> Self {
        Self {
            maxes,
            training_max_percentage,
            cycles,
            template: None,
            header_text: None,
            unit: WeightUnit::Lb,
        }
    }

    /// Reject the whole request before anything is computed.
    pub fn validate(&self) -> Result<(), ProgramError> {
        self.maxes.validate()?;
        validate_training_max_percentage(self.training_max_percentage)?;
        if !(1..=MAX_CYCLES).contains(&self.cycles) {
            return Err(ProgramError::invalid(format!(
                "cycles must be between 1 and {MAX_CYCLES}, got {}",
                self.cycles
            )));
        }
        if let Some(t) = &self.template {
            t.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftDay {
    pub day: u8,
    pub lift: Lift,
    pub main_sets: Vec<ResolvedSet>,
    pub assistance: Option<VolumeWork>,
    pub overlay: Option<Overlay>,
    pub accessories: String,
}

impl LiftDay {
    pub fn entries(&self, unit: WeightUnit) -> Vec<String> {
        let mut entries = vec![format!(
            "{}: {}",
            self.lift,
            fmt_main_sets(&self.main_sets, unit)
        )];
        if let Some(work) = &self.assistance {
            entries.push(format!("Assistance: {}", fmt_volume(&[*work], unit)));
        }
        if let Some(overlay) = &self.overlay {
            entries.push(format!(
                "{}: {}",
                overlay.template,
                fmt_volume(&overlay.work, unit)
            ));
        }
        entries.push(format!("Accessories: {}", self.accessories));
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBlock {
    pub cycle: u32,
    pub week: u8,
    pub label: String,
    pub deload: bool,
    pub days: Vec<LiftDay>,
}

/// Assistance and template work attached to a lift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessoryPairing {
    pub lift: Lift,
    pub assistance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveThreeOneProgram {
    pub unit: WeightUnit,
    pub maxes: LiftMaxSet,
    pub training_max_percentage: f64,
    pub training_maxes: LiftMaxSet,
    pub template: Option<Template>,
    pub accessory_pairings: Vec<AccessoryPairing>,
    pub header_text: Option<String>,
    pub weeks: Vec<WeekBlock>,
}

impl FiveThreeOneProgram {
    pub fn schedule(&self) -> Schedule {
        let days = self
            .weeks
            .iter()
            .flat_map(|week| {
                week.days.iter().map(move |day| Day {
                    label: format!(
                        "CYCLE {} - WEEK {} ({}) - DAY {} - {}",
                        week.cycle,
                        week.week,
                        week.label,
                        day.day,
                        day.lift.display_name().to_uppercase()
                    ),
                    entries: day.entries(self.unit),
                })
            })
            .collect();
        Schedule(days)
    }

    pub fn document(&self) -> Document {
        let weights = LIFT_ORDER
            .iter()
            .map(|&lift| WeightLine {
                name: lift.display_name().to_string(),
                annotation: None,
                load: self.maxes.get(lift),
                training_max: Some(self.training_maxes.get(lift)),
            })
            .collect();
        Document {
            title: TITLE.to_string(),
            unit: self.unit,
            precision: LoadPrecision::Whole,
            weights,
            reductions: None,
            accessories: self.header_text.clone(),
            schedule: self.schedule(),
        }
    }

    pub fn to_text(&self) -> String {
        formatter::format(&self.document())
    }

    /// Every main set of the program in schedule order.
    pub fn main_sets(&self) -> impl Iterator<Item = &ResolvedSet> {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .flat_map(|d| d.main_sets.iter())
    }
}

/// Response shape of the remote `generate531` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveThreeOneResponse {
    pub training_maxes: LiftMaxSet,
    pub accessory_pairings: Vec<AccessoryPairing>,
    /// Program text, one element per line.
    pub program: Vec<String>,
}

impl From<&FiveThreeOneProgram> for FiveThreeOneResponse {
    fn from(program: &FiveThreeOneProgram) -> Self {
        Self {
            training_maxes: program.training_maxes,
            accessory_pairings: program.accessory_pairings.clone(),
            program: program.to_text().lines().map(str::to_string).collect(),
        }
    }
}

fn accessory_pairings(template: Option<&Template>) -> Vec<AccessoryPairing> {
    let assistance = FIVE_THREE_ONE_WEEKS
        .iter()
        .find_map(|w| w.assistance)
        .map(|a| {
            format!(
                "{}×{} @ {:.0}% TM",
                a.sets,
                a.reps,
                a.percentage * 100.0
            )
        })
        .unwrap_or_default();
    LIFT_ORDER
        .iter()
        .map(|&lift| AccessoryPairing {
            lift,
            assistance: assistance.clone(),
            template: template.map(Template::describe),
        })
        .collect()
}

fn lift_day(
    day: u8,
    lift: Lift,
    training_max: f64,
    week: &WeekSpec,
    template: Option<&Template>,
) -> Result<LiftDay, ProgramError> {
    let main_sets = week
        .sets
        .iter()
        .zip(1..)
        .map(|(spec, n)| build_set(n, training_max, spec.percentage, spec.rep_spec()))
        .collect::<Result<Vec<_>, _>>()?;
    let assistance = week
        .assistance
        .map(|spec| build_volume(training_max, spec))
        .transpose()?;
    let overlay = template
        .map(|t| compose(t, training_max, week))
        .transpose()?;
    Ok(LiftDay {
        day,
        lift,
        main_sets,
        assistance,
        overlay,
        accessories: ACCESSORY_REMINDER.to_string(),
    })
}

/// Build `cycles` repetitions of the four-week wave for all four lifts.
///
/// Output is a pure function of `inputs`.
pub fn assemble_531(inputs: &FiveThreeOneInputs) -> Result<FiveThreeOneProgram, ProgramError> {
    inputs.validate()?;
    let pct = inputs.training_max_percentage;
    let mut tms = [0.0; 4];
    for (slot, lift) in tms.iter_mut().zip(LIFT_ORDER) {
        let tm = resolve_training_max(inputs.maxes.get(lift), pct)?;
        ensure_positive(&format!("{lift} training max"), tm)?;
        *slot = tm;
    }
    let training_maxes = LiftMaxSet::new(tms[0], tms[1], tms[2], tms[3]);

    let template = inputs.template.as_ref();
    let mut weeks = Vec::with_capacity(inputs.cycles as usize * FIVE_THREE_ONE_WEEKS.len());
    for cycle in 1..=inputs.cycles {
        for spec in &FIVE_THREE_ONE_WEEKS {
            let days = LIFT_ORDER
                .iter()
                .zip(1u8..)
                .map(|(&lift, day)| lift_day(day, lift, training_maxes.get(lift), spec, template))
                .collect::<Result<Vec<_>, _>>()?;
            weeks.push(WeekBlock {
                cycle,
                week: spec.number,
                label: spec.label.to_string(),
                deload: spec.is_deload(),
                days,
            });
        }
    }

    log::info!(
        "Assembled 5/3/1: {} cycle(s), {} week blocks, template {}",
        inputs.cycles,
        weeks.len(),
        template.map(Template::name).unwrap_or("none")
    );

    Ok(FiveThreeOneProgram {
        unit: inputs.unit,
        maxes: inputs.maxes,
        training_max_percentage: pct,
        training_maxes,
        template: inputs.template,
        accessory_pairings: accessory_pairings(template),
        header_text: inputs.header_text.clone(),
        weeks,
    })
}
