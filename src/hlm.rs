//! Heavy/Light/Medium weekly microcycle.
//!
//! Two variants share the same three-day skeleton ([`HLM_WEEK`]): the
//! standard one with a single press, and the alternate-pressing one that
//! rotates a secondary press onto the odd day and lets every lift be
//! renamed.

use serde::{Deserialize, Serialize};

use crate::error::{ProgramError, ensure_positive};
use crate::formatter::{self, Day, Document, LoadPrecision, Schedule, WeightLine, fmt_load};
use crate::lifts::WeightUnit;
use crate::percentages::{
    BACKOFF, HLM_WEEK, HlmSlot, Intensity, Movement, SECONDARY_PRESS_SCHEME,
};
use crate::sets::round_load;

pub const STANDARD_TEMPLATE_NAME: &str = "HLM Standard 5s";
pub const ALTERNATE_TEMPLATE_NAME: &str = "HLM 5s (Alternate Pressing)";

/// Fractions taken off the heavy load on medium and light days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reductions {
    pub medium: f64,
    pub light: f64,
}

impl Default for Reductions {
    fn default() -> Self {
        Self {
            medium: 0.10,
            light: 0.20,
        }
    }
}

impl Reductions {
    pub fn validate(&self) -> Result<(), ProgramError> {
        for (name, value) in [("medium reduction", self.medium), ("light reduction", self.light)] {
            if !(value.is_finite() && value > 0.0 && value < 1.0) {
                return Err(ProgramError::invalid(format!(
                    "{name} must be in (0, 1), got {value}"
                )));
            }
        }
        Ok(())
    }

    fn fraction(&self, intensity: Intensity) -> f64 {
        intensity.load_fraction(self.medium, self.light)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardInputs {
    pub squat: f64,
    pub press: f64,
    pub pull: f64,
    #[serde(flatten)]
    pub reductions: Reductions,
    #[serde(default)]
    pub header_text: Option<String>,
    #[serde(default)]
    pub unit: WeightUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternateInputs {
    pub squat: f64,
    pub heavy_squat_name: String,
    pub primary_press: f64,
    pub primary_press_name: String,
    pub secondary_press: Option<f64>,
    pub secondary_press_name: String,
    pub pull: f64,
    pub heavy_pull_name: String,
    pub medium_pull: Option<f64>,
    pub medium_pull_name: Option<String>,
    pub light_pull: Option<f64>,
    pub light_pull_name: Option<String>,
    #[serde(flatten)]
    pub reductions: Reductions,
    #[serde(default)]
    pub header_text: Option<String>,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl Default for AlternateInputs {
    fn default() -> Self {
        Self {
            squat: 100.0,
            heavy_squat_name: "Squat".into(),
            primary_press: 100.0,
            primary_press_name: "OHP".into(),
            secondary_press: None,
            secondary_press_name: "Bench Press".into(),
            pull: 100.0,
            heavy_pull_name: "Deadlift".into(),
            medium_pull: None,
            medium_pull_name: None,
            light_pull: None,
            light_pull_name: None,
            reductions: Reductions::default(),
            header_text: None,
            unit: WeightUnit::Kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hlm_type", rename_all = "lowercase")]
pub enum HlmInputs {
    Standard(StandardInputs),
    Alternate(AlternateInputs),
}

impl HlmInputs {
    pub fn unit(&self) -> WeightUnit {
        match self {
            HlmInputs::Standard(s) => s.unit,
            HlmInputs::Alternate(a) => a.unit,
        }
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        match self {
            HlmInputs::Standard(s) => {
                ensure_positive("squat", s.squat)?;
                ensure_positive("press", s.press)?;
                ensure_positive("pull", s.pull)?;
                s.reductions.validate()
            }
            HlmInputs::Alternate(a) => {
                ensure_positive("squat", a.squat)?;
                ensure_positive("primary press", a.primary_press)?;
                ensure_positive("pull", a.pull)?;
                for (name, value) in [
                    ("secondary press", a.secondary_press),
                    ("medium pull", a.medium_pull),
                    ("light pull", a.light_pull),
                ] {
                    if let Some(v) = value {
                        ensure_positive(name, v)?;
                    }
                }
                let names = [
                    ("heavy squat name", Some(&a.heavy_squat_name)),
                    ("primary press name", Some(&a.primary_press_name)),
                    ("secondary press name", Some(&a.secondary_press_name)),
                    ("heavy pull name", Some(&a.heavy_pull_name)),
                    ("medium pull name", a.medium_pull_name.as_ref()),
                    ("light pull name", a.light_pull_name.as_ref()),
                ];
                for (field, name) in names {
                    if name.is_some_and(|n| n.trim().is_empty()) {
                        return Err(ProgramError::invalid(format!("{field} must not be blank")));
                    }
                }
                a.reductions.validate()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HlmWeights {
    Standard {
        squat: f64,
        pull: f64,
        press: f64,
    },
    Alternate {
        heavy_squat: f64,
        primary_press: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        secondary_press: Option<f64>,
        heavy_pull: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        medium_pull: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        light_pull: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseNames {
    pub heavy_squat: String,
    pub primary_press: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_press: Option<String>,
    pub heavy_pull: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_pull: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_pull: Option<String>,
}

/// A resolved exercise of one HLM session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlmExercise {
    pub intensity: Intensity,
    pub movement: Movement,
    pub name: String,
    pub scheme: String,
    pub load: f64,
    pub backoff: bool,
}

impl HlmExercise {
    fn line(&self, unit: WeightUnit) -> String {
        let mut line = format!(
            "{} {} {} - {}",
            self.intensity,
            self.name,
            self.scheme,
            fmt_load(self.load, LoadPrecision::Tenths, unit)
        );
        if self.backoff {
            line.push_str(", ");
            line.push_str(BACKOFF);
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlmSession {
    pub day: String,
    pub exercises: Vec<HlmExercise>,
}

/// A generated HLM week.
///
/// Field names follow the remote service's response so the same type
/// decodes remote results; `sessions` is only filled by the local engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlmProgram {
    pub template_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_names: Option<ExerciseNames>,
    pub weights: HlmWeights,
    pub reductions: Reductions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_text: Option<String>,
    pub schedule: Schedule,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<HlmSession>,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl HlmProgram {
    pub fn document(&self) -> Document {
        let line = |name: &str, load: f64| WeightLine {
            name: name.to_string(),
            annotation: Some("5s".into()),
            load,
            training_max: None,
        };
        let weights = match (&self.weights, &self.exercise_names) {
            (HlmWeights::Standard { squat, pull, press }, _) => vec![
                line("Squat", *squat),
                line("Press", *press),
                line("Deadlift", *pull),
            ],
            (
                HlmWeights::Alternate {
                    heavy_squat,
                    primary_press,
                    secondary_press,
                    heavy_pull,
                    ..
                },
                names,
            ) => {
                let names = names.clone().unwrap_or_else(|| ExerciseNames {
                    heavy_squat: "Squat".into(),
                    primary_press: "Press".into(),
                    secondary_press: None,
                    heavy_pull: "Deadlift".into(),
                    medium_pull: None,
                    light_pull: None,
                });
                let mut lines = vec![
                    line(&names.heavy_squat, *heavy_squat),
                    line(&names.primary_press, *primary_press),
                ];
                if let Some(w) = secondary_press {
                    let name = names.secondary_press.as_deref().unwrap_or("Secondary Press");
                    lines.push(line(name, *w));
                }
                lines.push(line(&names.heavy_pull, *heavy_pull));
                lines
            }
        };
        Document {
            title: format!("HLM: {}", self.template_name),
            unit: self.unit,
            precision: LoadPrecision::Tenths,
            weights,
            reductions: Some(self.reductions),
            accessories: self.header_text.clone(),
            schedule: self.schedule.clone(),
        }
    }

    pub fn to_text(&self) -> String {
        formatter::format(&self.document())
    }
}

/// Load for a derived slot: heavy days lift the max itself.
fn slot_load(max: f64, intensity: Intensity, reductions: &Reductions) -> f64 {
    match intensity {
        Intensity::Heavy => max,
        _ => round_load(max * reductions.fraction(intensity)),
    }
}

fn exercise(slot: &HlmSlot, name: &str, load: f64) -> HlmExercise {
    HlmExercise {
        intensity: slot.intensity,
        movement: slot.movement,
        name: name.to_string(),
        scheme: slot.scheme.to_string(),
        load,
        backoff: slot.backoff,
    }
}

fn standard_sessions(s: &StandardInputs) -> Vec<HlmSession> {
    HLM_WEEK
        .iter()
        .map(|(day, slots)| HlmSession {
            day: day.to_string(),
            exercises: slots
                .iter()
                .map(|slot| {
                    let (name, max) = match slot.movement {
                        Movement::Squat => ("Squat", s.squat),
                        Movement::Press => ("Press", s.press),
                        Movement::Pull => ("Pull", s.pull),
                    };
                    exercise(slot, name, slot_load(max, slot.intensity, &s.reductions))
                })
                .collect(),
        })
        .collect()
}

fn alternate_pull(a: &AlternateInputs, slot: &HlmSlot) -> HlmExercise {
    let over = match slot.intensity {
        Intensity::Heavy => None,
        Intensity::Medium => a.medium_pull.map(|w| (w, a.medium_pull_name.as_deref())),
        Intensity::Light => a.light_pull.map(|w| (w, a.light_pull_name.as_deref())),
    };
    match over {
        Some((load, name)) => exercise(slot, name.unwrap_or(&a.heavy_pull_name), load),
        None => exercise(
            slot,
            &a.heavy_pull_name,
            slot_load(a.pull, slot.intensity, &a.reductions),
        ),
    }
}

fn alternate_press(a: &AlternateInputs, slot: &HlmSlot, day_index: usize) -> HlmExercise {
    // Odd days hand the press slot to the secondary press when one is given.
    match a.secondary_press {
        Some(load) if day_index % 2 == 1 => HlmExercise {
            intensity: Intensity::Heavy,
            movement: Movement::Press,
            name: a.secondary_press_name.clone(),
            scheme: SECONDARY_PRESS_SCHEME.to_string(),
            load,
            backoff: true,
        },
        _ => exercise(
            slot,
            &a.primary_press_name,
            slot_load(a.primary_press, slot.intensity, &a.reductions),
        ),
    }
}

fn alternate_sessions(a: &AlternateInputs) -> Vec<HlmSession> {
    HLM_WEEK
        .iter()
        .enumerate()
        .map(|(idx, (day, slots))| HlmSession {
            day: day.to_string(),
            exercises: slots
                .iter()
                .map(|slot| match slot.movement {
                    Movement::Squat => exercise(
                        slot,
                        &a.heavy_squat_name,
                        slot_load(a.squat, slot.intensity, &a.reductions),
                    ),
                    Movement::Press => alternate_press(a, slot, idx),
                    Movement::Pull => alternate_pull(a, slot),
                })
                .collect(),
        })
        .collect()
}

fn schedule_from(sessions: &[HlmSession], unit: WeightUnit) -> Schedule {
    Schedule(
        sessions
            .iter()
            .map(|s| Day {
                label: s.day.clone(),
                entries: s.exercises.iter().map(|e| e.line(unit)).collect(),
            })
            .collect(),
    )
}

/// Build one HLM week from validated inputs.
pub fn assemble_hlm(inputs: &HlmInputs) -> Result<HlmProgram, ProgramError> {
    inputs.validate()?;
    let unit = inputs.unit();
    let program = match inputs {
        HlmInputs::Standard(s) => {
            let sessions = standard_sessions(s);
            HlmProgram {
                template_name: STANDARD_TEMPLATE_NAME.into(),
                exercise_names: None,
                weights: HlmWeights::Standard {
                    squat: s.squat,
                    pull: s.pull,
                    press: s.press,
                },
                reductions: s.reductions,
                header_text: s.header_text.clone(),
                schedule: schedule_from(&sessions, unit),
                sessions,
                unit,
            }
        }
        HlmInputs::Alternate(a) => {
            let sessions = alternate_sessions(a);
            HlmProgram {
                template_name: ALTERNATE_TEMPLATE_NAME.into(),
                exercise_names: Some(ExerciseNames {
                    heavy_squat: a.heavy_squat_name.clone(),
                    primary_press: a.primary_press_name.clone(),
                    secondary_press: a.secondary_press.map(|_| a.secondary_press_name.clone()),
                    heavy_pull: a.heavy_pull_name.clone(),
                    medium_pull: a.medium_pull.and(a.medium_pull_name.clone()),
                    light_pull: a.light_pull.and(a.light_pull_name.clone()),
                }),
                weights: HlmWeights::Alternate {
                    heavy_squat: a.squat,
                    primary_press: a.primary_press,
                    secondary_press: a.secondary_press,
                    heavy_pull: a.pull,
                    medium_pull: a.medium_pull,
                    light_pull: a.light_pull,
                },
                reductions: a.reductions,
                header_text: a.header_text.clone(),
                schedule: schedule_from(&sessions, unit),
                sessions,
                unit,
            }
        }
    };
    log::info!(
        "Assembled {} ({} days)",
        program.template_name,
        program.schedule.len()
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(squat: f64) -> HlmInputs {
        HlmInputs::Standard(StandardInputs {
            squat,
            press: 60.0,
            pull: 160.0,
            reductions: Reductions {
                medium: 0.10,
                light: 0.20,
            },
            header_text: None,
            unit: WeightUnit::Kg,
        })
    }

    fn load_of(program: &HlmProgram, intensity: Intensity, movement: Movement) -> f64 {
        program
            .sessions
            .iter()
            .flat_map(|s| s.exercises.iter())
            .find(|e| e.intensity == intensity && e.movement == movement)
            .map(|e| e.load)
            .unwrap()
    }

    #[test]
    fn standard_squat_loads() {
        let program = assemble_hlm(&standard(120.0)).unwrap();
        assert_eq!(load_of(&program, Intensity::Heavy, Movement::Squat), 120.0);
        assert_eq!(load_of(&program, Intensity::Medium, Movement::Squat), 108.0);
        assert_eq!(load_of(&program, Intensity::Light, Movement::Squat), 96.0);
    }

    #[test]
    fn standard_schedule_lines() {
        let program = assemble_hlm(&standard(120.0)).unwrap();
        let labels: Vec<_> = program.schedule.days().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Mon", "Wed", "Fri"]);
        assert_eq!(
            program.schedule.day("Mon").unwrap().entries,
            vec![
                "Heavy Squat 1x1-5 - 120.0 kg, 4x5 Backoff",
                "Medium Press 4x5 - 54.0 kg",
                "Light Pull 3x3-5 - 128.0 kg",
            ]
        );
        assert_eq!(
            program.schedule.day("Fri").unwrap().entries[1],
            "Heavy Press 1x1-5 - 60.0 kg, 4x5 Backoff"
        );
    }

    #[test]
    fn standard_text_has_all_blocks() {
        let mut inputs = standard(120.0);
        if let HlmInputs::Standard(s) = &mut inputs {
            s.header_text = Some("Chins 3x8".into());
        }
        let text = assemble_hlm(&inputs).unwrap().to_text();
        assert!(text.starts_with("HLM: HLM Standard 5s\n\nWeights:\n  Squat (5s) - 120.0 kg\n"));
        assert!(text.contains("  Deadlift (5s) - 160.0 kg\n"));
        assert!(text.contains("Reductions:\n  Medium Reduction - 10.0%\n  Light Reduction - 20.0%\n"));
        assert!(text.contains("Accessories:\n  Chins 3x8\n\nMon:\n"));
    }

    #[test]
    fn reductions_out_of_range_are_rejected() {
        for (medium, light) in [(0.0, 0.2), (0.1, 1.0), (-0.1, 0.2), (0.1, 1.5)] {
            let inputs = HlmInputs::Standard(StandardInputs {
                squat: 120.0,
                press: 60.0,
                pull: 160.0,
                reductions: Reductions { medium, light },
                header_text: None,
                unit: WeightUnit::Kg,
            });
            assert!(matches!(
                assemble_hlm(&inputs),
                Err(ProgramError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn non_positive_max_is_rejected() {
        assert!(assemble_hlm(&standard(0.0)).is_err());
    }

    fn alternate() -> AlternateInputs {
        AlternateInputs {
            squat: 120.0,
            primary_press: 60.0,
            secondary_press: Some(40.0),
            secondary_press_name: "Weighted Dips".into(),
            pull: 160.0,
            ..AlternateInputs::default()
        }
    }

    #[test]
    fn alternate_rotates_secondary_press_onto_odd_day() {
        let program = assemble_hlm(&HlmInputs::Alternate(alternate())).unwrap();
        let mon = &program.schedule.day("Mon").unwrap().entries;
        let wed = &program.schedule.day("Wed").unwrap().entries;
        let fri = &program.schedule.day("Fri").unwrap().entries;
        assert_eq!(mon[1], "Medium OHP 4x5 - 54.0 kg");
        assert_eq!(wed[1], "Heavy Weighted Dips 1x5 - 40.0 kg, 4x5 Backoff");
        assert_eq!(fri[1], "Heavy OHP 1x1-5 - 60.0 kg, 4x5 Backoff");
    }

    #[test]
    fn alternate_without_secondary_uses_light_primary() {
        let inputs = AlternateInputs {
            secondary_press: None,
            ..alternate()
        };
        let program = assemble_hlm(&HlmInputs::Alternate(inputs)).unwrap();
        assert_eq!(
            program.schedule.day("Wed").unwrap().entries[1],
            "Light OHP 3x5 - 48.0 kg"
        );
        assert_eq!(program.exercise_names.unwrap().secondary_press, None);
    }

    #[test]
    fn alternate_pull_overrides() {
        let inputs = AlternateInputs {
            heavy_squat_name: "Front Squat".into(),
            medium_pull: Some(140.0),
            medium_pull_name: Some("Rack Pull".into()),
            light_pull: Some(100.0),
            light_pull_name: None,
            ..alternate()
        };
        let program = assemble_hlm(&HlmInputs::Alternate(inputs)).unwrap();
        let mon = &program.schedule.day("Mon").unwrap().entries;
        let fri = &program.schedule.day("Fri").unwrap().entries;
        assert_eq!(mon[0], "Heavy Front Squat 1x1-5 - 120.0 kg, 4x5 Backoff");
        assert_eq!(mon[2], "Light Deadlift 3x3-5 - 100.0 kg");
        assert_eq!(fri[2], "Medium Rack Pull 3x4-5 - 140.0 kg");
    }

    #[test]
    fn alternate_text_lists_named_weights() {
        let text = assemble_hlm(&HlmInputs::Alternate(alternate()))
            .unwrap()
            .to_text();
        assert!(text.starts_with("HLM: HLM 5s (Alternate Pressing)\n"));
        assert!(text.contains(
            "Weights:\n  Squat (5s) - 120.0 kg\n  OHP (5s) - 60.0 kg\n  Weighted Dips (5s) - 40.0 kg\n  Deadlift (5s) - 160.0 kg\n"
        ));
    }

    #[test]
    fn blank_name_is_rejected() {
        let inputs = AlternateInputs {
            primary_press_name: "  ".into(),
            ..alternate()
        };
        assert!(assemble_hlm(&HlmInputs::Alternate(inputs)).is_err());
    }

    #[test]
    fn program_json_matches_service_shape() {
        let program = assemble_hlm(&standard(120.0)).unwrap();
        let json = serde_json::to_value(&program).unwrap();
        assert_eq!(json["template_name"], "HLM Standard 5s");
        assert_eq!(json["weights"]["squat"], 120.0);
        assert_eq!(json["reductions"]["light"], 0.2);
        assert!(json["schedule"]["Mon"].is_array());
        assert!(json.get("exercise_names").is_none());

        let back: HlmProgram = serde_json::from_value(json).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn identical_inputs_give_identical_text() {
        let a = assemble_hlm(&HlmInputs::Alternate(alternate())).unwrap().to_text();
        let b = assemble_hlm(&HlmInputs::Alternate(alternate())).unwrap().to_text();
        assert_eq!(a, b);
    }
}
