//! Plain-text rendering of generated programs.
//!
//! Numbers are written with fixed decimal places only, never locale
//! formatting: percentages always get one decimal, loads get none (5/3/1)
//! or one (HLM).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::hlm::Reductions;
use crate::lifts::WeightUnit;
use crate::sets::{RepSpec, ResolvedSet, VolumeWork};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPrecision {
    Whole,
    Tenths,
}

pub fn fmt_load(load: f64, precision: LoadPrecision, unit: WeightUnit) -> String {
    match precision {
        LoadPrecision::Whole => format!("{load:.0} {unit}"),
        LoadPrecision::Tenths => format!("{load:.1} {unit}"),
    }
}

/// `0.1` -> `10.0%`
pub fn fmt_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Main sets on one line: `5× @ 132 lb, 5× @ 152 lb, 5+ @ 173 lb`.
pub fn fmt_main_sets(sets: &[ResolvedSet], unit: WeightUnit) -> String {
    sets.iter()
        .map(|s| {
            let reps = match s.reps {
                RepSpec::Exact(n) => format!("{n}×"),
                RepSpec::AtLeast(n) => format!("{n}+"),
            };
            format!("{reps} @ {}", fmt_load(s.load, LoadPrecision::Whole, unit))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Straight sets: `5×10 @ 102 lb`.
pub fn fmt_volume(work: &[VolumeWork], unit: WeightUnit) -> String {
    work.iter()
        .map(|w| {
            format!(
                "{}×{} @ {}",
                w.sets,
                w.reps,
                fmt_load(w.load, LoadPrecision::Whole, unit)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// One training day: a label and its exercise lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Day {
    pub label: String,
    pub entries: Vec<String>,
}

/// Ordered days of a program.
///
/// Serialized as a JSON object keyed by day label, in schedule order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schedule(pub Vec<Day>);

impl Schedule {
    pub fn days(&self) -> &[Day] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn day(&self, label: &str) -> Option<&Day> {
        self.0.iter().find(|d| d.label == label)
    }
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for day in &self.0 {
            map.serialize_entry(&day.label, &day.entries)?;
        }
        map.end()
    }
}

struct ScheduleVisitor;

impl<'de> Visitor<'de> for ScheduleVisitor {
    type Value = Schedule;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of day label to exercise lines")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schedule, A::Error> {
        let mut days = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((label, entries)) = access.next_entry::<String, Vec<String>>()? {
            days.push(Day { label, entries });
        }
        Ok(Schedule(days))
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ScheduleVisitor)
    }
}

/// One line of the `Weights:` block.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightLine {
    pub name: String,
    /// Rep annotation such as `5s`.
    pub annotation: Option<String>,
    pub load: f64,
    pub training_max: Option<f64>,
}

/// Everything the formatter needs to render a program.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub unit: WeightUnit,
    pub precision: LoadPrecision,
    pub weights: Vec<WeightLine>,
    pub reductions: Option<Reductions>,
    pub accessories: Option<String>,
    pub schedule: Schedule,
}

/// Render `doc` as the final text block.
pub fn format(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str(&doc.title);
    out.push_str("\n\n");

    out.push_str("Weights:\n");
    for w in &doc.weights {
        let load = fmt_load(w.load, doc.precision, doc.unit);
        let line = match (&w.annotation, w.training_max) {
            (Some(a), _) => format!("  {} ({a}) - {load}\n", w.name),
            (None, Some(tm)) => format!(
                "  {} - {load} (TM: {})\n",
                w.name,
                fmt_load(tm, doc.precision, doc.unit)
            ),
            (None, None) => format!("  {} - {load}\n", w.name),
        };
        out.push_str(&line);
    }
    out.push('\n');

    if let Some(r) = &doc.reductions {
        out.push_str("Reductions:\n");
        out.push_str(&format!("  Medium Reduction - {}\n", fmt_percentage(r.medium)));
        out.push_str(&format!("  Light Reduction - {}\n", fmt_percentage(r.light)));
        out.push('\n');
    }

    // Accessory text is passed through verbatim, one output line per '\n'.
    if let Some(text) = doc.accessories.as_deref().filter(|t| !t.is_empty()) {
        out.push_str("Accessories:\n");
        for line in text.split('\n') {
            out.push_str(&format!("  {line}\n"));
        }
        out.push('\n');
    }

    for day in doc.schedule.days() {
        out.push_str(&format!("{}:\n", day.label));
        for entry in &day.entries {
            out.push_str(&format!("  {entry}\n"));
        }
        out.push('\n');
    }
    out
}

static LOAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?) (?:lb|kg)\b").expect("valid load regex"));

/// Every load printed in `text`, in order of appearance.
pub fn parse_loads(text: &str) -> Vec<f64> {
    LOAD_RE
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}
