use crate::five_three_one::FiveThreeOneProgram;
use crate::hlm::HlmProgram;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, writer: W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(writer, value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_json(value, file)
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn save_text<P: AsRef<Path>>(path: P, text: &str) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}

/// One prescribed set of a 5/3/1 program.
#[derive(Debug, Serialize, PartialEq)]
pub struct FiveThreeOneRow<'a> {
    pub cycle: u32,
    pub week: u8,
    pub day: u8,
    pub lift: &'a str,
    pub kind: &'a str,
    pub sets: u32,
    pub reps: String,
    pub percentage: f64,
    pub load: f64,
}

pub fn five_three_one_rows<'a>(program: &'a FiveThreeOneProgram) -> Vec<FiveThreeOneRow<'a>> {
    let mut rows = Vec::new();
    for week in &program.weeks {
        for day in &week.days {
            let row = |kind: &'a str, sets: u32, reps: String, percentage: f64, load: f64| FiveThreeOneRow {
                cycle: week.cycle,
                week: week.week,
                day: day.day,
                lift: day.lift.display_name(),
                kind,
                sets,
                reps,
                percentage,
                load,
            };
            for s in &day.main_sets {
                rows.push(row("main", 1, s.reps.to_string(), s.percentage, s.load));
            }
            if let Some(a) = &day.assistance {
                rows.push(row("assistance", a.sets, a.reps.to_string(), a.percentage, a.load));
            }
            if let Some(overlay) = &day.overlay {
                for w in &overlay.work {
                    rows.push(row(&overlay.template, w.sets, w.reps.to_string(), w.percentage, w.load));
                }
            }
        }
    }
    rows
}

/// One exercise of an HLM week.
#[derive(Debug, Serialize, PartialEq)]
pub struct HlmRow<'a> {
    pub day: &'a str,
    pub intensity: String,
    pub exercise: &'a str,
    pub scheme: &'a str,
    pub load: f64,
    pub backoff: bool,
}

pub fn hlm_rows(program: &HlmProgram) -> Vec<HlmRow<'_>> {
    program
        .sessions
        .iter()
        .flat_map(|s| {
            s.exercises.iter().map(move |e| HlmRow {
                day: &s.day,
                intensity: e.intensity.to_string(),
                exercise: &e.name,
                scheme: &e.scheme,
                load: e.load,
                backoff: e.backoff,
            })
        })
        .collect()
}

pub fn save_five_three_one_csv<P: AsRef<Path>>(
    path: P,
    program: &FiveThreeOneProgram,
) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, &five_three_one_rows(program))
}

pub fn save_hlm_csv<P: AsRef<Path>>(path: P, program: &HlmProgram) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, &hlm_rows(program))
}
