//! One-rep max estimation and rep-max tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProgramError, ensure_positive};

/// Rep counts listed in the rep-max table.
pub const REP_TARGETS: [u32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 13, 16, 20];

/// Available formulas for estimating a one-rep max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OneRmFormula {
    /// Epley formula: `weight * (1 + reps / 30)`.
    #[default]
    Epley,
    /// Brzycki formula: `weight * 36 / (37 - reps)`.
    Brzycki,
    /// Lombardi formula: `weight * reps^0.10`.
    Lombardi,
}

impl OneRmFormula {
    pub fn name(self) -> &'static str {
        match self {
            OneRmFormula::Epley => "Epley",
            OneRmFormula::Brzycki => "Brzycki",
            OneRmFormula::Lombardi => "Lombardi",
        }
    }

    /// Estimated one-rep max for `weight` lifted `reps` times.
    ///
    /// A single rep is already a max and is returned as-is.
    pub fn estimate(self, weight: f64, reps: u32) -> Result<f64, ProgramError> {
        ensure_positive("weight", weight)?;
        if reps == 0 {
            return Err(ProgramError::invalid("reps must be positive"));
        }
        if self == OneRmFormula::Brzycki && reps >= 37 {
            return Err(ProgramError::DivisionByZero { reps });
        }
        if reps == 1 {
            return Ok(weight);
        }
        let r = reps as f64;
        Ok(match self {
            OneRmFormula::Epley => weight * (1.0 + r / 30.0),
            OneRmFormula::Brzycki => weight * 36.0 / (37.0 - r),
            OneRmFormula::Lombardi => weight * r.powf(0.10),
        })
    }

    /// Inverse of [`estimate`](Self::estimate): load liftable for `reps`.
    pub fn weight_for_reps(self, one_rm: f64, reps: u32) -> f64 {
        if reps <= 1 {
            return one_rm;
        }
        let r = reps as f64;
        match self {
            OneRmFormula::Epley => one_rm / (1.0 + r / 30.0),
            OneRmFormula::Brzycki => one_rm * (37.0 - r) / 36.0,
            OneRmFormula::Lombardi => one_rm / r.powf(0.10),
        }
    }
}

impl fmt::Display for OneRmFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OneRmFormula {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "epley" => Ok(OneRmFormula::Epley),
            "brzycki" => Ok(OneRmFormula::Brzycki),
            "lombardi" => Ok(OneRmFormula::Lombardi),
            other => Err(ProgramError::invalid(format!(
                "unknown formula '{other}', use 'epley', 'brzycki' or 'lombardi'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmRow {
    pub reps: u32,
    pub percentage: f64,
    pub weight: f64,
    pub is_input: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneRmTable {
    pub formula: OneRmFormula,
    pub weight: f64,
    pub reps: u32,
    pub one_rm: f64,
    pub rows: Vec<RmRow>,
}

impl OneRmTable {
    pub fn formatted_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Estimated 1RM ({}): {:.1}\n\n", self.formula, self.one_rm));
        out.push_str("Reps    Percent Weight\n");
        out.push_str("------------------------\n");
        for row in &self.rows {
            let reps = format!("{}RM", row.reps);
            let pct = format!("{:.1}%", row.percentage);
            let arrow = if row.is_input { " <--" } else { "" };
            out.push_str(&format!("{reps:<7} {pct:<7} {:.1}{arrow}\n", row.weight));
        }
        out
    }
}

/// Response shape of the remote `estimate1RM` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneRmResponse {
    pub one_rm: f64,
    pub formatted_table: String,
}

impl From<&OneRmTable> for OneRmResponse {
    fn from(table: &OneRmTable) -> Self {
        Self {
            one_rm: table.one_rm,
            formatted_table: table.formatted_table(),
        }
    }
}

/// Estimate a one-rep max and tabulate the predicted rep maxes around it.
pub fn estimate_1rm(
    weight: f64,
    reps: u32,
    formula: OneRmFormula,
) -> Result<OneRmTable, ProgramError> {
    let one_rm = formula.estimate(weight, reps)?;
    let rows = REP_TARGETS
        .iter()
        .map(|&target| {
            let w = formula.weight_for_reps(one_rm, target);
            RmRow {
                reps: target,
                percentage: w / one_rm * 100.0,
                weight: w,
                is_input: target == reps,
            }
        })
        .collect();
    log::debug!("{formula} 1RM for {weight} x {reps}: {one_rm:.2}");
    Ok(OneRmTable {
        formula,
        weight,
        reps,
        one_rm,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn epley_five_reps() {
        let table = estimate_1rm(100.0, 5, OneRmFormula::Epley).unwrap();
        assert!(approx_eq(table.one_rm, 116.666_666, 1e-4));
        assert!(table.formatted_table().starts_with("Estimated 1RM (Epley): 116.7\n"));
    }

    #[test]
    fn brzycki_and_lombardi() {
        assert!(approx_eq(
            OneRmFormula::Brzycki.estimate(100.0, 5).unwrap(),
            112.5,
            1e-9
        ));
        assert!(approx_eq(
            OneRmFormula::Lombardi.estimate(100.0, 10).unwrap(),
            125.892_54,
            1e-4
        ));
    }

    #[test]
    fn brzycki_division_boundary() {
        assert_eq!(
            estimate_1rm(100.0, 37, OneRmFormula::Brzycki),
            Err(ProgramError::DivisionByZero { reps: 37 })
        );
        assert!(OneRmFormula::Brzycki.estimate(100.0, 40).is_err());
        let ok = estimate_1rm(100.0, 36, OneRmFormula::Brzycki).unwrap();
        assert!(approx_eq(ok.one_rm, 3600.0, 1e-9));
    }

    #[test]
    fn single_rep_is_the_max() {
        for formula in [OneRmFormula::Epley, OneRmFormula::Brzycki, OneRmFormula::Lombardi] {
            assert_eq!(formula.estimate(140.0, 1).unwrap(), 140.0);
        }
    }

    #[test]
    fn rejects_non_positive_input() {
        assert!(matches!(
            estimate_1rm(0.0, 5, OneRmFormula::Epley),
            Err(ProgramError::InvalidInput(_))
        ));
        assert!(matches!(
            estimate_1rm(100.0, 0, OneRmFormula::Lombardi),
            Err(ProgramError::InvalidInput(_))
        ));
        assert!(estimate_1rm(-20.0, 5, OneRmFormula::Brzycki).is_err());
    }

    #[test]
    fn table_marks_submitted_reps() {
        let table = estimate_1rm(100.0, 5, OneRmFormula::Epley).unwrap();
        assert_eq!(table.rows.len(), REP_TARGETS.len());
        let marked: Vec<_> = table.rows.iter().filter(|r| r.is_input).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].reps, 5);
        assert!(approx_eq(marked[0].weight, 100.0, 1e-9));

        let text = table.formatted_table();
        assert!(text.contains("1RM     100.0%  116.7\n"));
        assert!(text.contains("5RM     85.7%   100.0 <--\n"));
    }

    #[test]
    fn table_weights_decrease_with_reps() {
        for formula in [OneRmFormula::Epley, OneRmFormula::Brzycki, OneRmFormula::Lombardi] {
            let table = estimate_1rm(100.0, 8, formula).unwrap();
            for pair in table.rows.windows(2) {
                assert!(pair[1].weight < pair[0].weight);
            }
        }
    }

    #[test]
    fn formula_parses_case_insensitively() {
        assert_eq!("Epley".parse::<OneRmFormula>().unwrap(), OneRmFormula::Epley);
        assert_eq!(" BRZYCKI ".parse::<OneRmFormula>().unwrap(), OneRmFormula::Brzycki);
        assert!("wathan".parse::<OneRmFormula>().is_err());
    }
}
