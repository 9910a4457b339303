//! Strength program engine: Wendler 5/3/1 cycles, Heavy/Light/Medium weeks
//! and one-rep max estimation, with text, JSON, CSV and HTML output.

pub mod client;
pub mod error;
pub mod export;
pub mod five_three_one;
pub mod formatter;
pub mod hlm;
pub mod lifts;
pub mod one_rm;
pub mod percentages;
pub mod report;
pub mod sets;
pub mod settings;
pub mod templates;

#[cfg(test)]
pub(crate) static ENV_MUTEX: once_cell::sync::Lazy<std::sync::Mutex<()>> =
    once_cell::sync::Lazy::new(|| std::sync::Mutex::new(()));

pub use error::ProgramError;
pub use five_three_one::{FiveThreeOneInputs, FiveThreeOneProgram, assemble_531};
pub use hlm::{AlternateInputs, HlmInputs, HlmProgram, Reductions, StandardInputs, assemble_hlm};
pub use lifts::{Lift, LiftMaxSet, WeightUnit};
pub use one_rm::{OneRmFormula, OneRmTable, estimate_1rm};
pub use templates::Template;
