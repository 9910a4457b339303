//! HTTP client for the remote computation service.
//!
//! The service exposes the same three operations as the local engine.
//! Failures are reported once as [`ProgramError::Upstream`]; nothing is
//! retried.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ProgramError;
use crate::five_three_one::{FiveThreeOneInputs, FiveThreeOneResponse};
use crate::hlm::{HlmInputs, HlmProgram};
use crate::one_rm::{OneRmFormula, OneRmResponse};
use crate::templates::Template;

pub const DEFAULT_URL: &str = "http://localhost:9000";
pub const URL_ENV: &str = "IRON_CALCULATOR_URL";

/// Determine the service URL to use.
///
/// If the `IRON_CALCULATOR_URL` environment variable is set, its value takes
/// precedence over any URL provided in the settings.
pub fn resolve_base_url(settings_url: Option<&str>) -> Option<String> {
    std::env::var(URL_ENV)
        .ok()
        .or_else(|| settings_url.map(|s| s.to_string()))
}

#[derive(Serialize)]
struct FslParams {
    sets: u32,
    reps: u32,
}

#[derive(Serialize)]
struct FiveThreeOneRequest<'a> {
    squat: f64,
    bench: f64,
    deadlift: f64,
    press: f64,
    training_max_percentage: f64,
    cycles: u32,
    templates: Vec<&'static str>,
    fsl_params: Option<FslParams>,
    header_text: Option<&'a str>,
}

impl<'a> From<&'a FiveThreeOneInputs> for FiveThreeOneRequest<'a> {
    fn from(inputs: &'a FiveThreeOneInputs) -> Self {
        let fsl_params = match inputs.template {
            Some(Template::Fsl { sets, reps }) => Some(FslParams { sets, reps }),
            _ => None,
        };
        Self {
            squat: inputs.maxes.squat,
            bench: inputs.maxes.bench,
            deadlift: inputs.maxes.deadlift,
            press: inputs.maxes.press,
            training_max_percentage: inputs.training_max_percentage,
            cycles: inputs.cycles,
            templates: inputs.template.iter().map(|t| t.name()).collect(),
            fsl_params,
            header_text: inputs.header_text.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct HlmStandardRequest {
    squat: f64,
    pull: f64,
    press: f64,
    medium_reduction: f64,
    light_reduction: f64,
}

#[derive(Serialize)]
struct HlmAlternateRequest<'a> {
    heavy_squat_name: &'a str,
    squat: f64,
    primary_press: f64,
    primary_press_name: &'a str,
    secondary_press: Option<f64>,
    secondary_press_name: &'a str,
    pull: f64,
    heavy_pull_name: &'a str,
    medium_pull: Option<f64>,
    medium_pull_name: Option<&'a str>,
    light_pull: Option<f64>,
    light_pull_name: Option<&'a str>,
    medium_reduction: f64,
    light_reduction: f64,
    header_text: Option<&'a str>,
}

#[derive(Serialize)]
struct OneRmRequest {
    weight: f64,
    reps: u32,
    formula: OneRmFormula,
}

/// Blocking client for one service base URL.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ProgramError> {
        let url = format!("{}{}", self.base_url, path);
        log::info!("POST {url}");
        let response = ureq::post(&url)
            .set("Accept", "application/json")
            .send_json(body);
        match response {
            Ok(r) => r.into_json::<T>().map_err(|e| ProgramError::Upstream {
                status: None,
                message: format!("invalid response body: {e}"),
            }),
            Err(ureq::Error::Status(code, r)) => {
                let body = r.into_string().unwrap_or_default();
                log::warn!("{url} returned HTTP {code}");
                Err(ProgramError::Upstream {
                    status: Some(code),
                    message: body,
                })
            }
            Err(e) => Err(ProgramError::Upstream {
                status: None,
                message: e.to_string(),
            }),
        }
    }

    pub fn generate_531(
        &self,
        inputs: &FiveThreeOneInputs,
    ) -> Result<FiveThreeOneResponse, ProgramError> {
        inputs.validate()?;
        self.post("/531", &FiveThreeOneRequest::from(inputs))
    }

    pub fn generate_hlm(&self, inputs: &HlmInputs) -> Result<HlmProgram, ProgramError> {
        inputs.validate()?;
        let mut program: HlmProgram = match inputs {
            HlmInputs::Standard(s) => self.post(
                "/hlm/standard",
                &HlmStandardRequest {
                    squat: s.squat,
                    pull: s.pull,
                    press: s.press,
                    medium_reduction: s.reductions.medium,
                    light_reduction: s.reductions.light,
                },
            )?,
            HlmInputs::Alternate(a) => self.post(
                "/hlm/alternate",
                &HlmAlternateRequest {
                    heavy_squat_name: &a.heavy_squat_name,
                    squat: a.squat,
                    primary_press: a.primary_press,
                    primary_press_name: &a.primary_press_name,
                    secondary_press: a.secondary_press,
                    secondary_press_name: &a.secondary_press_name,
                    pull: a.pull,
                    heavy_pull_name: &a.heavy_pull_name,
                    medium_pull: a.medium_pull,
                    medium_pull_name: a.medium_pull_name.as_deref(),
                    light_pull: a.light_pull,
                    light_pull_name: a.light_pull_name.as_deref(),
                    medium_reduction: a.reductions.medium,
                    light_reduction: a.reductions.light,
                    header_text: a.header_text.as_deref(),
                },
            )?,
        };
        program.unit = inputs.unit();
        // The standard endpoint does not echo accessory text back.
        if program.header_text.is_none() {
            if let HlmInputs::Standard(s) = inputs {
                program.header_text = s.header_text.clone();
            }
        }
        Ok(program)
    }

    pub fn estimate_1rm(
        &self,
        weight: f64,
        reps: u32,
        formula: OneRmFormula,
    ) -> Result<OneRmResponse, ProgramError> {
        formula.estimate(weight, reps)?;
        self.post(
            "/calc/1rm",
            &OneRmRequest {
                weight,
                reps,
                formula,
            },
        )
    }
}
