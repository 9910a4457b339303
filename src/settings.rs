use dirs_next as dirs;
use serde::{Deserialize, Serialize};

use crate::hlm::Reductions;
use crate::lifts::WeightUnit;
use crate::one_rm::OneRmFormula;
use crate::templates::Template;

/// How a generated program is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HlmVariant {
    #[default]
    Standard,
    Alternate,
}

fn default_training_max_percentage() -> f64 {
    90.0
}

fn default_cycles() -> u32 {
    1
}

/// Persistent defaults for the command line.
///
/// Stored as JSON in the platform configuration directory. Every field
/// falls back to its default when absent, so files written by older
/// versions keep loading. Command line flags override these values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub unit: WeightUnit,
    #[serde(default = "default_training_max_percentage")]
    pub training_max_percentage: f64,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
    /// Supplemental template; FSL carries its own sets and reps.
    #[serde(default)]
    pub template: Option<Template>,
    #[serde(default)]
    pub reductions: Reductions,
    #[serde(default)]
    pub hlm_variant: HlmVariant,
    #[serde(default)]
    pub one_rm_formula: OneRmFormula,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit: WeightUnit::default(),
            training_max_percentage: default_training_max_percentage(),
            cycles: default_cycles(),
            template: None,
            reductions: Reductions::default(),
            hlm_variant: HlmVariant::default(),
            one_rm_formula: OneRmFormula::default(),
            remote_url: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl Settings {
    const FILE: &'static str = "iron_calculator_settings.json";

    pub fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load settings from the JSON configuration file, or defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => {
                        log::debug!("loaded settings from {}", path.display());
                        return cfg;
                    }
                    Err(e) => log::warn!("ignoring malformed {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no configuration directory")
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(&path, data)?;
        log::info!("saved settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENV_MUTEX;
    use std::env;

    fn with_config_home<F: FnOnce()>(f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let prev_config = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        f();

        if let Some(val) = prev_config {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn empty_object_yields_defaults() {
        let loaded: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(loaded, Settings::default());
        assert_eq!(loaded.training_max_percentage, 90.0);
        assert_eq!(loaded.cycles, 1);
    }

    #[test]
    fn json_round_trip_keeps_template() {
        let s = Settings {
            unit: WeightUnit::Kg,
            template: Some(Template::Fsl { sets: 5, reps: 5 }),
            output_format: OutputFormat::Csv,
            remote_url: Some("http://localhost:9000".into()),
            ..Settings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"output_format\":\"csv\""));
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn settings_persist_in_config_dir() {
        with_config_home(|| {
            let mut s = Settings::default();
            s.cycles = 3;
            s.hlm_variant = HlmVariant::Alternate;
            s.save().unwrap();
            let loaded = Settings::load();
            assert_eq!(loaded.cycles, 3);
            assert_eq!(loaded.hlm_variant, HlmVariant::Alternate);

            let path = Settings::path().unwrap();
            std::fs::write(&path, "not json").unwrap();
            assert_eq!(Settings::load(), Settings::default());
        });
    }
}
