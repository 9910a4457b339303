use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde::Serialize;

use iron_calculator::client::{RemoteClient, resolve_base_url};
use iron_calculator::export::{five_three_one_rows, hlm_rows, save_text, write_csv, write_json};
use iron_calculator::hlm::{AlternateInputs, HlmInputs, HlmProgram, StandardInputs};
use iron_calculator::lifts::{LiftMaxSet, WeightUnit};
use iron_calculator::one_rm::OneRmFormula;
use iron_calculator::report::build_html;
use iron_calculator::settings::{HlmVariant, OutputFormat, Settings};
use iron_calculator::templates::Template;
use iron_calculator::{FiveThreeOneInputs, assemble_531, assemble_hlm, estimate_1rm};

/// Strength program calculator.
#[derive(Parser, Debug)]
#[command(name = "iron-calculator", version)]
#[command(about = "Generate 5/3/1 and Heavy/Light/Medium programs and one-rep max tables")]
struct Cli {
    /// Output format (defaults to the saved setting)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Write output to this file instead of stdout
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Compute on a remote service at this base URL
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Ignore any configured remote service
    #[arg(long, global = true, action = ArgAction::SetTrue, conflicts_with = "remote")]
    local: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Wendler 5/3/1 cycles for squat, bench, deadlift and press
    #[command(name = "531")]
    FiveThreeOne(FiveThreeOneArgs),
    /// Heavy/Light/Medium three-day week
    Hlm(HlmArgs),
    /// Estimate a one-rep max and print a rep-max table
    #[command(name = "1rm")]
    OneRm(OneRmArgs),
    /// Show or update saved defaults
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TemplateChoice {
    None,
    Fsl,
    Widowmaker,
    Pyramid,
}

#[derive(Args, Debug)]
struct TemplateArgs {
    /// Supplemental template stacked on every lift-day
    #[arg(long, value_enum)]
    template: Option<TemplateChoice>,

    /// FSL sets (3-8)
    #[arg(long)]
    fsl_sets: Option<u32>,

    /// FSL reps (3-5)
    #[arg(long)]
    fsl_reps: Option<u32>,
}

impl TemplateArgs {
    /// Merge with the saved template. FSL parameters fall back to the saved
    /// FSL values, then to 5x5.
    fn resolve(&self, saved: Option<Template>) -> Option<Template> {
        let (saved_sets, saved_reps) = match saved {
            Some(Template::Fsl { sets, reps }) => (sets, reps),
            _ => (5, 5),
        };
        let choice = match self.template {
            Some(c) => c,
            None => match saved {
                Some(Template::Fsl { .. }) => TemplateChoice::Fsl,
                Some(Template::Widowmaker) => TemplateChoice::Widowmaker,
                Some(Template::Pyramid) => TemplateChoice::Pyramid,
                None if self.fsl_sets.is_some() || self.fsl_reps.is_some() => TemplateChoice::Fsl,
                None => TemplateChoice::None,
            },
        };
        match choice {
            TemplateChoice::None => None,
            TemplateChoice::Fsl => Some(Template::Fsl {
                sets: self.fsl_sets.unwrap_or(saved_sets),
                reps: self.fsl_reps.unwrap_or(saved_reps),
            }),
            TemplateChoice::Widowmaker => Some(Template::Widowmaker),
            TemplateChoice::Pyramid => Some(Template::Pyramid),
        }
    }
}

#[derive(Args, Debug)]
struct FiveThreeOneArgs {
    #[arg(long)]
    squat: f64,
    #[arg(long)]
    bench: f64,
    #[arg(long)]
    deadlift: f64,
    #[arg(long)]
    press: f64,

    /// Training max as a percentage of the one-rep max
    #[arg(long = "tm")]
    training_max_percentage: Option<f64>,

    #[arg(long)]
    cycles: Option<u32>,

    #[command(flatten)]
    template: TemplateArgs,

    /// Accessory text printed above the schedule
    #[arg(long)]
    header: Option<String>,

    #[arg(long, value_enum)]
    unit: Option<WeightUnit>,
}

#[derive(Args, Debug)]
struct HlmArgs {
    /// Program variant (defaults to the saved setting)
    #[arg(value_enum)]
    variant: Option<HlmVariant>,

    #[arg(long)]
    squat: f64,
    /// Press max (the primary press for the alternate variant)
    #[arg(long)]
    press: f64,
    #[arg(long)]
    pull: f64,

    /// Medium-day reduction as a fraction, e.g. 0.1
    #[arg(long)]
    medium: Option<f64>,
    /// Light-day reduction as a fraction, e.g. 0.2
    #[arg(long)]
    light: Option<f64>,

    #[arg(long)]
    header: Option<String>,

    #[arg(long, value_enum)]
    unit: Option<WeightUnit>,

    #[arg(long, default_value = "Squat")]
    squat_name: String,
    #[arg(long, default_value = "OHP")]
    press_name: String,
    /// Secondary press max rotated onto Wednesday (alternate only)
    #[arg(long)]
    secondary_press: Option<f64>,
    #[arg(long, default_value = "Bench Press")]
    secondary_press_name: String,
    #[arg(long, default_value = "Deadlift")]
    pull_name: String,
    /// Medium pull load override (alternate only)
    #[arg(long)]
    medium_pull: Option<f64>,
    #[arg(long)]
    medium_pull_name: Option<String>,
    /// Light pull load override (alternate only)
    #[arg(long)]
    light_pull: Option<f64>,
    #[arg(long)]
    light_pull_name: Option<String>,
}

impl HlmArgs {
    fn inputs(&self, settings: &Settings) -> HlmInputs {
        let mut reductions = settings.reductions;
        if let Some(m) = self.medium {
            reductions.medium = m;
        }
        if let Some(l) = self.light {
            reductions.light = l;
        }
        let unit = self.unit.unwrap_or(settings.unit);
        match self.variant.unwrap_or(settings.hlm_variant) {
            HlmVariant::Standard => {
                if self.secondary_press.is_some()
                    || self.medium_pull.is_some()
                    || self.light_pull.is_some()
                {
                    log::warn!("alternate-only options are ignored by the standard variant");
                }
                HlmInputs::Standard(StandardInputs {
                    squat: self.squat,
                    press: self.press,
                    pull: self.pull,
                    reductions,
                    header_text: self.header.clone(),
                    unit,
                })
            }
            HlmVariant::Alternate => HlmInputs::Alternate(AlternateInputs {
                squat: self.squat,
                heavy_squat_name: self.squat_name.clone(),
                primary_press: self.press,
                primary_press_name: self.press_name.clone(),
                secondary_press: self.secondary_press,
                secondary_press_name: self.secondary_press_name.clone(),
                pull: self.pull,
                heavy_pull_name: self.pull_name.clone(),
                medium_pull: self.medium_pull,
                medium_pull_name: self.medium_pull_name.clone(),
                light_pull: self.light_pull,
                light_pull_name: self.light_pull_name.clone(),
                reductions,
                header_text: self.header.clone(),
                unit,
            }),
        }
    }
}

#[derive(Args, Debug)]
struct OneRmArgs {
    #[arg(long)]
    weight: f64,
    #[arg(long)]
    reps: u32,
    #[arg(long, value_enum)]
    formula: Option<OneRmFormula>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(long, value_enum)]
    unit: Option<WeightUnit>,
    #[arg(long = "tm")]
    training_max_percentage: Option<f64>,
    #[arg(long)]
    cycles: Option<u32>,
    #[command(flatten)]
    template: TemplateArgs,
    #[arg(long)]
    medium: Option<f64>,
    #[arg(long)]
    light: Option<f64>,
    #[arg(long, value_enum)]
    hlm_variant: Option<HlmVariant>,
    #[arg(long, value_enum)]
    formula: Option<OneRmFormula>,
    /// Saved remote service URL
    #[arg(long)]
    remote_url: Option<String>,
    /// Forget the saved remote service URL
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "remote_url")]
    clear_remote: bool,
    /// Saved default output format
    #[arg(long, value_enum)]
    output_format: Option<OutputFormat>,
}

impl ConfigArgs {
    fn apply(&self, settings: &mut Settings) -> bool {
        let before = settings.clone();
        if let Some(u) = self.unit {
            settings.unit = u;
        }
        if let Some(p) = self.training_max_percentage {
            settings.training_max_percentage = p;
        }
        if let Some(c) = self.cycles {
            settings.cycles = c;
        }
        if self.template.template.is_some()
            || self.template.fsl_sets.is_some()
            || self.template.fsl_reps.is_some()
        {
            settings.template = self.template.resolve(settings.template);
        }
        if let Some(m) = self.medium {
            settings.reductions.medium = m;
        }
        if let Some(l) = self.light {
            settings.reductions.light = l;
        }
        if let Some(v) = self.hlm_variant {
            settings.hlm_variant = v;
        }
        if let Some(f) = self.formula {
            settings.one_rm_formula = f;
        }
        if let Some(url) = &self.remote_url {
            settings.remote_url = Some(url.clone());
        }
        if self.clear_remote {
            settings.remote_url = None;
        }
        if let Some(f) = self.output_format {
            settings.output_format = f;
        }
        *settings != before
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    write_json(value, &mut buf)?;
    buf.push(b'\n');
    String::from_utf8(buf).context("JSON output is not UTF-8")
}

fn to_csv<T: Serialize>(records: &[T]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            save_text(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn run_531(
    args: &FiveThreeOneArgs,
    settings: &Settings,
    format: OutputFormat,
    remote: Option<&RemoteClient>,
) -> Result<String> {
    let mut inputs = FiveThreeOneInputs::new(
        LiftMaxSet::new(args.squat, args.bench, args.deadlift, args.press),
        args.training_max_percentage
            .unwrap_or(settings.training_max_percentage),
        args.cycles.unwrap_or(settings.cycles),
    );
    inputs.template = args.template.resolve(settings.template);
    inputs.header_text = args.header.clone();
    inputs.unit = args.unit.unwrap_or(settings.unit);

    if let Some(client) = remote {
        let response = client.generate_531(&inputs)?;
        return match format {
            OutputFormat::Text => Ok(response.program.join("\n") + "\n"),
            OutputFormat::Json => to_json(&response),
            other => bail!("{other:?} output needs the local engine; drop --remote"),
        };
    }

    let program = assemble_531(&inputs)?;
    match format {
        OutputFormat::Text => Ok(program.to_text()),
        OutputFormat::Json => to_json(&program),
        OutputFormat::Csv => to_csv(&five_three_one_rows(&program)),
        OutputFormat::Html => Ok(build_html(&program.document()).into_string()),
    }
}

fn render_hlm(program: &HlmProgram, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(program.to_text()),
        OutputFormat::Json => to_json(program),
        OutputFormat::Csv => {
            if program.sessions.is_empty() {
                bail!("no per-exercise loads available for CSV output");
            }
            to_csv(&hlm_rows(program))
        }
        OutputFormat::Html => Ok(build_html(&program.document()).into_string()),
    }
}

fn run_hlm(
    args: &HlmArgs,
    settings: &Settings,
    format: OutputFormat,
    remote: Option<&RemoteClient>,
) -> Result<String> {
    let inputs = args.inputs(settings);
    let program = match remote {
        Some(client) => client.generate_hlm(&inputs)?,
        None => assemble_hlm(&inputs)?,
    };
    render_hlm(&program, format)
}

fn run_1rm(
    args: &OneRmArgs,
    settings: &Settings,
    format: OutputFormat,
    remote: Option<&RemoteClient>,
) -> Result<String> {
    let formula = args.formula.unwrap_or(settings.one_rm_formula);
    if let Some(client) = remote {
        let response = client.estimate_1rm(args.weight, args.reps, formula)?;
        return match format {
            OutputFormat::Text => Ok(response.formatted_table),
            OutputFormat::Json => to_json(&response),
            other => bail!("{other:?} output needs the local engine; drop --remote"),
        };
    }

    let table = estimate_1rm(args.weight, args.reps, formula)?;
    match format {
        OutputFormat::Text => Ok(table.formatted_table()),
        OutputFormat::Json => to_json(&table),
        OutputFormat::Csv => to_csv(&table.rows),
        OutputFormat::Html => bail!("HTML output is only available for programs"),
    }
}

fn run_config(args: &ConfigArgs, mut settings: Settings) -> Result<String> {
    if args.apply(&mut settings) {
        settings.save().context("Failed to save settings")?;
    }
    let mut text = match Settings::path() {
        Some(path) => format!("# {}\n", path.display()),
        None => String::new(),
    };
    text.push_str(&to_json(&settings)?);
    Ok(text)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::load();
    let format = cli.format.unwrap_or(settings.output_format);

    let remote = if cli.local {
        None
    } else {
        cli.remote
            .clone()
            .or_else(|| resolve_base_url(settings.remote_url.as_deref()))
            .map(RemoteClient::new)
    };
    if let Some(client) = &remote {
        log::info!("using remote service at {}", client.base_url());
    }

    let text = match &cli.command {
        Command::FiveThreeOne(args) => run_531(args, &settings, format, remote.as_ref())?,
        Command::Hlm(args) => run_hlm(args, &settings, format, remote.as_ref())?,
        Command::OneRm(args) => run_1rm(args, &settings, format, remote.as_ref())?,
        Command::Config(args) => run_config(args, settings)?,
    };
    emit(&text, cli.output.as_deref())
}
