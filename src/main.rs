//! cyclecast - private cycle tracking from the command line

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cyclecast::commands::{self, Session};
use cyclecast::config::Settings;
use cyclecast::dates::{self, parse_date};
use cyclecast::models::SymptomType;
use cyclecast::storage::Vault;

#[derive(Parser)]
#[command(name = "cyclecast")]
#[command(version)]
#[command(about = "Private, on-device cycle tracking with adaptive predictions", long_about = None)]
struct Cli {
    /// Path to a configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "CYCLECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Vault passphrase
    #[arg(short, long, global = true, env = "CYCLECAST_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new encrypted vault
    Init,

    /// Mark a day as a period day
    LogDay {
        date: String,
        /// Unmark the day instead
        #[arg(long)]
        off: bool,
    },

    /// Mark a whole period starting on the given date
    FillPeriod { start: String },

    /// Record a period in the history directly
    AddPeriod {
        start: String,
        #[arg(long)]
        end: Option<String>,
    },

    /// Change the end date of a recorded period
    EditPeriod {
        start: String,
        /// New end date, omit to clear it
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete a recorded period and its logged days
    RemovePeriod { start: String },

    /// Set the lifestyle profile from a JSON file
    Lifestyle {
        file: Option<PathBuf>,
        /// Remove the stored profile
        #[arg(long, conflicts_with = "file")]
        clear: bool,
    },

    /// Log or remove a symptom
    Symptom {
        date: String,
        #[arg(value_parser = parse_symptom)]
        kind: SymptomType,
        #[arg(long)]
        intensity: Option<u8>,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        remove: bool,
    },

    /// Turn pregnancy mode on or off
    Pregnancy { mode: Toggle },

    /// Show the cycle pattern and regularity review
    Analyze,

    /// Predict the next period
    Predict,

    /// Show the cycle phase on a date
    Phase { date: String },

    /// Show the current fertility window
    Fertility,

    /// Forecast upcoming cycles
    Forecast {
        #[arg(long)]
        count: Option<u32>,
    },

    /// Show cycle statistics
    Stats,

    /// Show personalized insights
    Insights,

    /// Show today's overview
    Overview,

    /// Show or change preferences
    Settings {
        #[arg(long)]
        show_fertility: Option<bool>,
        #[arg(long)]
        forecast_cycles: Option<u32>,
    },

    /// Print the decrypted data as JSON
    Export,

    /// Delete all data permanently
    Wipe {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn parse_symptom(input: &str) -> Result<SymptomType, String> {
    serde_json::from_value(serde_json::Value::String(input.replace('-', "_")))
        .map_err(|_| format!("unknown symptom '{input}'"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_tracing(&settings.log_level);

    let today = match cli.today.as_deref() {
        Some(input) => parse_date(input)?,
        None => dates::today(),
    };
    let mut session = Session::new(Vault::from_settings(&settings), today);

    match cli.command {
        Command::Init => {
            if commands::is_setup(&session) {
                bail!("a vault already exists at {}", session.vault().path().display());
            }
            let passphrase = cli.passphrase.context("a passphrase is required")?;
            commands::setup(&mut session, passphrase, settings.forecast_cycles)?;
            info!("vault ready");
            Ok(())
        }
        Command::Wipe { yes } => {
            if !yes {
                bail!("refusing to wipe without --yes");
            }
            commands::wipe_all_data(&mut session)?;
            Ok(())
        }
        command => {
            if !commands::is_setup(&session) {
                bail!("no vault found, run `cyclecast init` first");
            }
            let passphrase = cli.passphrase.context("a passphrase is required")?;
            commands::unlock(&mut session, passphrase).context("could not unlock the vault")?;
            let result = run(&mut session, command);
            session.lock();
            result
        }
    }
}

fn run(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::LogDay { date, off } => print_json(&commands::log_day(session, &date, !off)?),
        Command::FillPeriod { start } => {
            print_json(&commands::log_predicted_period(session, &start)?)
        }
        Command::AddPeriod { start, end } => {
            let added = commands::add_period(session, &start, end.as_deref())?;
            if !added {
                println!("a period starting on {start} is already recorded");
            }
            Ok(())
        }
        Command::EditPeriod { start, end } => {
            if !commands::edit_period(session, &start, end.as_deref())? {
                bail!("no period starting on {start} is recorded");
            }
            Ok(())
        }
        Command::RemovePeriod { start } => {
            if !commands::remove_period(session, &start)? {
                bail!("no period starting on {start} is recorded");
            }
            Ok(())
        }
        Command::Lifestyle { file, clear } => {
            if clear {
                return Ok(commands::clear_lifestyle(session)?);
            }
            let Some(file) = file else {
                bail!("pass a JSON file or --clear");
            };
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            print_json(&commands::set_lifestyle(session, &json)?)
        }
        Command::Symptom {
            date,
            kind,
            intensity,
            notes,
            remove,
        } => {
            if remove {
                commands::remove_symptom(session, &date, kind)?;
            } else {
                commands::log_symptom(session, &date, kind, intensity, notes)?;
            }
            Ok(())
        }
        Command::Pregnancy { mode } => Ok(commands::set_pregnancy_mode(
            session,
            matches!(mode, Toggle::On),
        )?),
        Command::Analyze => print_json(&commands::analyze(session)?),
        Command::Predict => print_json(&commands::predict(session)?),
        Command::Phase { date } => print_json(&commands::phase(session, &date)?),
        Command::Fertility => print_json(&commands::fertility(session)?),
        Command::Forecast { count } => print_json(&commands::forecast(session, count)?),
        Command::Stats => print_json(&commands::stats(session)?),
        Command::Insights => print_json(&commands::insights(session)?),
        Command::Overview => print_json(&commands::overview(session)?),
        Command::Settings {
            show_fertility,
            forecast_cycles,
        } => {
            if show_fertility.is_none() && forecast_cycles.is_none() {
                return print_json(&commands::get_settings(session)?);
            }
            print_json(&commands::update_settings(session, show_fertility, forecast_cycles)?)
        }
        Command::Export => {
            println!("{}", commands::export_data(session)?);
            Ok(())
        }
        Command::Init | Command::Wipe { .. } => bail!("this command does not use an unlocked vault"),
    }
}
