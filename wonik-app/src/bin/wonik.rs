//! `wonik` — command-line front end for Wonik Health.
//!
//! Advice commands print the record as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use wonik_app::telemetry::init_tracing;
use wonik_app::{Advisor, HealthApi};
use wonik_core::{NewMedication, WonikConfig};

#[derive(Parser, Debug)]
#[command(name = "wonik", version, about = "Health reminders with local-model advice and offline fallback")]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path, overriding the configuration.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Work/rest recommendation for a condition.
    Recommend {
        subject: String,
        #[arg(long)]
        model: Option<String>,
    },
    /// Reference information for a medication.
    MedInfo {
        name: String,
        #[arg(long)]
        model: Option<String>,
    },
    /// Models installed on the inference server.
    Models,
    /// Whether the inference server is reachable.
    Status,
    /// Record a medication.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        dosage: String,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Recorded medications, newest first.
    List,
    /// Remove a recorded medication.
    Delete { id: String },
    /// Number of recorded medications.
    Count,
    /// Fetch medication info for a recorded medication and attach it.
    Attach {
        id: String,
        #[arg(long)]
        model: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<WonikConfig> {
    let mut config = match &cli.config {
        Some(path) => WonikConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => WonikConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.persistence.db_path.clone_from(db);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.general.log_level, config.general.log_json);

    let advisor = || Advisor::from_config(&config.llm, &config.recommendation);
    let open_api = || {
        HealthApi::from_config(&config)
            .with_context(|| format!("opening database {}", config.persistence.db_path))
    };

    match cli.command {
        Command::Recommend { subject, model } => {
            print_json(&advisor().get_recommendation(&subject, model.as_deref()).await)?;
        }
        Command::MedInfo { name, model } => {
            print_json(&advisor().get_medication_info(&name, model.as_deref()).await)?;
        }
        Command::Models => print_json(&advisor().list_models().await)?,
        Command::Status => {
            let available = advisor().probe_status().await;
            print_json(&serde_json::json!({ "available": available }))?;
        }
        Command::Add {
            name,
            dosage,
            time,
            notes,
        } => {
            let outcome = open_api()?.add_medication(&NewMedication {
                name,
                dosage,
                time,
                notes,
            });
            print_json(&outcome)?;
            if let Some(error) = outcome.error {
                bail!(error);
            }
        }
        Command::List => print_json(&open_api()?.medications())?,
        Command::Delete { id } => {
            let outcome = open_api()?.delete_medication(&id);
            print_json(&outcome)?;
            if let Some(error) = outcome.error {
                bail!(error);
            }
        }
        Command::Count => print_json(&serde_json::json!({ "total": open_api()?.medication_count() }))?,
        Command::Attach { id, model } => {
            let outcome = open_api()?.attach_medication_info(&id, model.as_deref()).await;
            print_json(&outcome)?;
            if let Some(error) = outcome.error {
                bail!(error);
            }
        }
    }

    Ok(())
}
