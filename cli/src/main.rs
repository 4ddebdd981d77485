//! Household scheduler command line
//!
//! Loads a household snapshot (JSON), runs one pass against an in-memory
//! store and prints the result as JSON on stdout. Logs go to stderr.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use household_scheduler_core::logging::{default_log_level, init_logging};
use household_scheduler_core::models::ObligationKey;
use household_scheduler_core::scheduler::ScheduleSnapshot;
use household_scheduler_core::{
    compare_strategies, plan, DebtState, HouseholdConfig, HouseholdSources, InMemoryScheduleStore,
    ScheduleStore, SplitDirective, TransactionRecord,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;

#[derive(Parser)]
#[command(name = "household-scheduler", version, about = "Household obligation scheduler")]
struct Cli {
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule obligations against income and compare payoff strategies
    Plan {
        /// Household snapshot file
        household: String,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Compare payoff strategies only
    Compare {
        household: String,
        /// Month zero of the simulation (defaults to the configured today)
        #[arg(long)]
        anchor: Option<NaiveDate>,
        #[arg(long)]
        pretty: bool,
    },
}

/// Household snapshot file layout
#[derive(Debug, Deserialize)]
struct HouseholdFile {
    config: HouseholdConfig,
    #[serde(default)]
    sources: HouseholdSources,
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
    #[serde(default)]
    splits: Vec<SplitDirective>,
    #[serde(default)]
    dismissed: Vec<ObligationKey>,
}

#[derive(Serialize)]
struct PlanReport<'a> {
    plan: &'a household_scheduler_core::SchedulePlan,
    fingerprint: String,
}

fn load(path: &str) -> Result<HouseholdFile, Box<dyn Error>> {
    let raw = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    let file: HouseholdFile = serde_json::from_str(&raw)?;
    file.config.validate()?;
    Ok(file)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn Error>> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level = cli
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level)?;

    match cli.cmd {
        Commands::Plan { household, pretty } => {
            let file = load(&household)?;
            let mut store = InMemoryScheduleStore::new();
            for key in &file.dismissed {
                store.dismiss(&file.config.household_id, key)?;
            }

            let result = plan(
                &file.config,
                &file.sources,
                &mut store,
                &file.transactions,
                &file.splits,
            )?;
            let snapshot = ScheduleSnapshot::capture(&file.config, &result.schedule)?;
            info!(
                "event=cli_plan household={} fingerprint={}",
                file.config.household_id, snapshot.fingerprint
            );

            print_json(
                &PlanReport {
                    plan: &result,
                    fingerprint: snapshot.fingerprint,
                },
                pretty,
            )?;
        }
        Commands::Compare {
            household,
            anchor,
            pretty,
        } => {
            let file = load(&household)?;
            let debts: Vec<DebtState> = file
                .sources
                .debts
                .iter()
                .filter(|debt| debt.validate().is_ok())
                .map(DebtState::from)
                .collect();
            let anchor = anchor.unwrap_or(file.config.today);
            let comparison = compare_strategies(&debts, file.config.extra_payment, anchor);
            print_json(&comparison, pretty)?;
        }
    }

    Ok(())
}
