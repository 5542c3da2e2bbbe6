//! recovery-admin: maintenance commands for derived post-surgery days.
//!
//! - `rederive`: recompute stored days for one user or everyone
//! - `set-surgery-date`: correct a patient's day 0
//! - `reschedule`: move one record to a new event time
//! - `summary`: per-day record counts for a user

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use recovery_tracker::db::{self, repository};
use recovery_tracker::models::RecordRef;
use recovery_tracker::recovery::{
    maintenance, parse_surgery_date, summary, writer, BackfillReport, RederivePolicy,
};
use recovery_tracker::{config, init_tracing};

#[derive(Parser)]
#[command(name = "recovery-admin")]
#[command(version, about = "Maintenance commands for derived post-surgery days")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, env = "RECOVERY_DB")]
    database: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recompute post-surgery days from current surgery dates
    #[command(group(ArgGroup::new("scope").required(true).args(["user", "all"])))]
    Rederive {
        /// Only this user's records
        #[arg(long)]
        user: Option<Uuid>,

        /// Every record in the database
        #[arg(long)]
        all: bool,
    },

    /// Set or clear the surgery date of a user's linked patient
    #[command(group(ArgGroup::new("value").required(true).args(["date", "clear"])))]
    SetSurgeryDate {
        #[arg(long)]
        user: Uuid,

        /// New surgery date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Remove the surgery date
        #[arg(long)]
        clear: bool,

        /// Re-derive the user's records in the same transaction
        #[arg(long)]
        rederive: bool,
    },

    /// Change the event time of one record
    Reschedule {
        #[arg(long)]
        record: Uuid,

        /// New event time (date, date-time or RFC 3339)
        #[arg(long)]
        at: String,
    },

    /// Per-day record counts for one user
    Summary {
        #[arg(long)]
        user: Uuid,

        /// Reference date for the current day (defaults to today)
        #[arg(long)]
        today: Option<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let path = cli.database.clone().unwrap_or_else(config::database_path);
    tracing::info!(path = %path.display(), "{} v{}", config::APP_NAME, config::APP_VERSION);
    let conn = db::open_database(&path)
        .with_context(|| format!("opening database at {}", path.display()))?;

    match cli.command {
        Command::Rederive { user, all: _ } => {
            let report = match user {
                Some(user) => maintenance::rederive_user(&conn, &user)?,
                None => maintenance::rederive_all(&conn)?,
            };
            print_report(&report, cli.json)?;
            Ok(exit_for(&report))
        }
        Command::SetSurgeryDate { user, date, clear: _, rederive } => {
            let surgery_date = date.as_deref().map(parse_surgery_date).transpose()?;
            let policy = if rederive { RederivePolicy::Immediate } else { RederivePolicy::Deferred };
            let change = maintenance::update_surgery_date(&conn, &user, surgery_date, policy)?;
            if cli.json {
                emit_json(&change)?;
            } else {
                println!(
                    "surgery date for {}: {} -> {}",
                    user,
                    fmt_date(change.previous),
                    fmt_date(change.current)
                );
                match &change.report {
                    Some(report) => print_report(report, false)?,
                    None if change.stale_records > 0 => println!(
                        "{} records are stale; run `recovery-admin rederive --user {}`",
                        change.stale_records, user
                    ),
                    None => {}
                }
            }
            Ok(change.report.as_ref().map(exit_for).unwrap_or(ExitCode::SUCCESS))
        }
        Command::Reschedule { record, at } => {
            let Some(kind) = repository::find_record_kind(&conn, &record)? else {
                bail!("no dated record with id {record}");
            };
            let day = writer::update_event_time(&conn, &RecordRef::new(kind, record), &at)?;
            if cli.json {
                emit_json(&serde_json::json!({ "record": record, "kind": kind, "post_surgery_day": day }))?;
            } else {
                println!("{kind} {record}: post-surgery day {}", fmt_day(day));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Summary { user, today } => {
            let today = match today {
                Some(s) => parse_surgery_date(&s)?,
                None => chrono::Local::now().date_naive(),
            };
            let overview = summary::recovery_summary(&conn, &user, today)?;
            if cli.json {
                emit_json(&overview)?;
            } else {
                println!(
                    "user {}: surgery {}, today is day {}",
                    user,
                    fmt_date(overview.surgery_date),
                    fmt_day(overview.current_day)
                );
                for kind in &overview.kinds {
                    let total: u32 = kind.days.iter().map(|d| d.records).sum();
                    println!(
                        "  {:<12} {:>5} records, latest day {}",
                        kind.kind.as_str(),
                        total,
                        fmt_day(kind.latest_day)
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_report(report: &BackfillReport, json: bool) -> anyhow::Result<()> {
    if json {
        return emit_json(report);
    }
    println!(
        "updated {} records ({} without surgery date) in {} ms",
        report.updated, report.without_surgery_date, report.duration_ms
    );
    for failure in &report.failed {
        println!("  failed {} (user {}): {}", failure.record, failure.user_id, failure.reason);
    }
    Ok(())
}

fn emit_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_for(report: &BackfillReport) -> ExitCode {
    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn fmt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "none".into())
}

fn fmt_day(day: Option<i64>) -> String {
    day.map(|d| d.to_string()).unwrap_or_else(|| "n/a".into())
}

