//! RunPlanner - Run Training Planner
//!
//! Command line entry point: create, extend and display session plans stored
//! as JSON records.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueHint};
use runplanner::planner::time::format_duration_hours;
use runplanner::planner::{timeline_csv, SegmentEdit, SessionEditor, TrainingSession};
use runplanner::storage::config::AppConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan run segments, timelines and effort", long_about = None)]
struct Cli {
    /// Config file (defaults to config.toml in the data directory)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recalculate a session and print its timeline
    Show {
        /// Session JSON record
        #[arg(value_hint = ValueHint::FilePath)]
        session: PathBuf,

        /// Override the start time (HH:MM)
        #[arg(long)]
        start: Option<String>,

        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Create a session holding only the start row
    New {
        /// Session name
        name: String,

        /// Planned date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Start time (HH:MM, defaults to the configured one)
        #[arg(long)]
        start: Option<String>,

        /// Where to write the session record
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Append a segment to a session
    Add {
        /// Session JSON record, rewritten in place
        #[arg(value_hint = ValueHint::FilePath)]
        session: PathBuf,

        /// Leg distance in km
        #[arg(long, default_value = "0")]
        dist: String,

        /// Leg climb in m
        #[arg(long, default_value = "0")]
        elev: String,

        /// Target intensity in effort points per hour
        #[arg(long, conflicts_with = "end")]
        eph: Option<String>,

        /// Fix the leg's end time (HH:MM)
        #[arg(long)]
        end: Option<String>,

        /// Segment name (defaults to the next letter)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting RunPlanner v{}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

    match cli.command {
        Command::Show {
            session,
            start,
            csv,
        } => show(&config, &session, start.as_deref(), csv),
        Command::New {
            name,
            date,
            start,
            output,
        } => new_session(&config, name, date, start.as_deref(), &output),
        Command::Add {
            session,
            dist,
            elev,
            eph,
            end,
            name,
        } => add_segment(&config, &session, &dist, &elev, eph, end, name),
    }
}

fn read_session(path: &Path) -> Result<TrainingSession> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    TrainingSession::from_json(&json)
        .with_context(|| format!("Failed to parse session {}", path.display()))
}

fn write_session(path: &Path, session: &TrainingSession) -> Result<()> {
    let json = session.to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote session to {}", path.display());
    Ok(())
}

fn show(config: &AppConfig, path: &Path, start: Option<&str>, csv: bool) -> Result<()> {
    let mut editor = SessionEditor::with_settings(read_session(path)?, &config.planner);
    if let Some(start) = start {
        editor.set_global_start(start)?;
    }
    let session = editor.into_session();

    if csv {
        print!("{}", timeline_csv(&session)?);
        return Ok(());
    }

    println!("{} ({})", session.name, session.date);
    println!(
        "{:<16} {:>8} {:>8} {:>6} {:>6} {:>8} {:>5} {:>5} {:>8} {:>6}",
        "Segment", "Dist km", "Elev m", "EP", "EPH", "Time", "Start", "End", "Total km", "Avg"
    );
    for segment in &session.segments {
        let eph = if segment.mode.is_fixed_duration() {
            "fixed".to_string()
        } else {
            format!("{:.1}", segment.target_eph())
        };
        println!(
            "{:<16} {:>8.2} {:>8.0} {:>6.1} {:>6} {:>8} {:>5} {:>5} {:>8.2} {:>6.1}",
            segment.name,
            segment.split_dist_km,
            segment.split_elev_m,
            segment.ep,
            eph,
            format_duration_hours(segment.target_time_hours),
            segment.start_time,
            segment.end_time,
            segment.total_dist_km,
            segment.accu_eph,
        );
    }

    let summary = session.summary;
    println!(
        "Total: {:.2} km, {:.0} m, {:.1} EP, {}",
        summary.total_distance,
        summary.total_elevation,
        summary.total_ep,
        format_duration_hours(summary.total_duration_hours)
    );
    Ok(())
}

fn new_session(
    config: &AppConfig,
    name: String,
    date: Option<NaiveDate>,
    start: Option<&str>,
    output: &Path,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let session = config.planner.new_session(name, date);

    let mut editor = SessionEditor::with_settings(session, &config.planner);
    if let Some(start) = start {
        editor.set_global_start(start)?;
    }
    write_session(output, &editor.into_session())
}

fn add_segment(
    config: &AppConfig,
    path: &Path,
    dist: &str,
    elev: &str,
    eph: Option<String>,
    end: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let mut editor = SessionEditor::with_settings(read_session(path)?, &config.planner);
    editor.append();
    let index = editor.len() - 1;

    editor.edit(index, SegmentEdit::DistanceKm(dist.to_string()))?;
    editor.edit(index, SegmentEdit::ElevationM(elev.to_string()))?;
    if let Some(name) = name {
        editor.edit(index, SegmentEdit::Name(name))?;
    }
    if let Some(eph) = eph {
        editor.edit(index, SegmentEdit::TargetEph(eph))?;
    }
    if let Some(end) = end {
        editor.edit(index, SegmentEdit::EndTime(end))?;
    }

    write_session(path, &editor.into_session())
}
