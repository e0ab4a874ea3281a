//! mailcal command line interface
//!
//! Subcommands fall into two groups: direct calendar operations (`list`,
//! `create`, `get`, `delete`) and the bulletin pipeline (`parse`, `add`,
//! `process`). Configuration is loaded once at startup and passed down.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use mailcal_core::{
    BulletinExtractor, DuplicateReconciler, EventStore, IngestPipeline, Oracle,
};
use mailcal_domain::{AppConfig, CandidateEvent, MailcalError, RemoteEvent, TimedEventParams};
use mailcal_infra::GoogleCalendarStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mailcal")]
#[command(about = "Extract events from bulletin emails into Google Calendar")]
#[command(
    long_about = "Extracts calendar events from school bulletin emails using an LLM,\n\
    checks them against the calendar to avoid duplicates, and creates the rest.\n\
    Also provides direct list/create/get/delete access to the calendar."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List upcoming calendar events
    List {
        /// Maximum number of events to show.
        #[arg(long, default_value_t = 10)]
        max: usize,
    },

    /// Create a single timed event
    Create {
        /// Event title.
        #[arg(long)]
        summary: String,

        /// Start datetime, e.g. 2026-02-10T12:00 or 2026-02-10T12:00:00.
        /// Interpreted in the configured timezone.
        #[arg(long)]
        start: String,

        /// End datetime in the same format.
        #[arg(long)]
        end: String,

        /// Longer free-form text attached to the event.
        #[arg(long)]
        description: Option<String>,

        /// Where the event takes place.
        #[arg(long)]
        location: Option<String>,
    },

    /// Show one event by id
    Get {
        /// Event id as printed by `list`.
        #[arg(long)]
        id: String,
    },

    /// Delete one event by id
    Delete {
        /// Event id as printed by `list`.
        #[arg(long)]
        id: String,
    },

    /// Create events from a CSV file, skipping duplicates
    Add {
        /// CSV file with date,time,description,is_deadline columns.
        #[arg(value_name = "CSV")]
        file: PathBuf,
    },

    /// Extract events from a bulletin email into a CSV file
    Parse {
        /// Bulletin email in .eml format.
        #[arg(value_name = "EML")]
        file: PathBuf,

        /// Where to write the extracted events.
        #[arg(long, default_value = "events.csv")]
        output: PathBuf,
    },

    /// Extract events from a bulletin email and add them to the calendar
    Process {
        /// Bulletin email in .eml format.
        #[arg(value_name = "EML")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = mailcal_infra::config::load()?;
    validate_timezone(&config)?;
    debug!(calendar_id = %config.calendar_id, timezone = %config.timezone, "Configuration loaded");

    match cli.command {
        Commands::List { max } => list_events(&config, max).await?,
        Commands::Create { summary, start, end, description, location } => {
            create_event(&config, summary, &start, &end, description, location).await?;
        }
        Commands::Get { id } => show_event(&config, &id).await?,
        Commands::Delete { id } => delete_event(&config, &id).await?,
        Commands::Add { file } => add_from_csv(&config, &file).await?,
        Commands::Parse { file, output } => parse_bulletin(&config, &file, &output).await?,
        Commands::Process { file } => process_bulletin(&config, &file).await?,
    }

    Ok(())
}

fn validate_timezone(config: &AppConfig) -> anyhow::Result<()> {
    config
        .timezone
        .parse::<chrono_tz::Tz>()
        .map_err(|_| MailcalError::Config(format!("invalid timezone: {}", config.timezone)))?;
    Ok(())
}

fn store(config: &AppConfig) -> Arc<dyn EventStore> {
    Arc::new(GoogleCalendarStore::new(config))
}

fn oracle(config: &AppConfig) -> anyhow::Result<Arc<dyn Oracle>> {
    let resolved = config.oracle.resolve()?;
    Ok(mailcal_infra::create_oracle(&resolved)?)
}

/// Accept `YYYY-MM-DDTHH:MM` with optional seconds.
fn parse_cli_datetime(raw: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("invalid datetime '{raw}', expected YYYY-MM-DDTHH:MM[:SS]"))
}

async fn list_events(config: &AppConfig, max: usize) -> anyhow::Result<()> {
    let events = store(config).upcoming_events(Utc::now(), max).await?;

    if events.is_empty() {
        println!("No upcoming events found.");
        return Ok(());
    }
    for event in &events {
        println!("{}  {}  [id: {}]", event.start, event.title, event.id);
    }
    Ok(())
}

async fn create_event(
    config: &AppConfig,
    summary: String,
    start: &str,
    end: &str,
    description: Option<String>,
    location: Option<String>,
) -> anyhow::Result<()> {
    let params = TimedEventParams {
        title: summary,
        start: parse_cli_datetime(start)?,
        end: parse_cli_datetime(end)?,
        description,
        location,
        reminder: None,
    };

    let created = store(config).create_timed_event(params).await?;
    match created.html_link {
        Some(link) => println!("Event created: {link}"),
        None => println!("Event created: {}", created.id),
    }
    Ok(())
}

async fn show_event(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let event = store(config).get_event(id).await?;
    print_event(&event);
    Ok(())
}

fn print_event(event: &RemoteEvent) {
    println!("Summary:     {}", event.title);
    println!("Start:       {}", event.start);
    println!("End:         {}", event.end);
    if let Some(location) = &event.location {
        println!("Location:    {location}");
    }
    if let Some(description) = &event.description {
        println!("Description: {description}");
    }
    println!("ID:          {}", event.id);
}

async fn delete_event(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    store(config).delete_event(id).await?;
    println!("Event {id} deleted.");
    Ok(())
}

async fn add_from_csv(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let records = mailcal_infra::read_candidates(file)?;
    ingest(config, &records).await
}

async fn parse_bulletin(config: &AppConfig, file: &Path, output: &Path) -> anyhow::Result<()> {
    let records = extract_records(config, file).await?;
    mailcal_infra::write_candidates(output, &records)?;
    println!("Extracted {} events to {}", records.len(), output.display());
    Ok(())
}

async fn process_bulletin(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let records = extract_records(config, file).await?;

    // Same CSV round-trip as parse followed by add
    let intermediate = tempfile::Builder::new().suffix(".csv").tempfile()?;
    mailcal_infra::write_candidates(intermediate.path(), &records)?;
    let records = mailcal_infra::read_candidates(intermediate.path())?;

    println!("Extracted {} events", records.len());
    ingest(config, &records).await
}

async fn extract_records(config: &AppConfig, file: &Path) -> anyhow::Result<Vec<CandidateEvent>> {
    let text = mailcal_infra::read_eml(file)?;
    let extractor = BulletinExtractor::new(oracle(config)?);
    Ok(extractor.extract(&text).await?)
}

async fn ingest(config: &AppConfig, records: &[CandidateEvent]) -> anyhow::Result<()> {
    let pipeline = IngestPipeline::new(store(config), DuplicateReconciler::new(oracle(config)?));
    let summary = pipeline.run(records).await?;
    println!("Done. Created {}, skipped {}.", summary.created, summary.skipped);
    Ok(())
}
