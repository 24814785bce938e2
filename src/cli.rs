//! Command-line front end over [`RsvpDesk`].

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::service::{DeskError, RsvpDesk, SubmitOutcome};
use crate::validation::RawSubmission;

/// Exit code for a submission that failed validation.
pub const EXIT_REJECTED: u8 = 2;
/// Exit code when listing or exporting an empty store.
pub const EXIT_NOT_FOUND: u8 = 3;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Desk(#[from] DeskError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),

    #[error("output error: {0}")]
    Csv(#[from] csv::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Desk(DeskError::NotFound) => EXIT_NOT_FOUND,
            _ => 1,
        }
    }
}

/// Collect and review RSVPs for a single event.
#[derive(Parser, Debug)]
#[command(name = "rsvp-desk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON file with event details and the data path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV file holding the RSVPs (overrides the config file)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the event details
    Event,

    /// Record one RSVP
    Submit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// "yes" or "no"
        #[arg(long)]
        attending: Option<String>,
        /// Extra guests, 0 to 5
        #[arg(long)]
        guests: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },

    /// Print totals and every RSVP, newest first
    List,

    /// Copy the RSVP file to a timestamped CSV
    Export {
        /// Directory to write into; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config = config.with_data_path(data);
    }
    let desk = RsvpDesk::new(config);

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Event => print_event(&desk, &mut stdout)?,
        Command::Submit {
            name,
            email,
            attending,
            guests,
            note,
        } => {
            let raw = RawSubmission {
                name,
                email,
                attending,
                guests,
                note,
            };
            if !submit(&desk, raw, &mut stdout)? {
                return Ok(ExitCode::from(EXIT_REJECTED));
            }
        }
        Command::List => list(&desk, &mut stdout)?,
        Command::Export { out } => export(&desk, out, &mut stdout)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn print_event(desk: &RsvpDesk, out: &mut impl Write) -> Result<(), CliError> {
    let event = desk.event();
    writeln!(out, "{}", event.title)?;
    writeln!(out, "{} · {}", event.date, event.time)?;
    writeln!(out, "{}", event.location)?;
    writeln!(out)?;
    writeln!(out, "{}", event.description)?;
    Ok(())
}

/// Returns whether the RSVP was accepted.
fn submit(desk: &RsvpDesk, raw: RawSubmission, out: &mut impl Write) -> Result<bool, CliError> {
    match desk.submit(raw)? {
        SubmitOutcome::Accepted(record) => {
            let event = desk.event();
            writeln!(
                out,
                "Thanks, {}! Your RSVP ({}) for {} on {} is recorded.",
                record.name, record.attending, event.title, event.date
            )?;
            Ok(true)
        }
        SubmitOutcome::Rejected { errors, .. } => {
            for (field, message) in &errors {
                eprintln!("{field}: {message}");
            }
            Ok(false)
        }
    }
}

fn list(desk: &RsvpDesk, out: &mut impl Write) -> Result<(), CliError> {
    let listing = desk.listing()?;
    writeln!(
        out,
        "attending: {}  declined: {}  confirmed guests: {}",
        listing.totals.yes, listing.totals.no, listing.totals.guests
    )?;

    let mut wtr = csv::Writer::from_writer(out);
    for record in &listing.records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn export(desk: &RsvpDesk, dir: Option<PathBuf>, out: &mut impl Write) -> Result<(), CliError> {
    let export = desk.export()?;
    match dir {
        Some(dir) => {
            let path = dir.join(&export.filename);
            std::fs::write(&path, &export.body)?;
            writeln!(out, "{}", path.display())?;
        }
        None => out.write_all(&export.body)?,
    }
    Ok(())
}
