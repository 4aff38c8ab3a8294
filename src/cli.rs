//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::presenter::Submission;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// PlaceDash - placement records dashboard
///
/// Renders summary statistics, the full record table, a per-branch bar
/// chart and an employer/branch/student breakdown from a CSV file, and
/// appends new records to it.
///
/// Examples:
///   placedash
///   placedash show --format text
///   placedash --data 2024.csv show --format json -o dashboard.json
///   placedash add --year 2023 --serial-no 1 --roll-no R1 --student Asha --branch CSE --employer Acme
///   placedash init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .placedash.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// CSV data file holding the placement records
    #[arg(short, long, value_name = "FILE", env = "PLACEDASH_DATA", global = true)]
    pub data: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands. Without one, the dashboard is shown.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the dashboard
    Show {
        /// Output format (markdown, text, json)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,

        /// Write the dashboard to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Add a placement record
    ///
    /// Every field is required; the record is rejected if any is empty.
    Add {
        #[arg(long, default_value = "")]
        year: String,

        #[arg(long, default_value = "")]
        serial_no: String,

        #[arg(long, default_value = "")]
        roll_no: String,

        /// Name of the student
        #[arg(long, default_value = "")]
        student: String,

        #[arg(long, default_value = "")]
        branch: String,

        /// Name of the employer
        #[arg(long, default_value = "")]
        employer: String,

        /// Also print the dashboard as loaded before this record was added
        #[arg(long)]
        show: bool,

        /// Output format for --show (markdown, text, json)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,
    },

    /// Generate a default .placedash.toml configuration file
    InitConfig,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// Plain terminal text
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if data.is_dir() {
                return Err(format!("Data file is a directory: {}", data.display()));
            }
        }

        if let Some(Command::Show {
            output: Some(ref output),
            ..
        }) = self.command
        {
            if output.is_dir() {
                return Err(format!("Output path is a directory: {}", output.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The form submission carried by `add`, if any.
    pub fn submission(&self) -> Option<Submission> {
        match &self.command {
            Some(Command::Add {
                year,
                serial_no,
                roll_no,
                student,
                branch,
                employer,
                ..
            }) => Some(Submission {
                year: year.clone(),
                serial_number: serial_no.clone(),
                roll_number: roll_no.clone(),
                student_name: student.clone(),
                branch: branch.clone(),
                employer_name: employer.clone(),
            }),
            _ => None,
        }
    }
}
