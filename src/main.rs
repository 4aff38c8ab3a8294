//! PlaceDash - placement records dashboard
//!
//! A CLI tool that loads student placement records from a CSV file,
//! renders summary statistics and charts, and appends new records
//! through a validated form.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable or corrupt data file, bad config, etc.)
//!   2 - Record rejected because a required field was empty

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod presenter;
mod report;
mod store;

use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use config::{Config, ConfigSource, DashboardConfig};
use error::PlacementError;
use presenter::{DashboardView, Notice, RenderPass};
use std::path::Path;
use store::CsvStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_REJECTED: i32 = 2;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_FAILURE);
    }

    // Handle init-config early (no config or logging needed)
    if matches!(args.command, Some(Command::InitConfig)) {
        return handle_init_config();
    }

    // Configuration decides the log level, so it is loaded before logging starts
    let (mut config, source) = match Config::resolve(args.config.as_deref(), Path::new(".")) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("PlaceDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match source {
        ConfigSource::File(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::Ignored(e) => warn!("Failed to load config: {:#}", e),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
    }

    match run(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(error_exit_code(&e));
        }
    }
}

/// Handle init-config: generate a default .placedash.toml.
fn handle_init_config() -> Result<()> {
    match Config::write_default(Path::new(".")) {
        Ok(path) => {
            println!("✅ Created {} with default settings.", path.display());
            println!("   Edit it to change the data file, title, and chart fields.");
            Ok(())
        }
        Err(e) => {
            eprintln!("⚠️  {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr; stdout carries the rendered dashboard.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run one render pass and return the exit code.
///
/// `init-config` never gets here; it is handled before configuration loads.
fn run(args: &Args, config: &Config) -> Result<i32> {
    let store = CsvStore::new(&config.store.data_file);
    let data_label = config.store.data_file.display().to_string();

    if let Some(Command::Add { show, .. }) = &args.command {
        let pass = presenter::render_pass(
            &store,
            &config.dashboard,
            &data_label,
            args.submission(),
        )
        .with_context(|| format!("Failed to update {}", data_label))?;

        let report = add_report(&pass, &config.dashboard, *show)?;
        print!("{}", report.stdout);
        eprint!("{}", report.stderr);
        return Ok(report.exit_code);
    }

    let output = match &args.command {
        Some(Command::Show { output, .. }) => output.as_deref(),
        _ => None,
    };

    let pass = presenter::render_pass(&store, &config.dashboard, &data_label, None)
        .with_context(|| format!("Failed to load {}", data_label))?;
    let rendered = render(&pass.view, &config.dashboard)?;
    write_output(&rendered, output)?;
    Ok(EXIT_SUCCESS)
}

/// What an `add` run prints, split by stream.
#[derive(Debug, Default)]
struct AddReport {
    stdout: String,
    stderr: String,
    exit_code: i32,
}

/// Lay out the result of an `add` pass.
///
/// With `show`, stdout holds the dashboard alone and the notice goes to stderr.
fn add_report(pass: &RenderPass, dashboard: &DashboardConfig, show: bool) -> Result<AddReport> {
    let mut report = AddReport {
        exit_code: notice_exit_code(pass.notice.as_ref()),
        ..AddReport::default()
    };

    if show {
        report.stdout.push_str(&render(&pass.view, dashboard)?);
    }

    match &pass.notice {
        Some(Notice::Success { message }) => {
            let stream = if show {
                &mut report.stderr
            } else {
                &mut report.stdout
            };
            stream.push_str(&format!("✅ {}\n", message));
        }
        Some(Notice::Error { message, missing }) => {
            let names: Vec<&str> = missing.iter().map(|f| f.header()).collect();
            report.stderr.push_str(&format!("❌ {}\n", message));
            report
                .stderr
                .push_str(&format!("   Missing: {}\n", names.join(", ")));
        }
        None => {}
    }

    Ok(report)
}

/// Exit code for the notice of a pass.
fn notice_exit_code(notice: Option<&Notice>) -> i32 {
    match notice {
        Some(Notice::Error { .. }) => EXIT_REJECTED,
        Some(Notice::Success { .. }) | None => EXIT_SUCCESS,
    }
}

/// Exit code for a failed run: rejected input is 2, everything else 1.
fn error_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PlacementError>() {
        Some(e) if e.is_user_error() => EXIT_REJECTED,
        _ => EXIT_FAILURE,
    }
}

/// Render the view in the configured format.
fn render(view: &DashboardView, dashboard: &DashboardConfig) -> Result<String> {
    Ok(match dashboard.format {
        OutputFormat::Markdown => report::generate_markdown_dashboard(view, dashboard.bar_width),
        OutputFormat::Text => report::generate_text_dashboard(view, dashboard.bar_width),
        OutputFormat::Json => {
            let mut json = report::generate_json_dashboard(view)?;
            json.push('\n');
            json
        }
    })
}

/// Print to stdout or write to a file.
fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            println!("✅ Dashboard saved to: {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{record, Field, Table};
    use crate::presenter::Submission;
    use crate::store::{MemoryStore, RecordStore};

    fn asha() -> Submission {
        Submission {
            year: "2023".to_string(),
            serial_number: "1".to_string(),
            roll_number: "R1".to_string(),
            student_name: "Asha".to_string(),
            branch: "CSE".to_string(),
            employer_name: "Acme".to_string(),
        }
    }

    fn json_settings() -> DashboardConfig {
        DashboardConfig {
            format: OutputFormat::Json,
            ..DashboardConfig::default()
        }
    }

    fn add_pass(store: &MemoryStore, submission: Submission) -> RenderPass {
        presenter::render_pass(store, &json_settings(), "data.csv", Some(submission)).unwrap()
    }

    #[test]
    fn test_add_show_json_stdout_is_only_json() {
        let store = MemoryStore::new(Table::from(vec![record(
            "2022", "1", "R0", "Dev", "ME", "Hooli",
        )]));
        let pass = add_pass(&store, asha());

        let report = add_report(&pass, &json_settings(), true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&report.stdout).unwrap();

        assert_eq!(parsed["summary"]["total_students"], 1);
        assert!(report.stderr.contains("Record added successfully!"));
        assert_eq!(report.exit_code, EXIT_SUCCESS);
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_add_without_show_prints_notice() {
        let store = MemoryStore::default();
        let pass = add_pass(&store, asha());

        let report = add_report(&pass, &json_settings(), false).unwrap();
        assert!(report.stdout.starts_with("✅ Record added successfully!"));
        assert!(report.stderr.is_empty());
        assert_eq!(report.exit_code, EXIT_SUCCESS);
    }

    #[test]
    fn test_add_rejected_submission_exits_2() {
        let store = MemoryStore::default();
        let pass = add_pass(
            &store,
            Submission {
                employer_name: String::new(),
                ..asha()
            },
        );

        let report = add_report(&pass, &json_settings(), true).unwrap();
        assert_eq!(report.exit_code, EXIT_REJECTED);
        assert!(serde_json::from_str::<serde_json::Value>(&report.stdout).is_ok());
        assert!(report.stderr.contains("Please fill in all fields."));
        assert!(report.stderr.contains("Missing: Name of the Employer"));
        assert_eq!(store.persist_count(), 0);
    }

    #[test]
    fn test_notice_exit_code() {
        let success = Notice::Success {
            message: "ok".to_string(),
        };
        let rejected = Notice::Error {
            message: "no".to_string(),
            missing: vec![Field::Year],
        };

        assert_eq!(notice_exit_code(None), EXIT_SUCCESS);
        assert_eq!(notice_exit_code(Some(&success)), EXIT_SUCCESS);
        assert_eq!(notice_exit_code(Some(&rejected)), EXIT_REJECTED);
    }

    #[test]
    fn test_error_exit_code() {
        let rejected = anyhow::Error::new(PlacementError::MissingFields(vec![Field::Branch]))
            .context("Failed to update data.csv");
        assert_eq!(error_exit_code(&rejected), EXIT_REJECTED);

        let unreadable = anyhow::Error::new(PlacementError::Read {
            path: "data.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "denied"),
        })
        .context("Failed to load data.csv");
        assert_eq!(error_exit_code(&unreadable), EXIT_FAILURE);

        assert_eq!(error_exit_code(&anyhow::anyhow!("bad config")), EXIT_FAILURE);
    }
}
