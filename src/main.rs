use clap::{Arg, ArgAction};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use farm_seed::config::{Settings, DEFAULT_CREDENTIALS_FILE, DEFAULT_DATABASE, EMULATOR_HOST_ENV};

fn parse_settings() -> (Settings, bool) {
    let matches = clap::Command::new("farm-seed")
        .about("Populate the document store with sample farm records")
        .arg(
            Arg::new("credentials")
                .short('k')
                .long("credentials")
                .value_name("PATH")
                .help("Path to the service account key JSON file")
                .default_value(DEFAULT_CREDENTIALS_FILE),
        )
        .arg(
            Arg::new("project")
                .short('p')
                .long("project")
                .value_name("PROJECT_ID")
                .help("Project to write to (defaults to the key's project_id)"),
        )
        .arg(
            Arg::new("database")
                .long("database")
                .value_name("DATABASE")
                .help("Database id within the project")
                .default_value(DEFAULT_DATABASE),
        )
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("SCENARIO")
                .help("Path to a YAML file describing the sample records"),
        )
        .arg(
            Arg::new("dry_run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Seed an in-memory store and print the documents instead"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose logging"),
        )
        .get_matches();

    let settings = Settings {
        credentials: matches
            .get_one::<String>("credentials")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE)),
        project: matches.get_one::<String>("project").cloned(),
        database: matches
            .get_one::<String>("database")
            .cloned()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        scenario: matches.get_one::<String>("scenario").map(PathBuf::from),
        emulator_host: std::env::var(EMULATOR_HOST_ENV)
            .ok()
            .filter(|h| !h.trim().is_empty()),
        dry_run: matches.get_flag("dry_run"),
    };

    (settings, matches.get_flag("verbose"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let (settings, verbose) = parse_settings();

    // Initialize logging; RUST_LOG wins over the flag
    let log_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Settings: {:?}", settings);

    match farm_seed::run(&settings).await {
        Ok(report) => {
            debug!("Wrote {}", report.document_paths().join(", "));
            println!("Seeding completed.");
            ExitCode::SUCCESS
        }
        Err(err) if err.is_precondition() => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            debug!("Seeding stopped: {:?}", err);
            eprintln!("Error seeding: {}", err);
            ExitCode::FAILURE
        }
    }
}
