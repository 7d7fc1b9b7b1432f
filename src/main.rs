use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use roster_allocator::config::{load_settings, Settings};
use roster_allocator::display::{print_assignment, write_assignment_to_file};
use roster_allocator::parser::load_roster;
use roster_allocator::schedule_roster;
use roster_allocator::web;

#[derive(Parser)]
#[command(
    name = "roster-allocator",
    version,
    about = "Assigns attending staff to inbound/outbound front and back sections"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Allocate a CSV roster and print the result
    Allocate {
        /// Staff roster exported as CSV
        #[arg(long)]
        roster: PathBuf,
        /// JSON settings with the area capacities
        #[arg(long)]
        settings: PathBuf,
        /// Also write the report to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the allocation API
    Web {
        #[arg(long, env = "SCHEDULER_PORT", default_value_t = 8080)]
        port: u16,
        /// JSON settings providing the default vocabulary
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Web { port, settings } => {
            let settings = match settings {
                Some(path) => load_settings(path)?,
                None => Settings::default(),
            };

            println!("Starting web server on port {}...", port);
            println!("Access the API at http://localhost:{}/api/allocate", port);

            web::start_server(port, settings.vocabulary).await?;
        }
        Command::Allocate { roster, settings, output } => {
            let settings = load_settings(&settings)?;

            println!("Loading staff roster from CSV...");
            let entries = load_roster(&roster, &settings.columns)?;
            println!("Loaded {} roster entries", entries.len());

            let result = schedule_roster(&entries, &settings.area, &settings.vocabulary)?;
            print_assignment(&result, &settings.vocabulary);

            if let Some(path) = output {
                write_assignment_to_file(&result, &settings.vocabulary, &path)?;
                println!("Allocation saved to {}", path.display());
            }
        }
    }

    Ok(())
}
