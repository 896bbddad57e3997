// Report engine entry point
mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use engine::config::ReportSettings;
use engine::interactive::Session;
use engine::report::{energy, reservations};
use engine::RecordStore;
use shared::models::{HourlyReading, PhaseReading, Reservation};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Reports go to stdout, so logging stays on stderr and quiet unless RUST_LOG says otherwise.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let settings = ReportSettings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Reservations { file, has_header, details } => {
            let has_header = has_header || settings.reservation_has_header.unwrap_or(false);
            run_reservations(&file, has_header, details, &settings)
        }
        Commands::Weekly { files, output } => {
            let output = output.unwrap_or_else(|| settings.summary_file.clone());
            run_weekly(&files, &output, &settings)
        }
        Commands::Interactive { file, output } => {
            let output = output.unwrap_or_else(|| settings.report_file.clone());
            run_interactive(&file, output, &settings)
        }
    }
}

fn run_reservations(file: &Path, has_header: bool, details: bool, settings: &ReportSettings) -> anyhow::Result<()> {
    info!(path = %file.display(), details, "Reservation report");
    let store = RecordStore::<Reservation>::load_path(file, Some(has_header))
        .with_context(|| format!("loading reservations from '{}'", file.display()))?;

    let report = if details {
        reservations::render_cards(store.records(), &settings.currency_symbol)
    } else {
        reservations::render_overview(
            store.records(),
            settings.long_reservation_hours,
            &settings.currency_symbol,
        )
    };
    print!("{}", report);
    io::stdout().flush()?;
    Ok(())
}

fn run_weekly(files: &[PathBuf], output: &Path, settings: &ReportSettings) -> anyhow::Result<()> {
    info!(files = files.len(), output = %output.display(), "Weekly summary");
    let weeks = files
        .iter()
        .map(|file| {
            RecordStore::<PhaseReading>::load_path(file, settings.energy_has_header)
                .with_context(|| format!("loading phase log '{}'", file.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let summary = energy::render_weekly_summary(&weeks);
    std::fs::write(output, &summary).with_context(|| format!("writing summary to '{}'", output.display()))?;
    println!("{}", summary);
    Ok(())
}

fn run_interactive(file: &Path, report_file: PathBuf, settings: &ReportSettings) -> anyhow::Result<()> {
    info!(path = %file.display(), "Interactive session");
    let store = RecordStore::<HourlyReading>::load_path(file, settings.energy_has_header)
        .with_context(|| format!("loading hourly log '{}'", file.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(stdin.lock(), stdout.lock(), &store, report_file).run()?;
    Ok(())
}
