use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flatfile-reports")]
#[command(version)]
#[command(about = "Reports from reservation files and electricity logs")]
pub struct Cli {
    /// JSON settings file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Confirmed, long and unconfirmed reservations with total revenue
    Reservations {
        /// `|`-separated reservation file
        file: PathBuf,

        /// Skip the first line of the file
        #[arg(long)]
        has_header: bool,

        /// Print a detail card per reservation instead of the overview
        #[arg(long)]
        details: bool,
    },

    /// Per-phase daily tables, one per weekly electricity log
    Weekly {
        /// `;`-separated phase logs, one per week
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Summary file to write (overrides the settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive date range, month and year summaries of an hourly log
    Interactive {
        /// `;`-separated hourly log
        file: PathBuf,

        /// Report file written from the menu (overrides the settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
