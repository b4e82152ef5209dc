use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Settings, DEFAULT_DATA_DIR, DEFAULT_EXCLUDED_DEPT, DEFAULT_EXPORT_DIR, DEFAULT_PORT};

/// Academic timetable mapping: place subjects into day/time-slot cells per program.
#[derive(Parser)]
#[command(name = "timetable-mapping", version, about = "Academic timetable slot mapping")]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// List selectable terms around the current year.
    Terms,
    /// Load a term's offerings and print its programs.
    Summary(SummaryArgs),
    /// Load a term, replay an operations file and write the resulting schedule.
    Apply(ApplyArgs),
}

/// Arguments for the `serve` subcommand.
#[derive(clap::Args)]
pub struct ServeArgs {
    #[arg(short, long, env = "TIMETABLE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[command(flatten)]
    pub data: DataArgs,

    /// Directory for saved schedule snapshots.
    #[arg(long, env = "TIMETABLE_EXPORT_DIR", default_value = DEFAULT_EXPORT_DIR)]
    pub export_dir: PathBuf,
}

/// Where offerings come from and which department is hidden from the grid.
#[derive(clap::Args)]
pub struct DataArgs {
    /// Directory holding `<term>.json` or `<term>.csv` offering reports.
    #[arg(short, long, env = "TIMETABLE_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Department whose programs are left off the grid ("" to show all).
    #[arg(long, env = "TIMETABLE_EXCLUDED_DEPT", default_value = DEFAULT_EXCLUDED_DEPT)]
    pub excluded_dept: String,
}

/// Arguments for the `summary` subcommand.
#[derive(clap::Args)]
pub struct SummaryArgs {
    /// Term code, e.g. 2025261.
    #[arg(short, long, default_value = "")]
    pub term: String,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Arguments for the `apply` subcommand.
#[derive(clap::Args)]
pub struct ApplyArgs {
    /// Term code, e.g. 2025261.
    #[arg(short, long, default_value = "")]
    pub term: String,

    /// JSON file with the list of operations to replay.
    #[arg(long)]
    pub ops: PathBuf,

    /// Snapshot output (.json or .csv).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Plain-text grid output.
    #[arg(long)]
    pub grid: Option<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,
}

impl ServeArgs {
    pub fn into_settings(self) -> Settings {
        Settings {
            port: self.port,
            data_dir: self.data.data_dir,
            export_dir: self.export_dir,
            excluded_dept: self.data.excluded_dept.trim().to_string(),
        }
    }
}
