mod catalog;
mod cli;
mod config;
mod display;
mod error;
mod export;
mod logging;
mod parser;
mod replay;
mod schedule;
mod terms;
mod web;

use chrono::{Datelike, Local};
use clap::Parser;

use catalog::Catalog;
use cli::{ApplyArgs, Cli, Command, DataArgs};
use display::{print_catalog_summary, print_day_grid, write_grid_to_file};
use export::{build_snapshot, write_snapshot};
use parser::load_offerings;
use replay::{apply_operations, read_operations};
use schedule::AssignmentEngine;
use terms::{term_options, validate_term};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Serve(args) => {
            let settings = args.into_settings();
            println!("Starting web server on port {}...", settings.port);
            println!("Offerings directory: {}", settings.data_dir.display());
            println!("Access the API at http://localhost:{}/api/terms", settings.port);
            web::start_server(settings).await?;
        }
        Command::Terms => {
            for option in term_options(Local::now().year()) {
                println!("{}\t{}", option.value, option.label);
            }
        }
        Command::Summary(args) => {
            let engine = load_engine(&args.term, &args.data)?;
            print_catalog_summary(&engine, args.data.excluded_dept.trim());
        }
        Command::Apply(args) => run_apply(args)?,
    }

    Ok(())
}

fn load_engine(term: &str, data: &DataArgs) -> Result<AssignmentEngine, Box<dyn std::error::Error>> {
    let term = validate_term(term)?;
    println!("Loading offerings for term {}...", term);
    let records = load_offerings(&data.data_dir, term)?;
    println!("Loaded {} offering rows", records.len());
    Ok(AssignmentEngine::new(Catalog::from_records(&records)))
}

fn run_apply(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let excluded_dept = args.data.excluded_dept.trim();
    let mut engine = load_engine(&args.term, &args.data)?;

    let operations = read_operations(&args.ops)?;
    let report = apply_operations(&mut engine, &operations)?;
    println!("Applied {} of {} operations", report.applied, operations.len());
    for conflict in &report.conflicts {
        println!("  Skipped: {}", conflict);
    }

    let snapshot = build_snapshot(&engine, excluded_dept);
    print_day_grid(&engine, &snapshot);

    if let Some(out) = &args.out {
        write_snapshot(&snapshot, out)?;
        println!("\nSchedule saved to {}", out.display());
    }
    if let Some(grid) = &args.grid {
        write_grid_to_file(&snapshot, grid)?;
        println!("Grid written to {}", grid.display());
    }

    Ok(())
}
