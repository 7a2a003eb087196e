use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use lexitab::data::{loader, writer};

#[derive(Parser)]
#[command(name = "lexitab")]
#[command(about = "Validate and export CLDF-style wordlist datasets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset and report whether it is structurally valid.
    Validate {
        /// Path to the JSON schema descriptor.
        descriptor: PathBuf,
    },
    /// Load a dataset and re-serialize its data files into a directory.
    Export {
        /// Path to the JSON schema descriptor.
        descriptor: PathBuf,
        /// Directory the data files are written to.
        out_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Validate { descriptor } => {
            let dataset = loader::load(&descriptor)
                .with_context(|| format!("validating {}", descriptor.display()))?;
            for spec in &dataset.descriptor.tables {
                if let Some(table) = dataset.table(&spec.name) {
                    log::info!("table '{}': {} rows", table.name, table.len());
                }
            }
            println!(
                "{}: OK ({} tables)",
                dataset.descriptor.name,
                dataset.len()
            );
        }
        Commands::Export { descriptor, out_dir } => {
            let dataset = loader::load(&descriptor)
                .with_context(|| format!("loading {}", descriptor.display()))?;
            writer::write_data(&dataset, &out_dir)
                .with_context(|| format!("exporting to {}", out_dir.display()))?;
            log::info!(
                "exported {} tables to {}",
                dataset.len(),
                out_dir.display()
            );
        }
    }
    Ok(())
}
