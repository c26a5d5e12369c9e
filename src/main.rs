//! convert - make a netCDF file CF-1.6 compliant.

use anyhow::{Context, Result};
use cfconvert::{NormalizeOptions, Normalizer, Outcome, VariableEdits};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "convert")]
#[command(version, about = "Make a netCDF file CF-1.6 compliant", long_about = None)]
struct Args {
    /// Input netCDF file
    input: PathBuf,

    /// Output file (default: overwrite the input)
    output: Option<PathBuf>,

    /// Variable to edit (default: first data variable)
    #[arg(long)]
    variable: Option<String>,

    /// Overwrite the units attribute of the variable
    #[arg(long)]
    units: Option<String>,

    /// Overwrite the long_name attribute of the variable
    #[arg(long = "long-name", alias = "long_name")]
    long_name: Option<String>,

    /// Scale the variable by this factor (remember to update units).
    /// Applied again on every run: do not repeat on an already scaled file
    #[arg(long, allow_negative_numbers = true)]
    factor: Option<f64>,

    /// Print the changes that would be made without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let options = NormalizeOptions {
        edits: VariableEdits {
            variable: args.variable.clone(),
            units: args.units.clone(),
            long_name: args.long_name.clone(),
            factor: args.factor,
        },
        dry_run: args.dry_run,
    };

    let outcome = Normalizer::new(options)
        .convert(&args.input, args.output.as_deref())
        .with_context(|| format!("Failed to convert '{}'", args.input.display()))?;

    report(&outcome);
    tracing::info!("convert finished");
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    if let Some(log_path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let default = if args.verbose { "info" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    tracing::info!("Starting convert");
    Ok(())
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Unchanged { path } => {
            println!("'{}' already declares CF-1.6, unchanged", path.display());
        }
        Outcome::Copied { path } => {
            println!("Copied to '{}' (no changes needed)", path.display());
        }
        Outcome::Rewritten { path, changes } => {
            for change in changes {
                println!("  {}", change);
            }
            println!("Saved to '{}' ({} change(s))", path.display(), changes.len());
        }
        Outcome::Planned { path, changes } => {
            if changes.is_empty() {
                println!("'{}' needs no changes", path.display());
            }
            for change in changes {
                println!("  {}", change);
            }
            println!("Dry run: nothing written to '{}'", path.display());
        }
    }
}
