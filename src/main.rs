//! Command-line interface for synth
//!
//! # Usage Examples
//!
//! ```bash
//! # Write 4 JSONL files of 10,000 records each into ./out
//! synth generate --schema schema.yaml --count 10000 --files 4 --output-dir out
//!
//! # Same schema as CSV, with the seed taken from the environment
//! SYNTH_SEED=7 synth generate --schema schema.yaml --format csv --output-dir out
//!
//! # List the fields a schema produces
//! synth fields --schema schema.yaml
//! ```
//!
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=synth_generator=debug`.

use clap::{Parser, Subcommand};
use synth::{run_fields, run_generate};
use synth_populate::{GenerateArgs, SchemaArgs};

#[derive(Parser)]
#[command(name = "synth")]
#[command(about = "Generate synthetic records from a declarative schema")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate records into JSONL or CSV files
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Print the output field names of a schema, one per line
    Fields {
        #[command(flatten)]
        args: SchemaArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => {
            run_generate(args).await?;
        }
        Commands::Fields { args } => {
            for name in run_fields(&args)? {
                println!("{name}");
            }
        }
    }

    Ok(())
}
