//! CLI argument definitions for the file populator.

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Output file format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Header row from the schema's field names, one row per record
    Csv,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Csv => "csv",
        }
    }
}

/// Arguments shared by every command that reads a schema.
#[derive(Args, Clone, Debug)]
pub struct SchemaArgs {
    /// Path to schema YAML / JSON file
    #[arg(long, short = 's', env = "SYNTH_SCHEMA")]
    pub schema: PathBuf,
}

/// Arguments of the `generate` command.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Number of records to write to each file
    #[arg(long, short = 'n', default_value = "1000")]
    pub count: u64,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42", env = "SYNTH_SEED")]
    pub seed: u64,

    /// Output directory for the generated files
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of files to write in parallel, each with its own generator
    #[arg(long, default_value = "1")]
    pub files: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    pub format: OutputFormat,

    /// File name prefix; files are named `<prefix>-<index>.<ext>`
    #[arg(long, default_value = "synth")]
    pub prefix: String,
}
