//! File populator: drains a schema sampler into a JSONL or CSV file.

use crate::args::OutputFormat;
use crate::error::PopulateError;
use csv::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use synth_core::{Record, SchemaDefinition, Value};
use synth_generator::SchemaSampler;
use tracing::{debug, info, warn};

/// Default buffer size for file writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of records written.
    pub records_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent writing data.
    pub write_duration: Duration,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

impl PopulateMetrics {
    /// Calculate records per second.
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.records_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.file_size_bytes as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Path of the file with the given index: `<dir>/<prefix>-<index>.<ext>`.
pub fn output_path(dir: &Path, prefix: &str, index: usize, format: OutputFormat) -> PathBuf {
    dir.join(format!("{prefix}-{index}.{}", format.extension()))
}

/// Writes generated records to files in one format.
pub struct Populator {
    sampler: SchemaSampler,
    format: OutputFormat,
}

impl Populator {
    /// Create a populator with its own sampler for `schema`.
    pub fn new(
        schema: &SchemaDefinition,
        seed: u64,
        format: OutputFormat,
    ) -> Result<Self, PopulateError> {
        Ok(Self {
            sampler: SchemaSampler::new(schema, seed)?,
            format,
        })
    }

    /// Get a reference to the underlying sampler.
    pub fn sampler(&self) -> &SchemaSampler {
        &self.sampler
    }

    /// Write `count` records to `output_path`, replacing any existing file.
    ///
    /// If generation or writing fails, the incomplete file is removed.
    pub fn populate<P: AsRef<Path>>(
        &mut self,
        output_path: P,
        count: u64,
    ) -> Result<PopulateMetrics, PopulateError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();

        let output_path = output_path.as_ref();
        info!(
            "Generating {} file '{}' with {} records",
            self.format.extension(),
            output_path.display(),
            count
        );

        if let Err(e) = self.write_file(output_path, count, &mut metrics) {
            if let Err(remove_err) = std::fs::remove_file(output_path) {
                warn!(
                    "Failed to remove incomplete file '{}': {remove_err}",
                    output_path.display()
                );
            }
            return Err(e);
        }

        metrics.file_size_bytes = std::fs::metadata(output_path)?.len();
        metrics.total_duration = start_time.elapsed();

        info!(
            "Generation complete: {} records, {} bytes in {:?} ({:.2} records/sec)",
            metrics.records_written,
            metrics.file_size_bytes,
            metrics.total_duration,
            metrics.records_per_second()
        );

        Ok(metrics)
    }

    fn write_file(
        &mut self,
        output_path: &Path,
        count: u64,
        metrics: &mut PopulateMetrics,
    ) -> Result<(), PopulateError> {
        let file = File::create(output_path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let columns = self.sampler.field_names().to_vec();
        let mut sink = match self.format {
            OutputFormat::Jsonl => RecordSink::Jsonl(buf_writer),
            OutputFormat::Csv => {
                let mut writer = Writer::from_writer(buf_writer);
                writer.write_record(&columns)?;
                RecordSink::Csv(writer)
            }
        };

        for _ in 0..count {
            let gen_start = Instant::now();
            let record = self.sampler.sample()?;
            metrics.generation_duration += gen_start.elapsed();

            let write_start = Instant::now();
            sink.write(&record, &columns)?;
            metrics.write_duration += write_start.elapsed();

            metrics.records_written += 1;

            if metrics.records_written % 10000 == 0 {
                debug!("Written {} records", metrics.records_written);
            }
        }

        sink.finish()
    }
}

enum RecordSink {
    Jsonl(BufWriter<File>),
    Csv(Writer<BufWriter<File>>),
}

impl RecordSink {
    fn write(&mut self, record: &Record, columns: &[String]) -> Result<(), PopulateError> {
        match self {
            Self::Jsonl(writer) => {
                serde_json::to_writer(&mut *writer, record)?;
                writeln!(writer)?;
            }
            Self::Csv(writer) => {
                writer.write_record(columns.iter().map(|c| csv_cell(record.get(c))))?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<(), PopulateError> {
        match self {
            Self::Jsonl(mut writer) => writer.flush()?,
            Self::Csv(mut writer) => writer.flush()?,
        }
        Ok(())
    }
}

/// Text of one CSV cell. Nested values are written as compact JSON.
fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
