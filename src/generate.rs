//! Command handlers.

use anyhow::Context;
use std::sync::Arc;
use synth_core::SchemaDefinition;
use synth_generator::SchemaSampler;
use synth_populate::{output_path, GenerateArgs, PopulateMetrics, Populator, SchemaArgs};
use tokio::task::JoinSet;

fn load_schema(args: &SchemaArgs) -> anyhow::Result<SchemaDefinition> {
    SchemaDefinition::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))
}

/// Write `args.files` files of `args.count` records each.
///
/// Every file gets its own sampler seeded `seed + file_index` and is written
/// on a blocking task, so files are produced in parallel. Metrics are
/// returned in file order.
pub async fn run_generate(args: GenerateArgs) -> anyhow::Result<Vec<PopulateMetrics>> {
    let schema = load_schema(&args.schema)?;

    // Surface configuration errors before any file is created
    SchemaSampler::new(&schema, args.seed)
        .with_context(|| format!("Invalid schema {:?}", args.schema.schema))?;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory: {:?}", args.output_dir)
    })?;

    tracing::info!(
        "Generating {} {} file(s) with {} records each (seed={})",
        args.files,
        args.format.extension(),
        args.count,
        args.seed
    );

    let schema = Arc::new(schema);
    let mut tasks = JoinSet::new();
    for index in 0..args.files {
        let schema = Arc::clone(&schema);
        let path = output_path(&args.output_dir, &args.prefix, index, args.format);
        let seed = args.seed.wrapping_add(index as u64);
        let (count, format) = (args.count, args.format);

        tasks.spawn_blocking(move || -> anyhow::Result<(usize, PopulateMetrics)> {
            let mut populator = Populator::new(&schema, seed, format)?;
            let metrics = populator
                .populate(&path, count)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok((index, metrics))
        });
    }

    let mut results = Vec::with_capacity(args.files);
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("Generator task failed")??);
    }
    results.sort_by_key(|(index, _)| *index);

    let total: u64 = results.iter().map(|(_, m)| m.records_written).sum();
    tracing::info!("Wrote {total} records to {} file(s)", results.len());

    Ok(results.into_iter().map(|(_, metrics)| metrics).collect())
}

/// Output field names of the schema, in schema order.
pub fn run_fields(args: &SchemaArgs) -> anyhow::Result<Vec<String>> {
    let schema = load_schema(args)?;
    let sampler = SchemaSampler::new(&schema, 0)
        .with_context(|| format!("Invalid schema {:?}", args.schema))?;
    Ok(sampler.field_names().to_vec())
}
