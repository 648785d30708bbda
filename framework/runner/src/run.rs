use chrono::Utc;
use dyno_summary_model::{SweepMetadata, SweepSummary};

use crate::aggregate::measure_snake_count;
use crate::binary::{CARGO_PATH_ENV, PERF_PATH_ENV};
use crate::definition::{SweepDefinition, SweepDefinitionBuilder};
use crate::host::{capture_host, warn_if_busy};
use crate::report;
use crate::types::HarnessResult;

/// Environment variables recorded in the summary metadata when they are set.
///
/// RUSTFLAGS is included because the sweep's cargo invocations build the benchmark, so it changes
/// what is being measured.
const CAPTURED_ENV: [&str; 3] = [CARGO_PATH_ENV, PERF_PATH_ENV, "RUSTFLAGS"];

/// Build and execute a sweep definition.
///
/// This is the entry point for a scenario `main`: hand it the configured
/// [SweepDefinitionBuilder] and it owns the rest of the lifecycle.
pub fn run(definition: SweepDefinitionBuilder) -> HarnessResult<()> {
    let definition = definition.build()?;
    execute_sweep(&definition)?;
    Ok(())
}

/// Execute a validated sweep and return the summary that was written.
///
/// Snake counts are measured in the configured order, strictly one after the other. Concurrent
/// measurements would contend for the cache and branch predictor state being measured, so there
/// is deliberately no parallelism here. Each table row is printed as its snake count completes,
/// and the summary document is written once at the end.
pub fn execute_sweep(definition: &SweepDefinition) -> HarnessResult<SweepSummary> {
    log::info!("Running sweep: {}", definition.benchmark);

    let host = capture_host();
    warn_if_busy(&host);

    let mut metadata = SweepMetadata::new(
        nanoid::nanoid!(),
        Utc::now().timestamp(),
        definition.runs_per_count,
        definition.snake_counts.clone(),
        definition.benchmark.clone(),
        definition.description.clone(),
    );
    if let Some(perf_events) = &definition.perf_events {
        metadata.set_perf_events(perf_events.clone());
    }
    for name in CAPTURED_ENV {
        if let Ok(value) = std::env::var(name) {
            metadata.add_env(name.to_string(), value);
        }
    }
    metadata.set_host(host);
    log::debug!("Sweep configuration fingerprint: {}", metadata.fingerprint());

    match definition.snake_counts.as_slice() {
        [snake_count] => {
            println!("=== Measuring cache and branch metrics for {snake_count} snakes ===")
        }
        _ => println!("=== Measuring cache and branch metrics across snake counts ==="),
    }
    println!("{}", definition.preamble);
    println!(
        "Running {} measurements per snake count for reliability",
        definition.runs_per_count
    );
    println!();

    let header = report::header_line(&definition.schema);
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    let mut results = Vec::with_capacity(definition.snake_counts.len());
    for snake_count in &definition.snake_counts {
        println!();
        println!("Measuring {snake_count} snakes:");

        let record = measure_snake_count(definition, *snake_count);
        println!(
            "  Average results: {}",
            report::format_row(&definition.schema, &record)
        );
        if let Some(spread) = report::std_dev_line(&definition.schema, &record) {
            println!("{spread}");
        }

        results.push(record.to_json(&definition.schema));
    }

    let summary = SweepSummary { metadata, results };
    report::write_summary(&summary, &definition.summary_path)?;

    println!();
    println!("Saved summary to: {}", definition.summary_path.display());
    println!(
        "Each snake count was measured {} times and averaged",
        definition.runs_per_count
    );

    Ok(summary)
}
