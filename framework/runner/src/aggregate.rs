use std::io::Write;

use anyhow::bail;
use dyno_counters::{stats, CounterRecord};
use dyno_summary_model::{AggregateRecord, FieldKind, FieldSchema};

use crate::definition::SweepDefinition;
use crate::types::HarnessResult;

/// Measure one snake count the configured number of times and aggregate the results.
///
/// Runs are strictly sequential. A run that fails, either because the process could not be
/// launched, exited with a failure status, or produced output the extraction strategy rejected,
/// is marked `✗` and skipped; the remaining runs still count. When every run fails the record is
/// all zeroes with `runs_completed` set to zero and the sweep carries on with the next size.
pub(crate) fn measure_snake_count(
    definition: &SweepDefinition,
    snake_count: u32,
) -> AggregateRecord {
    let runs = definition.runs_per_count;
    println!("  Running {runs} measurements for {snake_count} snakes...");

    let mut records = Vec::with_capacity(runs);
    for run_number in 1..=runs {
        print!("    Run {run_number}/{runs}... ");
        let _ = std::io::stdout().flush();

        match run_once(definition, snake_count) {
            Ok(record) => {
                records.push(record);
                println!("✓");
            }
            Err(e) => {
                println!("✗");
                log::warn!(
                    "Run {run_number}/{runs} for {snake_count} snakes failed: {e:?}"
                );
            }
        }
    }

    if records.is_empty() {
        println!("    No successful runs for {snake_count} snakes");
        return AggregateRecord::empty(snake_count, &definition.schema);
    }

    reduce(snake_count, &definition.schema, &records)
}

fn run_once(definition: &SweepDefinition, snake_count: u32) -> HarnessResult<CounterRecord> {
    let invocation = (definition.invocation_factory)(snake_count);
    log::debug!("Running: {invocation}");

    let output = invocation.run()?;
    if !output.succeeded() {
        bail!("the measured process exited with {}", output.status);
    }

    let raw = output.stream(definition.extractor.source());
    match definition.extractor.extract(raw) {
        Some(record) => Ok(record),
        None => bail!("the process output did not contain a usable result"),
    }
}

/// Combine the records of the successful runs into one aggregate record.
///
/// Each field is the arithmetic mean over the successful runs only, so failed runs never dilute
/// the result. Count fields keep the whole part of their mean. Standard deviations are sample
/// standard deviations over the same per-run values, zero when fewer than two runs completed.
pub(crate) fn reduce(
    snake_count: u32,
    schema: &FieldSchema,
    records: &[CounterRecord],
) -> AggregateRecord {
    let mut values = Vec::with_capacity(schema.fields.len());
    let mut std_devs = Vec::with_capacity(schema.fields.len());

    for (index, spec) in schema.fields.iter().enumerate() {
        let samples: Vec<f64> = records.iter().map(|record| record.values[index]).collect();
        let mean = stats::mean(&samples);
        values.push(match spec.kind {
            FieldKind::Count => mean.trunc(),
            FieldKind::Rate | FieldKind::Ratio => mean,
        });
        std_devs.push(stats::sample_std_dev(&samples));
    }

    AggregateRecord {
        snakes: snake_count,
        values,
        runs_completed: records.len(),
        std_devs,
    }
}

#[cfg(test)]
mod tests {
    use dyno_summary_model::FieldSpec;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_schema() -> FieldSchema {
        FieldSchema::new("Snakes", 6)
            .field(FieldSpec::count("events"))
            .field(FieldSpec::rate("rate_percent"))
    }

    fn record(values: Vec<f64>) -> CounterRecord {
        CounterRecord { values }
    }

    #[test]
    fn identical_runs_reduce_to_their_values_with_no_spread() {
        let records = vec![
            record(vec![1_000.0, 40.0]),
            record(vec![1_000.0, 40.0]),
            record(vec![1_000.0, 40.0]),
        ];

        let aggregate = reduce(500, &sample_schema(), &records);

        assert_eq!(aggregate.snakes, 500);
        assert_eq!(aggregate.values, vec![1_000.0, 40.0]);
        assert_eq!(aggregate.runs_completed, 3);
        assert_eq!(aggregate.std_devs, vec![0.0, 0.0]);
    }

    #[test]
    fn count_means_are_truncated_not_rounded() {
        let records = vec![record(vec![10.0, 1.0]), record(vec![15.0, 2.0])];

        let aggregate = reduce(100, &sample_schema(), &records);

        // 12.5 would round to 13; the whole part is kept instead.
        assert_eq!(aggregate.values[0], 12.0);
        assert_eq!(aggregate.values[1], 1.5);
    }

    #[test]
    fn spread_follows_the_sample_standard_deviation() {
        let records = vec![
            record(vec![0.0, 90.0]),
            record(vec![0.0, 92.0]),
            record(vec![0.0, 94.0]),
        ];

        let aggregate = reduce(100, &sample_schema(), &records);

        assert_eq!(aggregate.std_devs, vec![0.0, 2.0]);
    }

    #[test]
    fn a_single_run_has_zero_spread() {
        let records = vec![record(vec![123.0, 45.6])];

        let aggregate = reduce(100, &sample_schema(), &records);

        assert_eq!(aggregate.runs_completed, 1);
        assert_eq!(aggregate.values, vec![123.0, 45.6]);
        assert_eq!(aggregate.std_devs, vec![0.0, 0.0]);
    }
}
