use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::collections::HashMap;
use std::io::{Read, Write};

mod schema;

pub use schema::{Column, FieldKind, FieldSchema, FieldSpec, StdDevSpec};

/// Aggregated counter values for one workload size.
///
/// Produced by averaging the records of all successful runs at that size. The `values`
/// and `std_devs` vectors are aligned with the fields of the [FieldSchema] that the
/// sweep was configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    /// The workload size these values were measured at.
    pub snakes: u32,
    /// Per-field mean over the successful runs.
    ///
    /// Values for [FieldKind::Count] fields have already had their fractional part
    /// discarded.
    pub values: Vec<f64>,
    /// The number of runs that produced a usable record.
    ///
    /// This can be less than the number of runs requested when runs fail, and zero when
    /// all of them do.
    pub runs_completed: usize,
    /// Per-field sample standard deviation over the successful runs.
    ///
    /// All zeroes when fewer than two runs completed.
    pub std_devs: Vec<f64>,
}

impl AggregateRecord {
    /// The record reported for a size where no run produced a usable result.
    pub fn empty(snakes: u32, schema: &FieldSchema) -> Self {
        Self {
            snakes,
            values: vec![0.0; schema.fields.len()],
            runs_completed: 0,
            std_devs: vec![0.0; schema.fields.len()],
        }
    }

    /// Flatten this record into a summary document result object.
    ///
    /// [FieldKind::Count] fields are stored as integers, all other fields as floats.
    /// Standard deviations are stored as floats under their configured keys, for
    /// tracked fields only.
    pub fn to_json(&self, schema: &FieldSchema) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert("snakes".to_string(), self.snakes.into());

        for (spec, value) in schema.fields.iter().zip(&self.values) {
            let value = match spec.kind {
                FieldKind::Count => serde_json::Value::from(*value as u64),
                FieldKind::Rate | FieldKind::Ratio => serde_json::Value::from(*value),
            };
            object.insert(spec.key.to_string(), value);
        }

        object.insert("runs_completed".to_string(), self.runs_completed.into());

        for (spec, std_dev) in schema.fields.iter().zip(&self.std_devs) {
            if let Some(tracked) = &spec.std_dev {
                object.insert(tracked.key.to_string(), serde_json::Value::from(*std_dev));
            }
        }

        serde_json::Value::Object(object)
    }
}

/// Host details captured at the start of a sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostInfo {
    /// The OS name and version, if the host exposes them.
    pub os: Option<String>,
    pub cpu_count: usize,
    pub total_memory_mb: u64,
}

/// Description of how a sweep was configured and where it ran.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepMetadata {
    /// The number of measurement runs requested per snake count.
    pub runs_per_snake_count: usize,
    /// The snake counts that were swept, in sweep order.
    pub snake_counts: Vec<u32>,
    /// The profiler event list, for sweeps driven through a wrapping profiler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perf_events: Option<String>,
    /// The name of the benchmark that was measured.
    pub benchmark: String,
    /// A human readable description of the benchmark.
    pub description: String,
    /// The unique run id
    ///
    /// Chosen by the runner. Unique for each sweep.
    pub run_id: String,
    /// The time the sweep started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// Environment variables set for the sweep
    ///
    /// This won't capture all environment variables. Just the ones that the runner is
    /// aware of.
    pub env: HashMap<String, String>,
    /// The host the sweep ran on.
    pub host: HostInfo,
}

impl SweepMetadata {
    /// Create new sweep metadata
    pub fn new(
        run_id: String,
        started_at: i64,
        runs_per_snake_count: usize,
        snake_counts: Vec<u32>,
        benchmark: String,
        description: String,
    ) -> Self {
        Self {
            runs_per_snake_count,
            snake_counts,
            perf_events: None,
            benchmark,
            description,
            run_id,
            started_at,
            env: HashMap::with_capacity(0),
            host: HostInfo::default(),
        }
    }

    /// Set the profiler event list
    pub fn set_perf_events(&mut self, perf_events: String) {
        self.perf_events = Some(perf_events);
    }

    /// Set the captured host details
    pub fn set_host(&mut self, host: HostInfo) {
        self.host = host;
    }

    /// Add an environment variable
    pub fn add_env(&mut self, key: String, value: String) {
        self.env.insert(key, value);
    }

    /// Compute a fingerprint for this sweep configuration
    ///
    /// The fingerprint is intended to uniquely identify the configuration used for the
    /// sweep, so that runs with matching fingerprints can be compared. It uses the
    ///     - Benchmark name
    ///     - Runs per snake count
    ///     - Snake counts
    ///     - Profiler event list, when set
    ///     - Selected environment variables
    ///
    /// It deliberately excludes the run id and start time, which differ for every
    /// sweep.
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        Digest::update(&mut hasher, self.benchmark.as_bytes());
        Digest::update(&mut hasher, self.runs_per_snake_count.to_le_bytes());
        for snake_count in &self.snake_counts {
            Digest::update(&mut hasher, snake_count.to_le_bytes());
        }
        if let Some(perf_events) = &self.perf_events {
            Digest::update(&mut hasher, perf_events.as_bytes());
        }
        self.env
            .iter()
            .sorted_by_key(|(k, _)| k.to_owned())
            .for_each(|(k, v)| {
                Digest::update(&mut hasher, k.as_bytes());
                Digest::update(&mut hasher, v.as_bytes());
            });

        format!("{:x}", hasher.finalize())
    }
}

/// The summary document persisted at the end of a sweep.
///
/// Contains one result object per swept snake count, in sweep order, under the metadata
/// describing the sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepSummary {
    pub metadata: SweepMetadata,
    pub results: Vec<serde_json::Value>,
}

/// Serialize the sweep summary to a writer as pretty-printed JSON
pub fn store_sweep_summary<W: Write>(
    summary: &SweepSummary,
    writer: &mut W,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, summary)?;
    Ok(())
}

/// Load a sweep summary from a reader
pub fn load_sweep_summary<R: Read>(reader: R) -> anyhow::Result<SweepSummary> {
    let reader = std::io::BufReader::new(reader);
    let summary: SweepSummary = serde_json::from_reader(reader)?;
    Ok(summary)
}
