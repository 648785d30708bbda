use std::path::PathBuf;

use anyhow::bail;
use dyno_counters::ExtractionStrategy;
use dyno_summary_model::FieldSchema;

use crate::cli::SweepCli;
use crate::process::Invocation;
use crate::types::HarnessResult;

/// Builds the [Invocation] that measures one snake count.
pub type InvocationFactory = Box<dyn Fn(u32) -> Invocation + Send + Sync>;

/// The snake counts measured when neither the scenario nor the CLI narrows the sweep.
pub const DEFAULT_SNAKE_COUNTS: [u32; 6] = [100, 300, 500, 700, 900, 1000];

/// The builder for a sweep definition.
///
/// This must be used at the start of a scenario to define the sweep that you want to run.
pub struct SweepDefinitionBuilder {
    /// The name of the benchmark being measured, as reported in the summary metadata.
    benchmark: String,
    /// A human readable description of the benchmark, as reported in the summary metadata.
    description: String,
    /// This value is initialised for you and you cannot change it.
    #[doc(hidden)]
    cli: SweepCli,
    /// The line printed under the sweep banner to say what is being measured.
    preamble: Option<String>,
    /// The snake counts to measure, in the order they will be measured.
    ///
    /// A single snake count given on the command line replaces this list.
    snake_counts: Vec<u32>,
    /// How many times each snake count is measured. The command line can override this.
    runs_per_count: usize,
    /// Where the summary document is written. The command line can override this.
    summary_path: PathBuf,
    /// The profiler event list, for sweeps that drive the benchmark through a profiler.
    perf_events: Option<String>,
    schema: Option<FieldSchema>,
    extractor: Option<Box<dyn ExtractionStrategy>>,
    invocation_factory: Option<InvocationFactory>,
}

/// A validated sweep definition, ready to execute.
pub struct SweepDefinition {
    pub benchmark: String,
    pub description: String,
    pub preamble: String,
    pub snake_counts: Vec<u32>,
    pub runs_per_count: usize,
    pub summary_path: PathBuf,
    pub perf_events: Option<String>,
    pub schema: FieldSchema,
    pub extractor: Box<dyn ExtractionStrategy>,
    pub invocation_factory: InvocationFactory,
}

impl SweepDefinitionBuilder {
    /// Initialise a new sweep definition from the benchmark name, its description and the command
    /// line arguments.
    pub fn new(benchmark: &str, description: &str, cli: SweepCli) -> Self {
        Self {
            benchmark: benchmark.to_string(),
            description: description.to_string(),
            cli,
            preamble: None,
            snake_counts: DEFAULT_SNAKE_COUNTS.to_vec(),
            runs_per_count: 3,
            summary_path: PathBuf::from("perf_summary.json"),
            perf_events: None,
            schema: None,
            extractor: None,
            invocation_factory: None,
        }
    }

    /// Set the line printed under the sweep banner.
    pub fn use_preamble(mut self, preamble: &str) -> Self {
        self.preamble = Some(preamble.to_string());
        self
    }

    /// Set the snake counts to measure, replacing [DEFAULT_SNAKE_COUNTS].
    pub fn use_snake_counts(mut self, snake_counts: Vec<u32>) -> Self {
        self.snake_counts = snake_counts;
        self
    }

    /// Set how many times each snake count is measured.
    pub fn use_runs_per_count(mut self, runs_per_count: usize) -> Self {
        self.runs_per_count = runs_per_count;
        self
    }

    /// Set the default path the summary document is written to.
    pub fn use_summary_path(mut self, summary_path: impl Into<PathBuf>) -> Self {
        self.summary_path = summary_path.into();
        self
    }

    /// Record the profiler event list in the summary metadata.
    pub fn use_perf_events(mut self, perf_events: &str) -> Self {
        self.perf_events = Some(perf_events.to_string());
        self
    }

    /// Set the field schema that drives aggregation, the console table and the summary layout.
    pub fn use_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the strategy that turns raw process output into counter records.
    ///
    /// The strategy must produce records with one value per schema field, in schema order.
    pub fn use_extractor(mut self, extractor: Box<dyn ExtractionStrategy>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the factory that builds the process invocation for each snake count.
    pub fn use_invocation(mut self, invocation_factory: InvocationFactory) -> Self {
        self.invocation_factory = Some(invocation_factory);
        self
    }

    /// Apply the command line overrides and validate the definition.
    ///
    /// This is called for you by [crate::prelude::run]; call it directly when you need the
    /// definition itself, for example to pass to [crate::prelude::execute_sweep].
    pub fn build(self) -> HarnessResult<SweepDefinition> {
        let schema = match self.schema {
            Some(schema) => schema,
            None => bail!("No field schema configured for this sweep"),
        };
        let extractor = match self.extractor {
            Some(extractor) => extractor,
            None => bail!("No extraction strategy configured for this sweep"),
        };
        let invocation_factory = match self.invocation_factory {
            Some(invocation_factory) => invocation_factory,
            None => bail!("No invocation configured for this sweep"),
        };

        if extractor.field_count() != schema.fields.len() {
            bail!(
                "The extraction strategy produces {} values but the schema has {} fields",
                extractor.field_count(),
                schema.fields.len()
            );
        }

        let snake_counts = match self.cli.snake_count {
            Some(snake_count) => vec![snake_count],
            None => self.snake_counts,
        };
        if snake_counts.is_empty() {
            bail!("No snake counts configured for this sweep");
        }

        let runs_per_count = self.cli.runs.unwrap_or(self.runs_per_count);
        if runs_per_count == 0 {
            bail!("At least one run per snake count is required");
        }

        let summary_path = self.cli.summary_path.unwrap_or(self.summary_path);

        let preamble = self
            .preamble
            .unwrap_or_else(|| format!("Using the {} benchmark", self.benchmark));

        Ok(SweepDefinition {
            benchmark: self.benchmark,
            description: self.description,
            preamble,
            snake_counts,
            runs_per_count,
            summary_path,
            perf_events: self.perf_events,
            schema,
            extractor,
            invocation_factory,
        })
    }
}

#[cfg(test)]
mod tests {
    use dyno_counters::LineScanExtractor;
    use dyno_summary_model::FieldSpec;

    use super::*;

    fn sample_cli() -> SweepCli {
        SweepCli {
            snake_count: None,
            runs: None,
            summary_path: None,
        }
    }

    fn sample_builder(cli: SweepCli) -> SweepDefinitionBuilder {
        SweepDefinitionBuilder::new("sample_bench", "A sample benchmark", cli)
            .use_schema(FieldSchema::new("Snakes", 6).field(FieldSpec::count("events")))
            .use_extractor(Box::new(LineScanExtractor::new(1).sum_counter("events", 0)))
            .use_invocation(Box::new(|snake_count| {
                Invocation::new("/bin/echo").arg(snake_count.to_string())
            }))
    }

    #[test]
    fn builds_with_defaults() {
        let definition = sample_builder(sample_cli()).build().unwrap();

        assert_eq!(definition.snake_counts, DEFAULT_SNAKE_COUNTS.to_vec());
        assert_eq!(definition.runs_per_count, 3);
        assert_eq!(definition.summary_path, PathBuf::from("perf_summary.json"));
        assert_eq!(definition.preamble, "Using the sample_bench benchmark");
        assert_eq!(definition.perf_events, None);
    }

    #[test]
    fn cli_snake_count_narrows_the_sweep() {
        let cli = SweepCli {
            snake_count: Some(250),
            ..sample_cli()
        };

        let definition = sample_builder(cli).build().unwrap();

        assert_eq!(definition.snake_counts, vec![250]);
    }

    #[test]
    fn cli_overrides_runs_and_summary_path() {
        let cli = SweepCli {
            snake_count: None,
            runs: Some(9),
            summary_path: Some(PathBuf::from("elsewhere.json")),
        };

        let definition = sample_builder(cli)
            .use_runs_per_count(5)
            .use_summary_path("default.json")
            .build()
            .unwrap();

        assert_eq!(definition.runs_per_count, 9);
        assert_eq!(definition.summary_path, PathBuf::from("elsewhere.json"));
    }

    #[test]
    fn rejects_a_missing_schema() {
        let result = SweepDefinitionBuilder::new("sample_bench", "A sample benchmark", sample_cli())
            .use_extractor(Box::new(LineScanExtractor::new(1)))
            .use_invocation(Box::new(|_| Invocation::new("/bin/echo")))
            .build();

        assert!(result.is_err());
        assert_eq!(
            result.err().unwrap().to_string(),
            "No field schema configured for this sweep"
        );
    }

    #[test]
    fn rejects_a_schema_extractor_mismatch() {
        let result = sample_builder(sample_cli())
            .use_extractor(Box::new(LineScanExtractor::new(3)))
            .build();

        assert!(result.is_err());
        assert_eq!(
            result.err().unwrap().to_string(),
            "The extraction strategy produces 3 values but the schema has 1 fields"
        );
    }

    #[test]
    fn rejects_an_empty_sweep() {
        let result = sample_builder(sample_cli())
            .use_snake_counts(Vec::new())
            .build();

        assert!(result.is_err());
        assert_eq!(
            result.err().unwrap().to_string(),
            "No snake counts configured for this sweep"
        );
    }

    #[test]
    fn rejects_zero_runs_per_count() {
        let result = sample_builder(sample_cli()).use_runs_per_count(0).build();

        assert!(result.is_err());
    }
}
