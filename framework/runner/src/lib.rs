mod aggregate;
mod binary;
mod cli;
mod definition;
mod host;
mod init;
mod process;
mod report;
mod run;
mod types;

pub mod prelude {
    pub use crate::binary::{cargo_path, perf_path, CARGO_PATH_ENV, PERF_PATH_ENV};
    pub use crate::cli::SweepCli;
    pub use crate::definition::{
        InvocationFactory, SweepDefinition, SweepDefinitionBuilder, DEFAULT_SNAKE_COUNTS,
    };
    pub use crate::init::init;
    pub use crate::process::{Invocation, RunOutput};
    pub use crate::run::{execute_sweep, run};
    pub use crate::types::HarnessResult;

    pub use dyno_counters::{
        CounterRecord, ExtractionStrategy, LineScanExtractor, OutputSource,
        SectionAnchoredExtractor,
    };
    pub use dyno_summary_model::{
        load_sweep_summary, AggregateRecord, FieldKind, FieldSchema, FieldSpec, SweepMetadata,
        SweepSummary,
    };
}
