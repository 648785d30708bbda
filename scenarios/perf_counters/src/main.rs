use dyno_runner::prelude::*;

/// The bench target that prints its own instrumented counters.
const BENCH_NAME: &str = "perf_counters_bench";

fn schema() -> FieldSchema {
    FieldSchema::new("Snakes", 6)
        .field(
            FieldSpec::rate("cache_hit_rate_percent")
                .column("CacheHit%", 10)
                .std_dev("std_dev_cache_hit_rate", "Cache hit rate"),
        )
        .field(FieldSpec::count("total_cache_hits").column("CacheHits", 12))
        .field(FieldSpec::count("total_cache_misses").column("CacheMisses", 12))
        .field(
            FieldSpec::rate("branch_prediction_rate_percent")
                .column("BrPred%", 9)
                .std_dev("std_dev_branch_prediction", "Branch prediction"),
        )
        .field(
            FieldSpec::ratio("instructions_per_cycle")
                .column("IPC", 6)
                .std_dev("std_dev_ipc", "IPC"),
        )
        .field(FieldSpec::count("total_iterations").column("Iterations", 10))
}

fn main() -> HarnessResult<()> {
    let cli = init();
    let cargo = cargo_path()?;

    let builder = SweepDefinitionBuilder::new(
        BENCH_NAME,
        "Deterministic hot path benchmark with cache warmup and hardware performance counters",
        cli,
    )
    .use_preamble("Using perf_counters_bench with deterministic hot path and cache warmup")
    .use_runs_per_count(3)
    .use_summary_path("perf_summary.json")
    .use_schema(schema())
    .use_extractor(Box::new(SectionAnchoredExtractor::new()))
    .use_invocation(Box::new(move |snake_count| {
        Invocation::new(&cargo)
            .arg("bench")
            .arg("--bench")
            .arg(BENCH_NAME)
            .arg(format!("perf_counters/{snake_count}_snakes"))
    }));

    run(builder)?;

    Ok(())
}
