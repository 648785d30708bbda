use dyno_runner::prelude::*;

/// The benchmark suite selected inside the bench target.
const SUITE_NAME: &str = "hot_path";

/// The bench target the suite lives in.
const BENCH_NAME: &str = "game_bench";

/// The counters sampled by the wrapping profiler.
const PERF_EVENTS: &str = "cache-misses,cache-references,branch-instructions,branch-misses";

fn schema() -> FieldSchema {
    FieldSchema::new("Snakes", 6)
        .field(
            FieldSpec::count("cache_misses")
                .column("CacheMisses", 13)
                .std_dev("std_dev_cache_misses", "Cache misses"),
        )
        .field(FieldSpec::count("cache_references").column("CacheRefs", 13))
        .field(FieldSpec::rate("cache_miss_rate_percent").column("CMiss%", 8))
        .field(
            FieldSpec::count("branch_misses")
                .column("BrMisses", 12)
                .std_dev("std_dev_branch_misses", "Branch misses"),
        )
        .field(FieldSpec::count("branch_instructions").column("Branches", 12))
        .field(FieldSpec::rate("branch_miss_rate_percent").column("BMiss%", 8))
        .field(FieldSpec::ratio("time_elapsed_seconds"))
}

fn extractor() -> LineScanExtractor {
    LineScanExtractor::new(7)
        .sum_counter("cache-misses", 0)
        .sum_counter("cache-references", 1)
        .sum_counter("branch-misses", 3)
        .sum_counter("branch-instructions", 4)
        .rate_percent(2, 0, 1)
        .rate_percent(5, 3, 4)
        .elapsed_seconds(6)
}

fn main() -> HarnessResult<()> {
    let cli = init();
    let perf = perf_path()?;
    let cargo = cargo_path()?;

    let builder = SweepDefinitionBuilder::new(
        SUITE_NAME,
        "Deterministic hot path benchmark with consistent CPU frequency and cache state",
        cli,
    )
    .use_preamble(
        "Using deterministic hot_path benchmark with consistent CPU frequency and cache state",
    )
    .use_runs_per_count(5)
    .use_summary_path("perf_all_summary.json")
    .use_perf_events(PERF_EVENTS)
    .use_schema(schema())
    .use_extractor(Box::new(extractor()))
    .use_invocation(Box::new(move |snake_count| {
        Invocation::new(&perf)
            .arg("stat")
            .arg("-e")
            .arg(PERF_EVENTS)
            .arg(&cargo)
            .arg("bench")
            .arg("--bench")
            .arg(BENCH_NAME)
            .arg(format!("{SUITE_NAME}/{snake_count}_snakes"))
    }));

    run(builder)?;

    Ok(())
}
