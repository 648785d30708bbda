use regex::Regex;

use crate::{CounterRecord, ExtractionStrategy, OutputSource};

/// Parses the global average results block that the instrumented counters benchmark
/// prints on stdout after its final run.
///
/// The block is located by its banner line and the six metrics are read from the lines
/// that follow it. Numbers are accepted with or without thousands separators. The
/// strategy is strict: if the banner or any metric is missing, or a number fails to
/// parse, the whole record is rejected.
///
/// Record layout, in field order:
///     - cache hit rate (percent)
///     - total cache hits
///     - total cache misses
///     - branch prediction rate (percent)
///     - instructions per cycle
///     - total iterations
pub struct SectionAnchoredExtractor {
    pattern: Regex,
}

impl SectionAnchoredExtractor {
    pub fn new() -> Self {
        let pattern = Regex::new(concat!(
            r"(?s)GLOBAL AVERAGE RESULTS ACROSS ALL BENCHMARK RUNS",
            r".*?Average Cache Hit Rate: ([\d.]+)% \(([\d,]+) total hits, ([\d,]+) total misses\)",
            r".*?Average Branch Prediction Rate: ([\d.]+)%",
            r".*?Average Instructions Per Cycle: ([\d.]+)",
            r".*?Total Iterations Across All Runs: ([\d,]+)",
        ))
        .expect("results section pattern is valid");

        Self { pattern }
    }
}

impl Default for SectionAnchoredExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for SectionAnchoredExtractor {
    fn source(&self) -> OutputSource {
        OutputSource::Stdout
    }

    fn field_count(&self) -> usize {
        6
    }

    fn extract(&self, raw: &str) -> Option<CounterRecord> {
        let captures = match self.pattern.captures(raw) {
            Some(captures) => captures,
            None => {
                log::debug!("No usable results section in benchmark output");
                return None;
            }
        };

        let values = vec![
            parse_decimal(&captures[1])?,
            parse_grouped(&captures[2])?,
            parse_grouped(&captures[3])?,
            parse_decimal(&captures[4])?,
            parse_decimal(&captures[5])?,
            parse_grouped(&captures[6])?,
        ];

        Some(CounterRecord { values })
    }
}

fn parse_decimal(token: &str) -> Option<f64> {
    token.parse().ok()
}

fn parse_grouped(token: &str) -> Option<f64> {
    token.replace(',', "").parse::<u64>().ok().map(|v| v as f64)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const RESULTS_BLOCK: &str = "\
Snakes: 100, Cache Hit Rate: 91.2345% (333210 hits, 32010 misses), Branch Prediction: 97.8123%, IPC: 1.8510

================================================================================
GLOBAL AVERAGE RESULTS ACROSS ALL BENCHMARK RUNS
================================================================================
Average Cache Hit Rate: 91.2345% (999630 total hits, 96030 total misses)
Average Branch Prediction Rate: 97.8123%
Average Instructions Per Cycle: 1.8510
Total Iterations Across All Runs: 3000
================================================================================
";

    #[test]
    fn extracts_all_six_fields() {
        let record = SectionAnchoredExtractor::new()
            .extract(RESULTS_BLOCK)
            .unwrap();

        assert_eq!(
            record.values,
            vec![91.2345, 999_630.0, 96_030.0, 97.8123, 1.851, 3_000.0]
        );
    }

    #[test]
    fn accepts_thousands_separators() {
        let output = "\
GLOBAL AVERAGE RESULTS ACROSS ALL BENCHMARK RUNS
Average Cache Hit Rate: 91.23% (1,000,000 total hits, 96,500 total misses)
Average Branch Prediction Rate: 97.80%
Average Instructions Per Cycle: 1.85
Total Iterations Across All Runs: 3,000
";

        let record = SectionAnchoredExtractor::new().extract(output).unwrap();

        assert_eq!(
            record.values,
            vec![91.23, 1_000_000.0, 96_500.0, 97.8, 1.85, 3_000.0]
        );
    }

    #[test]
    fn ignores_per_run_lines_before_the_banner() {
        let record = SectionAnchoredExtractor::new()
            .extract(RESULTS_BLOCK)
            .unwrap();

        // The per-run line above the banner reports different totals which must not
        // leak into the record.
        assert_eq!(record.values[1], 999_630.0);
    }

    #[test]
    fn rejects_output_without_the_banner() {
        let output = "\
Average Cache Hit Rate: 91.23% (1,000,000 total hits, 96,500 total misses)
Average Branch Prediction Rate: 97.80%
Average Instructions Per Cycle: 1.85
Total Iterations Across All Runs: 3,000
";

        assert_eq!(SectionAnchoredExtractor::new().extract(output), None);
    }

    #[test]
    fn rejects_output_missing_a_metric() {
        let output = "\
GLOBAL AVERAGE RESULTS ACROSS ALL BENCHMARK RUNS
Average Cache Hit Rate: 91.23% (1,000,000 total hits, 96,500 total misses)
Average Branch Prediction Rate: 97.80%
Total Iterations Across All Runs: 3,000
";

        assert_eq!(SectionAnchoredExtractor::new().extract(output), None);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let output = "\
GLOBAL AVERAGE RESULTS ACROSS ALL BENCHMARK RUNS
Average Cache Hit Rate: 91.2.3% (1,000,000 total hits, 96,500 total misses)
Average Branch Prediction Rate: 97.80%
Average Instructions Per Cycle: 1.85
Total Iterations Across All Runs: 3,000
";

        assert_eq!(SectionAnchoredExtractor::new().extract(output), None);
    }

    #[test]
    fn rejects_empty_output() {
        assert_eq!(SectionAnchoredExtractor::new().extract(""), None);
    }
}
