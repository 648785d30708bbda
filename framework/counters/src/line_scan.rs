use regex::Regex;

use crate::{stats, CounterRecord, ExtractionStrategy, OutputSource};

/// Parses the counter report that a wrapping profiler prints on stderr.
///
/// Every line of the shape `<value> <metric>` is inspected. The metric token is
/// classified by the first configured substring it contains, and the value is added to
/// that substring's slot. Summing rather than assigning matters on hybrid CPUs, where
/// the profiler reports one line per core domain (`cpu_atom/cache-misses/` and
/// `cpu_core/cache-misses/`) and only the sum is the system-wide total.
///
/// Derived rate slots are computed from the summed slots after scanning, and an
/// optional elapsed time slot is filled from the profiler's trailing
/// `seconds time elapsed` line.
///
/// This strategy always produces a record. Lines that do not look like counter lines,
/// including the profiler's `<not counted>` and `<not supported>` placeholders, are
/// skipped, and slots nothing matched stay at zero.
pub struct LineScanExtractor {
    field_count: usize,
    counters: Vec<(String, usize)>,
    rates: Vec<(usize, usize, usize)>,
    elapsed_slot: Option<usize>,
    counter_line: Regex,
    elapsed: Regex,
}

impl LineScanExtractor {
    pub fn new(field_count: usize) -> Self {
        Self {
            field_count,
            counters: Vec::new(),
            rates: Vec::new(),
            elapsed_slot: None,
            counter_line: Regex::new(r"^\s*([\d,]+)\s+([^\s#]+)")
                .expect("counter line pattern is valid"),
            elapsed: Regex::new(r"(\d+\.\d+) seconds time elapsed")
                .expect("elapsed time pattern is valid"),
        }
    }

    /// Sum every counter line whose metric contains `metric` into `slot`.
    ///
    /// Substrings are tried in registration order and the first match wins, so register
    /// more specific metric names before more general ones.
    pub fn sum_counter(mut self, metric: &str, slot: usize) -> Self {
        assert!(slot < self.field_count, "slot {slot} is out of range");
        self.counters.push((metric.to_string(), slot));
        self
    }

    /// Fill `slot` with `numerator / denominator` as a percentage, computed from the
    /// summed slots after scanning.
    pub fn rate_percent(mut self, slot: usize, numerator: usize, denominator: usize) -> Self {
        assert!(slot < self.field_count, "slot {slot} is out of range");
        assert!(numerator < self.field_count, "numerator slot {numerator} is out of range");
        assert!(
            denominator < self.field_count,
            "denominator slot {denominator} is out of range"
        );
        self.rates.push((slot, numerator, denominator));
        self
    }

    /// Fill `slot` with the elapsed wall time reported by the profiler, or 0.0 when the
    /// report does not include one.
    pub fn elapsed_seconds(mut self, slot: usize) -> Self {
        assert!(slot < self.field_count, "slot {slot} is out of range");
        self.elapsed_slot = Some(slot);
        self
    }
}

impl ExtractionStrategy for LineScanExtractor {
    fn source(&self) -> OutputSource {
        OutputSource::Stderr
    }

    fn field_count(&self) -> usize {
        self.field_count
    }

    fn extract(&self, raw: &str) -> Option<CounterRecord> {
        let mut values = vec![0.0; self.field_count];

        for line in raw.lines() {
            let captures = match self.counter_line.captures(line) {
                Some(captures) => captures,
                None => continue,
            };
            let value = match captures[1].replace(',', "").parse::<u64>() {
                Ok(value) => value,
                Err(_) => {
                    log::trace!("Skipping counter line with unparseable value: {line}");
                    continue;
                }
            };
            let metric = &captures[2];
            for (token, slot) in &self.counters {
                if metric.contains(token.as_str()) {
                    values[*slot] += value as f64;
                    break;
                }
            }
        }

        for (slot, numerator, denominator) in &self.rates {
            values[*slot] = stats::rate_percent(values[*numerator], values[*denominator]);
        }

        if let Some(slot) = self.elapsed_slot {
            values[slot] = self
                .elapsed
                .captures(raw)
                .and_then(|captures| captures[1].parse::<f64>().ok())
                .unwrap_or(0.0);
        }

        Some(CounterRecord { values })
    }
}
