mod line_scan;
mod section;
pub mod stats;

pub use line_scan::LineScanExtractor;
pub use section::SectionAnchoredExtractor;

/// The output stream of the measured process that a strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSource {
    Stdout,
    Stderr,
}

/// The counter values extracted from the output of a single run.
///
/// Values are ordered to match the field schema the sweep was configured with.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRecord {
    pub values: Vec<f64>,
}

/// Turns the raw text output of a measured process into a counter record.
///
/// Implementations are pure text processing. They know nothing about how the process
/// was launched, which keeps changes to upstream output formats contained here.
pub trait ExtractionStrategy: Send + Sync {
    /// Which output stream this strategy parses.
    fn source(&self) -> OutputSource;

    /// The number of values in every record this strategy produces.
    fn field_count(&self) -> usize;

    /// Extract a counter record from the raw output of one run.
    ///
    /// Returns `None` when the output does not contain a usable result. Whether partial
    /// output is usable is up to the strategy.
    fn extract(&self, raw: &str) -> Option<CounterRecord>;
}
