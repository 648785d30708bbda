use std::fs::File;
use std::path::Path;

use anyhow::Context;
use dyno_summary_model::{
    store_sweep_summary, AggregateRecord, FieldKind, FieldSchema, SweepSummary,
};

use crate::types::HarnessResult;

/// Render the table header, every column right-aligned within its width.
pub(crate) fn header_line(schema: &FieldSchema) -> String {
    let mut parts = vec![format!(
        "{:>width$}",
        schema.size_column.header,
        width = schema.size_column.width
    )];
    for spec in &schema.fields {
        if let Some(column) = &spec.column {
            parts.push(format!("{:>width$}", column.header, width = column.width));
        }
    }
    parts.join(" ")
}

/// Render one table row from an aggregate record.
///
/// Values wider than their column are not truncated; the row simply overflows.
pub(crate) fn format_row(schema: &FieldSchema, record: &AggregateRecord) -> String {
    let mut parts = vec![format!(
        "{:>width$}",
        record.snakes,
        width = schema.size_column.width
    )];
    for (spec, value) in schema.fields.iter().zip(&record.values) {
        if let Some(column) = &spec.column {
            parts.push(format!(
                "{:>width$}",
                format_value(spec.kind, *value),
                width = column.width
            ));
        }
    }
    parts.join(" ")
}

fn format_value(kind: FieldKind, value: f64) -> String {
    match kind {
        FieldKind::Count => group_thousands(value as u64),
        FieldKind::Rate => format!("{value:.2}%"),
        FieldKind::Ratio => format!("{value:.2}"),
    }
}

/// Render the run-to-run spread line for a record.
///
/// Returns `None` when fewer than two runs completed or when no field tracks its standard
/// deviation.
pub(crate) fn std_dev_line(schema: &FieldSchema, record: &AggregateRecord) -> Option<String> {
    if record.runs_completed < 2 {
        return None;
    }

    let parts: Vec<String> = schema
        .fields
        .iter()
        .zip(&record.std_devs)
        .filter_map(|(spec, std_dev)| {
            spec.std_dev.as_ref().map(|tracked| match spec.kind {
                FieldKind::Count => format!(
                    "{}: {}",
                    tracked.label,
                    group_thousands(std_dev.round() as u64)
                ),
                FieldKind::Rate => format!("{}: {:.2}%", tracked.label, std_dev),
                FieldKind::Ratio => format!("{}: {:.2}", tracked.label, std_dev),
            })
        })
        .collect();

    if parts.is_empty() {
        return None;
    }

    Some(format!("  Std dev - {}", parts.join(", ")))
}

/// Group a count's digits in threes, `1234567` becomes `1,234,567`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Write the summary document to `path`, replacing any previous summary.
pub(crate) fn write_summary(summary: &SweepSummary, path: &Path) -> HarnessResult<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create summary file at '{}'", path.display()))?;
    store_sweep_summary(summary, &mut file)?;
    Ok(())
}
