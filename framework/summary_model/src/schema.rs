/// How a counter field is aggregated and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// An event total, such as a number of cache misses.
    ///
    /// Averages of counts are reported as whole numbers. The fractional part of the
    /// mean is discarded rather than rounded.
    Count,
    /// A percentage, rendered with two decimal places and a trailing `%`.
    Rate,
    /// A plain decimal quantity, such as instructions per cycle, rendered with two
    /// decimal places.
    Ratio,
}

/// A console table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// The column header.
    pub header: &'static str,
    /// The column width. Headers and values are right-aligned within this width.
    pub width: usize,
}

/// Standard deviation tracking for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdDevSpec {
    /// The key the standard deviation is stored under in the summary document.
    pub key: &'static str,
    /// The label used when the standard deviation is echoed to the console.
    pub label: &'static str,
}

/// One counter field measured by a sweep.
///
/// The order in which fields are added to a [FieldSchema] fixes the order of values in
/// every extracted record, so the extraction strategy for a scenario must produce its
/// values in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The key the averaged value is stored under in the summary document.
    pub key: &'static str,
    pub kind: FieldKind,
    /// The console column for this field, if it is shown in the table.
    ///
    /// Fields without a column are still averaged and stored in the summary document.
    pub column: Option<Column>,
    /// Standard deviation tracking, for fields where run-to-run spread is of interest.
    pub std_dev: Option<StdDevSpec>,
}

impl FieldSpec {
    /// An event total field. See [FieldKind::Count].
    pub fn count(key: &'static str) -> Self {
        Self::new(key, FieldKind::Count)
    }

    /// A percentage field. See [FieldKind::Rate].
    pub fn rate(key: &'static str) -> Self {
        Self::new(key, FieldKind::Rate)
    }

    /// A plain decimal field. See [FieldKind::Ratio].
    pub fn ratio(key: &'static str) -> Self {
        Self::new(key, FieldKind::Ratio)
    }

    fn new(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            column: None,
            std_dev: None,
        }
    }

    /// Show this field in the console table.
    pub fn column(mut self, header: &'static str, width: usize) -> Self {
        self.column = Some(Column { header, width });
        self
    }

    /// Track the standard deviation of this field across runs.
    pub fn std_dev(mut self, key: &'static str, label: &'static str) -> Self {
        self.std_dev = Some(StdDevSpec { key, label });
        self
    }
}

/// The full set of counter fields measured by a sweep, plus the leading size column.
///
/// A schema belongs to a scenario and stays fixed for the lifetime of a sweep. It drives
/// aggregation, table rendering and the layout of result objects in the summary
/// document from a single definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// The leading column holding the workload size.
    pub size_column: Column,
    pub fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new(size_header: &'static str, size_width: usize) -> Self {
        Self {
            size_column: Column {
                header: size_header,
                width: size_width,
            },
            fields: Vec::new(),
        }
    }

    /// Append a field to the schema.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_is_preserved() {
        let schema = FieldSchema::new("Size", 6)
            .field(FieldSpec::count("first"))
            .field(FieldSpec::rate("second").column("Second%", 8))
            .field(FieldSpec::ratio("third").std_dev("std_dev_third", "Third"));

        assert_eq!(
            schema.fields.iter().map(|f| f.key).collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
        assert_eq!(schema.fields[0].kind, FieldKind::Count);
        assert!(schema.fields[0].column.is_none());
        assert_eq!(
            schema.fields[1].column,
            Some(Column {
                header: "Second%",
                width: 8
            })
        );
        assert_eq!(
            schema.fields[2].std_dev,
            Some(StdDevSpec {
                key: "std_dev_third",
                label: "Third"
            })
        );
    }
}
