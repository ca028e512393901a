//! First pass over the export: find every measurement used anywhere in the
//! file so the output header can be built before any row is written.

use crate::core::lookup::Lookups;
use crate::domain::model::{InputRow, MeasureIndex, OutputSchema};
use regex::Regex;
use std::sync::LazyLock;

static MEASURE_TYPE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^tipo\s*dim\s*([0-9]+)$").unwrap());
static MEASURE_VALUE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^dim\s*([0-9]+)$").unwrap());

/// Index N of a "TipoDim N" column.
pub fn measure_type_index(column: &str) -> Option<MeasureIndex> {
    capture_index(&MEASURE_TYPE_COLUMN, column)
}

/// Index N of a "Dim N" column.
pub fn measure_value_index(column: &str) -> Option<MeasureIndex> {
    capture_index(&MEASURE_VALUE_COLUMN, column)
}

fn capture_index(pattern: &Regex, column: &str) -> Option<MeasureIndex> {
    pattern
        .captures(column)
        .and_then(|caps| caps.get(1))
        .map(|digits| MeasureIndex::new(digits.as_str()))
}

/// Collects the canonical measures in order of first appearance, scanning
/// rows in file order and each row's columns in header order.
pub fn discover_schema(rows: &[InputRow], lookups: &Lookups) -> OutputSchema {
    let mut schema = OutputSchema::new();

    for row in rows {
        for (column, value) in row.iter() {
            if measure_type_index(column).is_none() {
                continue;
            }

            let label = value.trim();
            if label.is_empty() {
                continue;
            }

            let measure = lookups.canonical_measure(label);
            if !measure.is_empty() && schema.add_measure(&measure) {
                tracing::debug!("Discovered measure '{}' from column '{}'", measure, column);
            }
        }
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> InputRow {
        cells.iter().copied().collect()
    }

    fn digits(index: Option<MeasureIndex>) -> Option<String> {
        index.map(|index| index.to_string())
    }

    #[test]
    fn test_measure_column_patterns() {
        assert_eq!(digits(measure_type_index("TipoDim1")), Some("1".into()));
        assert_eq!(digits(measure_type_index("tipo dim 12")), Some("12".into()));
        assert_eq!(digits(measure_type_index("TIPO  DIM3")), Some("3".into()));
        assert_eq!(digits(measure_type_index("TipoDim01")), Some("01".into()));
        assert_eq!(measure_type_index("Dim1"), None);
        assert_eq!(digits(measure_value_index("Dim1")), Some("1".into()));
        assert_eq!(digits(measure_value_index("dim 7")), Some("7".into()));
        assert_eq!(measure_type_index("TipoDim"), None);
        assert_eq!(measure_value_index("TipoDim1"), None);
        assert_eq!(measure_value_index("Dimension1"), None);
    }

    #[test]
    fn test_discover_schema_keeps_oversized_indices() {
        let rows = vec![row(&[("TipoDim99999999999999999999", "Torace")])];
        let schema = discover_schema(&rows, Lookups::standard());
        assert_eq!(schema.measures(), &["chest"]);
    }

    #[test]
    fn test_discover_schema_first_seen_order() {
        let rows = vec![
            row(&[("TipoDim1", "Vita"), ("Dim1", "70"), ("TipoDim2", "Torace")]),
            row(&[("TipoDim1", "Seno"), ("TipoDim2", "Bacino")]),
            row(&[("TipoDim1", "Polpaccio")]),
        ];

        let schema = discover_schema(&rows, Lookups::standard());
        assert_eq!(schema.measures(), &["waist", "chest", "hip", "Polpaccio"]);
    }

    #[test]
    fn test_discover_schema_skips_blank_labels() {
        let rows = vec![row(&[("TipoDim1", "   "), ("TipoDim2", ""), ("Dim1", "80")])];
        let schema = discover_schema(&rows, Lookups::standard());
        assert!(schema.measures().is_empty());
    }

    #[test]
    fn test_discover_schema_is_stable() {
        let rows = vec![
            row(&[("TipoDim2", "Lunghezza"), ("TipoDim1", "Larghezza")]),
            row(&[("TipoDim1", "Altezza")]),
        ];

        let first = discover_schema(&rows, Lookups::standard());
        let second = discover_schema(&rows, Lookups::standard());
        assert_eq!(first.columns(), second.columns());
        assert_eq!(first.measures(), &["insoleLength", "width", "height"]);
    }
}
