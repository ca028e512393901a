use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Output columns present in every record, in header order.
pub const FIXED_COLUMNS: [&str; 16] = [
    "name",
    "gender",
    "ageGroup",
    "strongCategoryType",
    "brandName",
    "type",
    "accessories",
    "sizeSystem",
    "sizeName",
    "ss-EU",
    "ss-FR",
    "ss-IT",
    "ss-JP",
    "ss-UK",
    "ss-US",
    "categoryNames",
];

pub const DEFAULT_FILTER_COLUMN: &str = "TGL_FILTER_CODE";
pub const DEFAULT_FILTER_TOKEN: &str = "ACC";
pub const DEFAULT_OUTPUT_FILENAME: &str = "output.csv";

/// One data line of the vendor export, keyed by header name.
///
/// Columns keep the order of the header. A cell missing because the line was
/// shorter than the header is absent, which is different from an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRow {
    cells: Vec<(String, String)>,
}

impl InputRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell. A repeated column name keeps its first position and takes
    /// the newest value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InputRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = InputRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Lower and upper bound of a measurement cell. Both are empty when the cell
/// was blank, and equal when it held a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeValue {
    pub initial: String,
    pub r#final: String,
}

impl RangeValue {
    pub fn new(initial: impl Into<String>, r#final: impl Into<String>) -> Self {
        Self {
            initial: initial.into(),
            r#final: r#final.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Digit suffix N of a "tipo dim N" / "dim N" column, kept as written.
///
/// `Dim01` and `Dim1` are different indices. Ordering is numeric for any
/// length: shorter digit strings first, then lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasureIndex(String);

impl MeasureIndex {
    pub fn new(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for MeasureIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for MeasureIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MeasureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The "tipo dim N" and "dim N" cells of one row that share the index N.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurePair {
    pub kind: Option<String>,
    pub value: Option<String>,
}

/// Flat output line. Fields that were never written read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    fields: HashMap<String, String>,
}

impl OutputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Writes `value` only while the field is still empty, so the first
    /// non-empty write wins.
    pub fn set_if_empty(&mut self, column: &str, value: &str) {
        let slot = self.fields.entry(column.to_string()).or_default();
        if slot.is_empty() {
            *slot = value.to_string();
        }
    }

    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }
}

/// Output header: the fixed columns followed by two columns per measure, in
/// the order the measures were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    measures: Vec<String>,
}

impl OutputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a measure; returns false if it was already known.
    pub fn add_measure(&mut self, measure: &str) -> bool {
        if self.measures.iter().any(|m| m == measure) {
            return false;
        }
        self.measures.push(measure.to_string());
        true
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for measure in &self.measures {
            columns.push(initial_column(measure));
            columns.push(final_column(measure));
        }
        columns
    }
}

pub fn initial_column(measure: &str) -> String {
    format!("{}InitialValue", measure)
}

pub fn final_column(measure: &str) -> String {
    format!("{}FinalValue", measure)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Canonicalize numeric formats in measurement values.
    pub normalize_numbers: bool,
    pub filter_column: String,
    pub filter_token: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            normalize_numbers: true,
            filter_column: DEFAULT_FILTER_COLUMN.to_string(),
            filter_token: DEFAULT_FILTER_TOKEN.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub schema: OutputSchema,
    pub records: Vec<OutputRecord>,
    pub csv_output: String,
    pub rows_read: usize,
    pub rows_skipped: usize,
}
