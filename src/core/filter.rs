use crate::domain::model::{ConversionOptions, InputRow, DEFAULT_FILTER_COLUMN, DEFAULT_FILTER_TOKEN};

/// Drops rows whose filter-code column contains the exclusion token
/// (accessories, by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFilter {
    column: String,
    token: String,
}

impl RowFilter {
    pub fn new(column: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            token: token.into().to_uppercase(),
        }
    }

    pub fn from_options(options: &ConversionOptions) -> Self {
        Self::new(options.filter_column.clone(), options.filter_token.clone())
    }

    pub fn should_skip(&self, row: &InputRow) -> bool {
        row.get(&self.column)
            .unwrap_or("")
            .to_uppercase()
            .contains(&self.token)
    }

    /// Keeps the rows that pass, in file order, and reports how many were dropped.
    pub fn retain_rows(&self, rows: Vec<InputRow>) -> (Vec<InputRow>, usize) {
        let total = rows.len();
        let kept: Vec<InputRow> = rows.into_iter().filter(|row| !self.should_skip(row)).collect();
        let skipped = total - kept.len();
        (kept, skipped)
    }
}

impl Default for RowFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_COLUMN, DEFAULT_FILTER_TOKEN)
    }
}

pub fn should_skip(row: &InputRow) -> bool {
    RowFilter::default().should_skip(row)
}
